/// Test fixtures: representative JSON payloads from the GIOS API.
///
/// Structurally complete but trimmed to what the parsers need. Shapes:
///
///   station/findAll → [ { id, stationName, gegrLat, gegrLon, addressStreet,
///                         city: { id, name, commune: { communeName,
///                         districtName, provinceName } } } ]
///   station/sensors/{id} → [ { id, stationId, param: { paramName,
///                              paramFormula, paramCode, idParam } } ]
///   data/getData/{id} → { key, values: [ { date, value } ] }
///                       (value is a number or null, newest first)
///   aqindex/getIndex/{id} → { id, stCalcDate, stIndexLevel: { id,
///                             indexLevelName }, stSourceDataDate, … }
///
/// Note: coordinates arrive as decimal STRINGS, not numbers.

/// Three stations. The third has no street and a null commune, which the
/// parser must tolerate.
#[cfg(test)]
pub(crate) fn fixture_stations_json() -> &'static str {
    r#"[
      {
        "id": 400,
        "stationName": "Kraków, Aleja Krasińskiego",
        "gegrLat": "50.057678",
        "gegrLon": "19.926189",
        "city": {
          "id": 415,
          "name": "Kraków",
          "commune": { "communeName": "Kraków", "districtName": "Kraków", "provinceName": "MAŁOPOLSKIE" }
        },
        "addressStreet": "al. Krasińskiego"
      },
      {
        "id": 114,
        "stationName": "Wrocław - Bartnicza",
        "gegrLat": "51.115933",
        "gegrLon": "17.141125",
        "city": {
          "id": 1064,
          "name": "Wrocław",
          "commune": { "communeName": "Wrocław", "districtName": "Wrocław", "provinceName": "DOLNOŚLĄSKIE" }
        },
        "addressStreet": "ul. Bartnicza"
      },
      {
        "id": 10955,
        "stationName": "Gdańsk Wyzwolenia",
        "gegrLat": "54.400833",
        "gegrLon": "18.657497",
        "city": { "id": 218, "name": "Gdańsk", "commune": null },
        "addressStreet": null
      }
    ]"#
}

/// Two sensors for station 400.
#[cfg(test)]
pub(crate) fn fixture_sensors_json() -> &'static str {
    r#"[
      {
        "id": 2745,
        "stationId": 400,
        "param": { "paramName": "dwutlenek azotu", "paramFormula": "NO2", "paramCode": "NO2", "idParam": 6 }
      },
      {
        "id": 2747,
        "stationId": 400,
        "param": { "paramName": "pył zawieszony PM10", "paramFormula": "PM10", "paramCode": "PM10", "idParam": 3 }
      }
    ]"#
}

/// NO2 series with one null value (sensor gap).
#[cfg(test)]
pub(crate) fn fixture_measurements_json() -> &'static str {
    r#"{
      "key": "NO2",
      "values": [
        { "date": "2024-05-01 13:00:00", "value": 21.5 },
        { "date": "2024-05-01 12:00:00", "value": null },
        { "date": "2024-05-01 11:00:00", "value": 18.25 },
        { "date": "2024-05-01 10:00:00", "value": 30.0 }
      ]
    }"#
}

/// Index for station 400, overall level "Umiarkowany" (orange).
#[cfg(test)]
pub(crate) fn fixture_air_quality_json() -> &'static str {
    r#"{
      "id": 400,
      "stCalcDate": "2024-05-01 13:20:11",
      "stIndexLevel": { "id": 2, "indexLevelName": "Umiarkowany" },
      "stSourceDataDate": "2024-05-01 13:00:00",
      "no2CalcDate": "2024-05-01 13:20:11",
      "no2IndexLevel": { "id": 1, "indexLevelName": "Dobry" },
      "no2SourceDataDate": "2024-05-01 13:00:00",
      "stIndexStatus": true,
      "stIndexCrParam": "PYL"
    }"#
}
