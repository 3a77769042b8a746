/// GIOS air-quality API: URL construction + JSON parsing.
///
/// Four endpoints hang off the public base URL
///   https://api.gios.gov.pl/pjp-api/rest/
///
///   - `station/findAll`            → array of station objects
///   - `station/sensors/{stationId}` → array of sensor objects
///   - `data/getData/{sensorId}`     → `{ key, values: [{ date, value }] }`
///   - `aqindex/getIndex/{stationId}` → index object (`stIndexLevel`, `stCalcDate`, …)
///
/// See `fixtures.rs` for annotated examples of each payload.
///
/// Parsers only fail on invalid JSON or a wrong top-level shape. Nested
/// fields are read defensively: anything missing or of the wrong type
/// becomes an empty string, 0 or `None`.

use serde_json::Value;

use crate::model::{AirQualityIndex, MeasurementPoint, MeasurementSeries, ParseError, Sensor, Station};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub const API_BASE_URL: &str = "https://api.gios.gov.pl/pjp-api/rest/";

const STATIONS_PATH: &str = "station/findAll";
const SENSORS_PATH: &str = "station/sensors/";
const MEASUREMENTS_PATH: &str = "data/getData/";
const AIR_QUALITY_PATH: &str = "aqindex/getIndex/";

/// One of the four API endpoints, with its path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Stations,
    Sensors(i64),
    Measurements(i64),
    AirQuality(i64),
}

impl Endpoint {
    /// Short name used in log lines and parse errors.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Stations => "stations",
            Endpoint::Sensors(_) => "sensors",
            Endpoint::Measurements(_) => "measurements",
            Endpoint::AirQuality(_) => "air quality index",
        }
    }

    /// Path relative to the API base, e.g. `station/sensors/14`.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Stations => STATIONS_PATH.to_string(),
            Endpoint::Sensors(station_id) => format!("{}{}", SENSORS_PATH, station_id),
            Endpoint::Measurements(sensor_id) => format!("{}{}", MEASUREMENTS_PATH, sensor_id),
            Endpoint::AirQuality(station_id) => format!("{}{}", AIR_QUALITY_PATH, station_id),
        }
    }

    /// Full URL: base + per-endpoint suffix + stringified id.
    ///
    /// A missing trailing slash on `base` is tolerated.
    ///
    /// # Example
    /// ```
    /// use airmon_client::ingest::gios::{Endpoint, API_BASE_URL};
    ///
    /// let url = Endpoint::Sensors(14).url(API_BASE_URL);
    /// assert_eq!(url, "https://api.gios.gov.pl/pjp-api/rest/station/sensors/14");
    /// ```
    pub fn url(&self, base: &str) -> String {
        if base.ends_with('/') {
            format!("{}{}", base, self.path())
        } else {
            format!("{}/{}", base, self.path())
        }
    }
}

// ---------------------------------------------------------------------------
// Field access helpers
// ---------------------------------------------------------------------------

fn text_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_at(value: &Value, pointer: &str) -> i64 {
    value.pointer(pointer).and_then(Value::as_i64).unwrap_or(0)
}

fn decode(bytes: &[u8]) -> Result<Value, ParseError> {
    serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

fn expect_array(value: Value, endpoint: &'static str) -> Result<Vec<Value>, ParseError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ParseError::UnexpectedShape {
            endpoint,
            expected: "array",
        }),
    }
}

fn expect_object(value: Value, endpoint: &'static str) -> Result<Value, ParseError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(ParseError::UnexpectedShape {
            endpoint,
            expected: "object",
        })
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses the `station/findAll` body into stations, in API order.
///
/// # Errors
/// - `ParseError::InvalidJson` — body is not JSON.
/// - `ParseError::UnexpectedShape` — top level is not an array.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>, ParseError> {
    let items = expect_array(decode(bytes)?, "stations")?;

    Ok(items
        .iter()
        .map(|s| Station {
            id: int_at(s, "/id"),
            station_name: text_at(s, "/stationName"),
            address_street: text_at(s, "/addressStreet"),
            city_name: text_at(s, "/city/name"),
            commune_name: text_at(s, "/city/commune/communeName"),
            district_name: text_at(s, "/city/commune/districtName"),
            province_name: text_at(s, "/city/commune/provinceName"),
            latitude: text_at(s, "/gegrLat"),
            longitude: text_at(s, "/gegrLon"),
        })
        .collect())
}

/// Parses the `station/sensors/{id}` body into `(sensor, display label)`
/// pairs, in API order.
///
/// # Errors
/// Same as [`parse_stations`].
pub fn parse_sensors(bytes: &[u8]) -> Result<Vec<(Sensor, String)>, ParseError> {
    let items = expect_array(decode(bytes)?, "sensors")?;

    Ok(items
        .iter()
        .map(|s| {
            let sensor = Sensor {
                id: int_at(s, "/id"),
                station_id: int_at(s, "/stationId"),
                param_name: text_at(s, "/param/paramName"),
                param_formula: text_at(s, "/param/paramFormula"),
            };
            let label = sensor.display_label();
            (sensor, label)
        })
        .collect())
}

/// Parses the `data/getData/{id}` body into a measurement series.
///
/// Values that are JSON `null` (or not numbers at all) are kept as `None`;
/// point order is preserved.
///
/// # Errors
/// - `ParseError::InvalidJson` — body is not JSON.
/// - `ParseError::UnexpectedShape` — top level is not an object.
pub fn parse_measurements(bytes: &[u8]) -> Result<MeasurementSeries, ParseError> {
    let body = expect_object(decode(bytes)?, "measurements")?;

    let values = body
        .get("values")
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .map(|p| MeasurementPoint {
                    date: text_at(p, "/date"),
                    value: p.get("value").and_then(Value::as_f64),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(MeasurementSeries {
        key: text_at(&body, "/key"),
        values,
    })
}

/// Parses the `aqindex/getIndex/{id}` body. The whole object is retained
/// in `raw` for persistence.
///
/// # Errors
/// - `ParseError::InvalidJson` — body is not JSON.
/// - `ParseError::UnexpectedShape` — top level is not an object.
pub fn parse_air_quality(bytes: &[u8]) -> Result<AirQualityIndex, ParseError> {
    let body = expect_object(decode(bytes)?, "air quality index")?;
    Ok(air_quality_from_value(body))
}

/// Builds an index from an already decoded object (live or cached).
pub fn air_quality_from_value(raw: Value) -> AirQualityIndex {
    AirQualityIndex {
        index_level_name: text_at(&raw, "/stIndexLevel/indexLevelName"),
        calc_date: text_at(&raw, "/stCalcDate"),
        raw,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_stations_url_has_no_parameter() {
        assert_eq!(
            Endpoint::Stations.url(API_BASE_URL),
            "https://api.gios.gov.pl/pjp-api/rest/station/findAll"
        );
    }

    #[test]
    fn test_parameterised_urls_append_the_id() {
        assert_eq!(
            Endpoint::Sensors(114).url(API_BASE_URL),
            "https://api.gios.gov.pl/pjp-api/rest/station/sensors/114"
        );
        assert_eq!(
            Endpoint::Measurements(642).url(API_BASE_URL),
            "https://api.gios.gov.pl/pjp-api/rest/data/getData/642"
        );
        assert_eq!(
            Endpoint::AirQuality(52).url(API_BASE_URL),
            "https://api.gios.gov.pl/pjp-api/rest/aqindex/getIndex/52"
        );
    }

    #[test]
    fn test_url_tolerates_base_without_trailing_slash() {
        let url = Endpoint::Stations.url("http://localhost:8080/rest");
        assert_eq!(url, "http://localhost:8080/rest/station/findAll");
    }

    // --- Stations -----------------------------------------------------------

    #[test]
    fn test_parse_stations_reads_nested_address_fields() {
        let stations = parse_stations(fixture_stations_json().as_bytes())
            .expect("valid fixture should parse without error");
        assert_eq!(stations.len(), 3);

        let krakow = &stations[0];
        assert_eq!(krakow.id, 400);
        assert_eq!(krakow.station_name, "Kraków, Aleja Krasińskiego");
        assert_eq!(krakow.address_street, "al. Krasińskiego");
        assert_eq!(krakow.city_name, "Kraków");
        assert_eq!(krakow.commune_name, "Kraków");
        assert_eq!(krakow.district_name, "Kraków");
        assert_eq!(krakow.province_name, "MAŁOPOLSKIE");
        assert_eq!(krakow.latitude, "50.057678");
        assert_eq!(krakow.longitude, "19.926189");
    }

    #[test]
    fn test_parse_stations_preserves_api_order() {
        let stations = parse_stations(fixture_stations_json().as_bytes()).expect("should parse");
        let ids: Vec<i64> = stations.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![400, 114, 10955]);
    }

    #[test]
    fn test_parse_stations_missing_fields_degrade_to_empty() {
        // Third fixture station has no street and a null commune.
        let stations = parse_stations(fixture_stations_json().as_bytes()).expect("should parse");
        let sparse = &stations[2];
        assert_eq!(sparse.address_street, "");
        assert_eq!(sparse.commune_name, "");
        assert_eq!(sparse.city_name, "Gdańsk");
    }

    #[test]
    fn test_parse_stations_rejects_object_top_level() {
        let result = parse_stations(br#"{ "id": 1 }"#);
        assert!(
            matches!(result, Err(ParseError::UnexpectedShape { expected: "array", .. })),
            "object body should be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_stations_malformed_json_returns_parse_error() {
        let result = parse_stations(b"{ this is not valid json }}}");
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_stations_empty_body_returns_parse_error() {
        assert!(matches!(parse_stations(b""), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_stations_non_object_elements_become_defaults() {
        let stations = parse_stations(b"[1, \"x\"]").expect("array of scalars is still an array");
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 0);
        assert_eq!(stations[1].station_name, "");
    }

    // --- Sensors ------------------------------------------------------------

    #[test]
    fn test_parse_sensors_builds_display_labels() {
        let sensors = parse_sensors(fixture_sensors_json().as_bytes()).expect("should parse");
        assert_eq!(sensors.len(), 2);

        let (no2, label) = &sensors[0];
        assert_eq!(no2.id, 2745);
        assert_eq!(no2.station_id, 400);
        assert_eq!(no2.param_formula, "NO2");
        assert_eq!(label, "dwutlenek azotu (NO2)");

        assert_eq!(sensors[1].1, "pył zawieszony PM10 (PM10)");
    }

    #[test]
    fn test_parse_sensors_missing_param_gives_empty_label_parts() {
        let sensors = parse_sensors(br#"[{ "id": 5 }]"#).expect("should parse");
        assert_eq!(sensors[0].0.id, 5);
        assert_eq!(sensors[0].1, " ()");
    }

    #[test]
    fn test_parse_sensors_rejects_object_top_level() {
        let result = parse_sensors(br#"{ "values": [] }"#);
        assert!(matches!(result, Err(ParseError::UnexpectedShape { .. })));
    }

    // --- Measurements -------------------------------------------------------

    #[test]
    fn test_parse_measurements_keeps_nulls_and_order() {
        let series = parse_measurements(fixture_measurements_json().as_bytes()).expect("should parse");
        assert_eq!(series.key, "NO2");
        assert_eq!(series.values.len(), 4);
        assert_eq!(series.values[0].date, "2024-05-01 13:00:00");
        assert_eq!(series.values[0].value, Some(21.5));
        assert_eq!(series.values[1].value, None, "null must stay missing, not zero");
        assert_eq!(series.values[3].date, "2024-05-01 10:00:00");
    }

    #[test]
    fn test_parse_measurements_without_values_is_empty_series() {
        let series = parse_measurements(br#"{ "key": "PM10" }"#).expect("should parse");
        assert_eq!(series.key, "PM10");
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_measurements_rejects_array_top_level() {
        let result = parse_measurements(b"[]");
        assert!(matches!(result, Err(ParseError::UnexpectedShape { expected: "object", .. })));
    }

    // --- Air quality --------------------------------------------------------

    #[test]
    fn test_parse_air_quality_reads_level_and_date() {
        let index = parse_air_quality(fixture_air_quality_json().as_bytes()).expect("should parse");
        assert_eq!(index.index_level_name, "Umiarkowany");
        assert_eq!(index.calc_date, "2024-05-01 13:20:11");
    }

    #[test]
    fn test_parse_air_quality_retains_pass_through_fields() {
        let index = parse_air_quality(fixture_air_quality_json().as_bytes()).expect("should parse");
        assert_eq!(index.raw["id"], 400);
        assert_eq!(index.raw["no2IndexLevel"]["indexLevelName"], "Dobry");
        assert_eq!(index.raw["stIndexStatus"], true);
    }

    #[test]
    fn test_parse_air_quality_null_level_is_empty_name() {
        let index = parse_air_quality(br#"{ "stIndexLevel": null }"#).expect("should parse");
        assert_eq!(index.index_level_name, "");
        assert_eq!(index.calc_date, "");
    }

    #[test]
    fn test_parse_air_quality_rejects_array_top_level() {
        let result = parse_air_quality(b"[1, 2]");
        assert!(matches!(result, Err(ParseError::UnexpectedShape { .. })));
    }
}
