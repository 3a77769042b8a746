/// Station/sensor registry for the air-quality client.
///
/// Holds the most recent station list (in API order) with an id index, and
/// an id → sensor map. Rebuilt from each successful stations fetch; all
/// lookups and text search go through here rather than re-parsing payloads.

use std::collections::HashMap;

use crate::model::{Sensor, Station, StationEntry};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StationRegistry {
    all_stations: Vec<Station>,
    stations_by_id: HashMap<i64, Station>,
    sensors_by_id: HashMap<i64, Sensor>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the station list and id index wholesale.
    pub fn replace_stations(&mut self, stations: Vec<Station>) {
        self.stations_by_id = stations.iter().map(|s| (s.id, s.clone())).collect();
        self.all_stations = stations;
    }

    /// Inserts or overwrites sensors by id.
    ///
    /// Sensors of previously selected stations are NOT evicted: switching
    /// stations leaves their entries in place until a later fetch
    /// overwrites the same ids.
    pub fn replace_sensors(&mut self, sensors: &[Sensor]) {
        for sensor in sensors {
            self.sensors_by_id.insert(sensor.id, sensor.clone());
        }
    }

    pub fn lookup_station(&self, id: i64) -> Option<&Station> {
        self.stations_by_id.get(&id)
    }

    pub fn lookup_sensor(&self, id: i64) -> Option<&Sensor> {
        self.sensors_by_id.get(&id)
    }

    pub fn all_stations(&self) -> &[Station] {
        &self.all_stations
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors_by_id.len()
    }

    /// Case-insensitive substring match against the city name only.
    /// Empty text returns every station; order is always preserved.
    pub fn search(&self, text: &str) -> Vec<Station> {
        if text.is_empty() {
            return self.all_stations.clone();
        }

        let needle = text.to_lowercase();
        self.all_stations
            .iter()
            .filter(|s| s.city_name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// Station list rows labelled `"{cityName} - {stationName}"`, in input order.
pub fn to_display_list(stations: &[Station]) -> Vec<StationEntry> {
    stations
        .iter()
        .map(|s| StationEntry {
            label: format!("{} - {}", s.city_name, s.station_name),
            id: s.id,
            station: s.clone(),
        })
        .collect()
}

/// HTML-ish summary shown in the station info panel.
pub fn station_info(station: &Station) -> String {
    format!(
        "<h3>{}</h3>\
         <p><b>Miasto:</b> {}</p>\
         <p><b>Ulica:</b> {}</p>\
         <p><b>Gmina:</b> {}</p>\
         <p><b>Powiat:</b> {}</p>\
         <p><b>Województwo:</b> {}</p>\
         <p><b>Współrzędne:</b> {}, {}</p>",
        station.station_name,
        station.city_name,
        station.address_street,
        station.commune_name,
        station.district_name,
        station.province_name,
        station.latitude_deg(),
        station.longitude_deg(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
