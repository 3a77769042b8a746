/// Shared data types for the air-quality client.
///
/// Domain records decoded from the GIOS API (stations, sensors, measurement
/// series, air-quality index) plus the error types raised at each boundary:
/// transport, parsing, local cache, configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentinel used for "nothing selected" in the session state.
pub const NO_SELECTION: i64 = -1;

// ---------------------------------------------------------------------------
// Stations and sensors
// ---------------------------------------------------------------------------

/// A single monitoring station as returned by `station/findAll`.
///
/// Missing fields in the API payload degrade to empty strings; `id`
/// degrades to 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: i64,
    pub station_name: String,
    pub address_street: String,
    pub city_name: String,
    pub commune_name: String,
    pub district_name: String,
    pub province_name: String,
    /// Latitude as sent by the API (a decimal string).
    pub latitude: String,
    /// Longitude as sent by the API (a decimal string).
    pub longitude: String,
}

impl Station {
    /// Latitude as a double; 0.0 when the API string is not a number.
    pub fn latitude_deg(&self) -> f64 {
        self.latitude.trim().parse().unwrap_or(0.0)
    }

    /// Longitude as a double; 0.0 when the API string is not a number.
    pub fn longitude_deg(&self) -> f64 {
        self.longitude.trim().parse().unwrap_or(0.0)
    }
}

/// A sensor (one measured parameter) attached to a station.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: i64,
    pub station_id: i64,
    pub param_name: String,
    /// Short code, e.g. "NO2" or "PM10".
    pub param_formula: String,
}

impl Sensor {
    /// `"{paramName} ({paramFormula})"`
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.param_name, self.param_formula)
    }
}

/// Station list row handed to the UI: label, id and the full record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationEntry {
    pub label: String,
    pub id: i64,
    pub station: Station,
}

/// Sensor list row handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorEntry {
    pub label: String,
    pub id: i64,
}

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// One timestamped value. `None` marks a missing value; it is never
/// coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub date: String,
    pub value: Option<f64>,
}

/// Parameter key plus points, in the order the API returned them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementSeries {
    pub key: String,
    pub values: Vec<MeasurementPoint>,
}

impl MeasurementSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Air-quality index
// ---------------------------------------------------------------------------

/// Display color for an index level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexColor {
    Green,
    Orange,
    Red,
}

impl IndexColor {
    /// Maps an index level name onto the color vocabulary. Anything outside
    /// the two good levels and "Umiarkowany" is red.
    pub fn for_level(level_name: &str) -> Self {
        match level_name {
            "Bardzo dobry" | "Dobry" => IndexColor::Green,
            "Umiarkowany" => IndexColor::Orange,
            _ => IndexColor::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexColor::Green => "green",
            IndexColor::Orange => "orange",
            IndexColor::Red => "red",
        }
    }
}

/// Air-quality index for a station.
///
/// Only the level name and calculation date are interpreted; `raw` keeps the
/// complete API object so it can be persisted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityIndex {
    pub index_level_name: String,
    pub calc_date: String,
    pub raw: serde_json::Value,
}

impl AirQualityIndex {
    pub fn color(&self) -> IndexColor {
        IndexColor::for_level(&self.index_level_name)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Network or HTTP failure while fetching an endpoint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Malformed or unexpectedly shaped API payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    InvalidJson(String),

    #[error("invalid JSON {expected} for {endpoint}")]
    UnexpectedShape {
        endpoint: &'static str,
        expected: &'static str,
    },
}

/// Failure in the local historical cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to create cache directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_color_vocabulary() {
        assert_eq!(IndexColor::for_level("Bardzo dobry"), IndexColor::Green);
        assert_eq!(IndexColor::for_level("Dobry"), IndexColor::Green);
        assert_eq!(IndexColor::for_level("Umiarkowany"), IndexColor::Orange);
        assert_eq!(IndexColor::for_level("Dostateczny"), IndexColor::Red);
        assert_eq!(IndexColor::for_level("Zły"), IndexColor::Red);
        assert_eq!(IndexColor::for_level(""), IndexColor::Red);
    }

    #[test]
    fn test_index_color_names() {
        assert_eq!(IndexColor::Green.as_str(), "green");
        assert_eq!(IndexColor::Orange.as_str(), "orange");
        assert_eq!(IndexColor::Red.as_str(), "red");
    }

    #[test]
    fn test_station_coordinates_convert_from_strings() {
        let station = Station {
            latitude: "50.057678".to_string(),
            longitude: " 19.926189".to_string(),
            ..Default::default()
        };
        assert!((station.latitude_deg() - 50.057678).abs() < 1e-9);
        assert!((station.longitude_deg() - 19.926189).abs() < 1e-9);
    }

    #[test]
    fn test_unparsable_coordinates_become_zero() {
        let station = Station {
            latitude: "n/a".to_string(),
            ..Default::default()
        };
        assert_eq!(station.latitude_deg(), 0.0);
        assert_eq!(station.longitude_deg(), 0.0);
    }

    #[test]
    fn test_sensor_display_label() {
        let sensor = Sensor {
            id: 92,
            station_id: 14,
            param_name: "pył zawieszony PM10".to_string(),
            param_formula: "PM10".to_string(),
        };
        assert_eq!(sensor.display_label(), "pył zawieszony PM10 (PM10)");
    }
}
