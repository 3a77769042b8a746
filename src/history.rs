/// Local historical cache: last-write-wins JSON snapshots on disk.
///
/// One file per key under the cache directory:
///   - measurements: `measurements_station{stationId}_sensor{sensorId}.json`
///   - air quality:  `airquality_station{stationId}.json`
///
/// Every save replaces the previous snapshot for its key. Nothing is ever
/// deleted automatically. Loads never fail loudly: any I/O or parse problem
/// reads as "no historical data".

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{AirQualityIndex, CacheError, MeasurementPoint, MeasurementSeries};

/// Directory name used under the platform data dir.
pub const CACHE_DIR_NAME: &str = "airmon";

/// Default cache location following platform conventions.
///
/// - Linux: `~/.local/share/airmon`
/// - macOS: `~/Library/Application Support/airmon`
/// - Windows: `C:\Users\<user>\AppData\Local\airmon`
pub fn default_cache_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

// ---------------------------------------------------------------------------
// Keys and persisted envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    Measurements { station_id: i64, sensor_id: i64 },
    AirQuality { station_id: i64 },
}

impl CacheKey {
    pub fn file_name(&self) -> String {
        match self {
            CacheKey::Measurements { station_id, sensor_id } => {
                format!("measurements_station{}_sensor{}.json", station_id, sensor_id)
            }
            CacheKey::AirQuality { station_id } => format!("airquality_station{}.json", station_id),
        }
    }
}

/// Saved measurement snapshot for one (station, sensor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub station_id: i64,
    pub sensor_id: i64,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub save_date: String,
    #[serde(default)]
    pub measurements: Vec<MeasurementPoint>,
}

impl MeasurementRecord {
    pub fn series(&self) -> MeasurementSeries {
        MeasurementSeries {
            key: self.key.clone(),
            values: self.measurements.clone(),
        }
    }
}

/// Saved air-quality snapshot for one station. `air_quality` is the API
/// object exactly as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityRecord {
    pub station_id: i64,
    #[serde(default)]
    pub save_date: String,
    #[serde(default)]
    pub air_quality: serde_json::Value,
}

/// Local time of a save, ISO-8601 without offset (`2024-05-01T14:03:22`).
fn save_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

pub struct HistoricalCache {
    dir: PathBuf,
}

impl HistoricalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache under [`default_cache_dir`].
    pub fn open_default() -> Self {
        Self::new(default_cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if needed. Failure is logged and
    /// otherwise ignored; later file operations then fail on their own.
    fn ensure_dir(&self) -> &Path {
        if !self.dir.exists() {
            if let Err(e) = fs::create_dir_all(&self.dir) {
                let err = CacheError::CreateDirectory {
                    path: self.dir.clone(),
                    source: e,
                };
                warn!("{}", err);
            }
        }
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.ensure_dir().join(key.file_name())
    }

    /// File existence only; contents are not validated.
    pub fn exists(&self, key: &CacheKey) -> bool {
        self.path_for(key).exists()
    }

    /// Writes the measurement snapshot for `(station_id, sensor_id)`,
    /// replacing any earlier one. Returns the written path.
    pub fn save_measurements(
        &self,
        station_id: i64,
        sensor_id: i64,
        series: &MeasurementSeries,
    ) -> Result<PathBuf, CacheError> {
        let record = MeasurementRecord {
            station_id,
            sensor_id,
            key: series.key.clone(),
            save_date: save_timestamp(),
            measurements: series.values.clone(),
        };
        self.write(&CacheKey::Measurements { station_id, sensor_id }, &record)
    }

    /// Writes the air-quality snapshot for `station_id`, replacing any
    /// earlier one. Returns the written path.
    pub fn save_air_quality(&self, station_id: i64, index: &AirQualityIndex) -> Result<PathBuf, CacheError> {
        let record = AirQualityRecord {
            station_id,
            save_date: save_timestamp(),
            air_quality: index.raw.clone(),
        };
        self.write(&CacheKey::AirQuality { station_id }, &record)
    }

    pub fn load_measurements(&self, station_id: i64, sensor_id: i64) -> Option<MeasurementRecord> {
        self.read(&CacheKey::Measurements { station_id, sensor_id })
    }

    pub fn load_air_quality(&self, station_id: i64) -> Option<AirQualityRecord> {
        self.read(&CacheKey::AirQuality { station_id })
    }

    fn write<T: Serialize>(&self, key: &CacheKey, record: &T) -> Result<PathBuf, CacheError> {
        let path = self.path_for(key);
        let json = serde_json::to_vec_pretty(record)?;

        // Open-truncate-write-close.
        fs::write(&path, json).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;

        info!("saved {} to {}", key.file_name(), path.display());
        Ok(path)
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> Option<T> {
        let path = self.path_for(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("{}", CacheError::Io { path, source: e });
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("failed to parse {}: {}", path.display(), CacheError::from(e));
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
