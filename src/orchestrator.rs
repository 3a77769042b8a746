/// Orchestrator: the operation surface the UI calls into.
///
/// Sequences fetches across the four endpoints, keeps the registry and
/// session state current, reads/writes the historical cache and raises
/// notifications.
///
/// ## Threading
///
/// Operations return immediately. Each fetch runs on the worker pool and its
/// result comes back over a channel; nothing is applied until the owning
/// thread calls [`Orchestrator::dispatch_pending`] or
/// [`Orchestrator::run_until_idle`]. All state therefore changes on one
/// thread. Completions are applied in arrival order with no sequence
/// guard: if the same resource is requested twice, the later completion
/// overwrites the earlier one.
///
/// ## Failure handling
///
/// - transport error → logged only, UI untouched
/// - parse error → logged, and the matching notification fires with an
///   empty/error payload so stale data disappears
/// - cache error → logged; saves report `false`, loads produce nothing

use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};

use chrono::{DateTime, NaiveDateTime};
use threadpool::ThreadPool;
use tracing::{debug, info, warn};

use crate::analysis::statistics::{self, AnalysisError, SeriesStatistics};
use crate::config::AppConfig;
use crate::events::{EventBus, Notification};
use crate::history::{CacheKey, HistoricalCache};
use crate::ingest::client::{Fetcher, HttpFetcher};
use crate::ingest::gios::{self, Endpoint};
use crate::model::{IndexColor, SensorEntry, TransportError};
use crate::session::SessionState;
use crate::stations::{station_info, to_display_list, StationRegistry};

/// Air-quality text shown when the index payload cannot be parsed.
pub const AIR_QUALITY_LOAD_FAILED: &str = "Błąd ładowania danych";

/// Measurements key shown when the series payload cannot be parsed.
pub const MEASUREMENTS_ERROR_KEY: &str = "Error";

const HISTORICAL_SUFFIX: &str = " (dane historyczne)";

struct Completion {
    endpoint: Endpoint,
    result: Result<Vec<u8>, TransportError>,
}

pub struct Orchestrator<F: Fetcher> {
    fetcher: Arc<F>,
    pool: ThreadPool,
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,
    in_flight: usize,
    registry: StationRegistry,
    session: SessionState,
    cache: HistoricalCache,
    events: EventBus,
}

impl Orchestrator<HttpFetcher> {
    /// Live orchestrator wired from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            HttpFetcher::new(config.api_base_url.clone()),
            HistoricalCache::new(config.cache_dir()),
            config.workers(),
        )
    }
}

impl<F: Fetcher> Orchestrator<F> {
    pub fn new(fetcher: F, cache: HistoricalCache, workers: usize) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            fetcher: Arc::new(fetcher),
            pool: ThreadPool::new(workers.max(1)),
            completions_tx,
            completions_rx,
            in_flight: 0,
            registry: StationRegistry::new(),
            session: SessionState::new(),
            cache,
            events: EventBus::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Notification) + 'static) {
        self.events.subscribe(subscriber);
    }

    pub fn registry(&self) -> &StationRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn cache(&self) -> &HistoricalCache {
        &self.cache
    }

    /// Fetches issued but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Requests the full station list.
    pub fn refresh_stations(&mut self) {
        self.request(Endpoint::Stations);
    }

    /// Selects a station known to the registry; unknown ids are ignored.
    pub fn select_station(&mut self, station_id: i64) {
        let Some(station) = self.registry.lookup_station(station_id) else {
            debug!("station {} not in registry, ignoring selection", station_id);
            return;
        };
        let info = station_info(station);

        self.session.selected_station_id = station_id;
        self.events.publish(Notification::StationInfoUpdated { info });

        self.request(Endpoint::Sensors(station_id));
        self.request(Endpoint::AirQuality(station_id));

        let available = self.has_historical_data(station_id, None);
        self.events
            .publish(Notification::HistoricalAvailabilityChanged { available });
    }

    /// Selects a sensor. Ids ≤ 0 are ignored; no registry check is made.
    pub fn select_sensor(&mut self, sensor_id: i64) {
        if sensor_id <= 0 {
            return;
        }

        self.session.selected_sensor_id = sensor_id;
        self.request(Endpoint::Measurements(sensor_id));

        let available = self.has_historical_data(self.session.selected_station_id, Some(sensor_id));
        self.events
            .publish(Notification::HistoricalAvailabilityChanged { available });
    }

    /// Filters the station list by city name.
    pub fn search(&mut self, text: &str) {
        let stations = to_display_list(&self.registry.search(text));
        self.events
            .publish(Notification::StationListUpdated { stations });
    }

    pub fn show_all(&mut self) {
        let stations = to_display_list(self.registry.all_stations());
        self.events
            .publish(Notification::StationListUpdated { stations });
    }

    /// Switches between cached snapshots (`true`) and live data (`false`)
    /// for whatever is currently selected.
    pub fn toggle_data_source(&mut self, use_historical: bool) {
        let station_id = self.session.selected_station_id;
        let sensor_id = self.session.selected_sensor_id;

        if use_historical {
            if sensor_id > 0 {
                self.load_historical_measurements(sensor_id);
            }
            if station_id > 0 {
                self.load_historical_air_quality(station_id);
            }
        } else {
            if sensor_id > 0 {
                self.request(Endpoint::Measurements(sensor_id));
            }
            if station_id > 0 {
                self.request(Endpoint::AirQuality(station_id));
            }
        }
    }

    /// Whether a snapshot exists: the air-quality file when `sensor_id` is
    /// `None`, otherwise the (station, sensor) measurements file.
    pub fn has_historical_data(&self, station_id: i64, sensor_id: Option<i64>) -> bool {
        let key = match sensor_id {
            None => CacheKey::AirQuality { station_id },
            Some(sensor_id) => CacheKey::Measurements {
                station_id,
                sensor_id,
            },
        };
        self.cache.exists(&key)
    }

    /// Persists the current series for the selected (station, sensor).
    /// Returns whether a snapshot was written.
    pub fn save_measurements(&mut self) -> bool {
        let (Some(station_id), Some(sensor_id)) = (self.session.station(), self.session.sensor()) else {
            info!("no measurement data to save");
            return false;
        };
        let Some(series) = self.session.current_measurements.as_ref().filter(|s| !s.is_empty()) else {
            info!("no measurement data to save");
            return false;
        };

        match self.cache.save_measurements(station_id, sensor_id, series) {
            Ok(_) => {
                self.events
                    .publish(Notification::HistoricalAvailabilityChanged { available: true });
                true
            }
            Err(e) => {
                warn!("failed to save measurements: {}", e);
                false
            }
        }
    }

    /// Persists the current air-quality index for the selected station.
    /// Returns whether a snapshot was written.
    pub fn save_air_quality(&mut self) -> bool {
        let (Some(station_id), Some(index)) = (self.session.station(), self.session.current_air_quality.as_ref())
        else {
            info!("no air quality data to save");
            return false;
        };

        match self.cache.save_air_quality(station_id, index) {
            Ok(_) => {
                self.events
                    .publish(Notification::HistoricalAvailabilityChanged { available: true });
                true
            }
            Err(e) => {
                warn!("failed to save air quality index: {}", e);
                false
            }
        }
    }

    /// Shows the saved series for (selected station, `sensor_id`).
    /// Silently does nothing when no snapshot can be read.
    pub fn load_historical_measurements(&mut self, sensor_id: i64) {
        let Some(station_id) = self.session.station() else {
            info!("no station selected");
            return;
        };
        let Some(record) = self.cache.load_measurements(station_id, sensor_id) else {
            return;
        };

        let series = record.series();
        self.events.publish(Notification::MeasurementsUpdated {
            key: format!("{}{}", series.key, HISTORICAL_SUFFIX),
            values: series.values.clone(),
        });
        self.session.current_measurements = Some(series);
    }

    /// Shows the saved index for `station_id`.
    /// Silently does nothing when no snapshot can be read.
    pub fn load_historical_air_quality(&mut self, station_id: i64) {
        let Some(record) = self.cache.load_air_quality(station_id) else {
            return;
        };

        let index = gios::air_quality_from_value(record.air_quality);
        let text = format!(
            "Indeks jakości powietrza (HISTORYCZNY): {} (dane z: {}, zapisane: {})",
            index.index_level_name,
            display_timestamp(&index.calc_date),
            display_timestamp(&record.save_date),
        );
        self.events.publish(Notification::AirQualityUpdated {
            text,
            color: index.color(),
        });
        self.session.current_air_quality = Some(index);
    }

    /// Statistics over the current series. Only a successful analysis is
    /// published.
    pub fn analyze(&mut self) -> Result<SeriesStatistics, AnalysisError> {
        let points = self
            .session
            .current_measurements
            .as_ref()
            .map(|s| s.values.as_slice())
            .unwrap_or_default();

        let statistics = statistics::analyze(points).inspect_err(|e| info!("analysis skipped: {}", e))?;
        self.events.publish(Notification::AnalysisUpdated {
            statistics: statistics.clone(),
        });
        Ok(statistics)
    }

    // -----------------------------------------------------------------------
    // Fetch dispatch
    // -----------------------------------------------------------------------

    fn request(&mut self, endpoint: Endpoint) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;

        self.pool.execute(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(&endpoint)))
                .unwrap_or_else(|_| {
                    Err(TransportError::Request {
                        url: endpoint.path(),
                        message: "fetch panicked".to_string(),
                    })
                });
            // The receiver lives as long as the orchestrator.
            let _ = tx.send(Completion { endpoint, result });
        });
    }

    /// Applies every completion that has already arrived, without waiting.
    /// Returns how many were applied.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Blocks until no fetch is in flight, applying completions as they
    /// arrive (including any issued while applying). Returns how many were
    /// applied.
    pub fn run_until_idle(&mut self) -> usize {
        let mut applied = 0;
        while self.in_flight > 0 {
            match self.completions_rx.recv() {
                Ok(completion) => {
                    self.apply(completion);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let Completion { endpoint, result } = completion;
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("error fetching {}: {}", endpoint.name(), e);
                return;
            }
        };

        match endpoint {
            Endpoint::Stations => self.on_stations_received(&bytes),
            Endpoint::Sensors(_) => self.on_sensors_received(&bytes),
            Endpoint::Measurements(_) => self.on_measurements_received(&bytes),
            Endpoint::AirQuality(_) => self.on_air_quality_received(&bytes),
        }
    }

    // -----------------------------------------------------------------------
    // Completion handlers
    // -----------------------------------------------------------------------

    fn on_stations_received(&mut self, bytes: &[u8]) {
        match gios::parse_stations(bytes) {
            Ok(stations) => {
                info!("received {} stations", stations.len());
                self.registry.replace_stations(stations);
                let stations = to_display_list(self.registry.all_stations());
                self.events
                    .publish(Notification::StationListUpdated { stations });
            }
            Err(e) => {
                warn!("failed to parse stations: {}", e);
                self.events
                    .publish(Notification::StationListUpdated { stations: Vec::new() });
            }
        }
    }

    fn on_sensors_received(&mut self, bytes: &[u8]) {
        match gios::parse_sensors(bytes) {
            Ok(parsed) => {
                let sensors: Vec<SensorEntry> = parsed
                    .iter()
                    .map(|(sensor, label)| SensorEntry {
                        label: label.clone(),
                        id: sensor.id,
                    })
                    .collect();
                let records: Vec<_> = parsed.into_iter().map(|(sensor, _)| sensor).collect();
                self.registry.replace_sensors(&records);
                self.events
                    .publish(Notification::SensorListUpdated { sensors });
            }
            Err(e) => {
                warn!("failed to parse sensors: {}", e);
                self.events
                    .publish(Notification::SensorListUpdated { sensors: Vec::new() });
            }
        }
    }

    fn on_measurements_received(&mut self, bytes: &[u8]) {
        match gios::parse_measurements(bytes) {
            Ok(series) => {
                let key = series.key.clone();
                let values = series.values.clone();
                self.session.current_measurements = Some(series);

                let available = self.has_historical_data(
                    self.session.selected_station_id,
                    Some(self.session.selected_sensor_id),
                );
                self.events
                    .publish(Notification::HistoricalAvailabilityChanged { available });
                self.events
                    .publish(Notification::MeasurementsUpdated { key, values });
            }
            Err(e) => {
                warn!("failed to parse measurements: {}", e);
                self.events.publish(Notification::MeasurementsUpdated {
                    key: MEASUREMENTS_ERROR_KEY.to_string(),
                    values: Vec::new(),
                });
            }
        }
    }

    fn on_air_quality_received(&mut self, bytes: &[u8]) {
        match gios::parse_air_quality(bytes) {
            Ok(index) => {
                let text = format!(
                    "Indeks jakości powietrza: {} (dane z: {})",
                    index.index_level_name,
                    display_timestamp(&index.calc_date),
                );
                let color = index.color();
                self.session.current_air_quality = Some(index);

                let available = self.has_historical_data(self.session.selected_station_id, None);
                self.events
                    .publish(Notification::HistoricalAvailabilityChanged { available });
                self.events
                    .publish(Notification::AirQualityUpdated { text, color });
            }
            Err(e) => {
                warn!("failed to parse air quality index: {}", e);
                self.events.publish(Notification::AirQualityUpdated {
                    text: AIR_QUALITY_LOAD_FAILED.to_string(),
                    color: IndexColor::Red,
                });
            }
        }
    }
}

/// Renders an API/cache timestamp as `dd.MM.yyyy HH:mm`.
///
/// Accepts RFC 3339 and naive ISO-8601 with either `T` or a space between
/// date and time; anything else is shown as-is.
pub fn display_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%d.%m.%Y %H:%M";
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(DISPLAY).to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return dt.format(DISPLAY).to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_timestamp_space_separated() {
        assert_eq!(display_timestamp("2024-05-01 13:20:11"), "01.05.2024 13:20");
    }

    #[test]
    fn test_display_timestamp_t_separated_without_offset() {
        assert_eq!(display_timestamp("2024-12-31T07:05:00"), "31.12.2024 07:05");
    }

    #[test]
    fn test_display_timestamp_with_offset_keeps_local_wall_time() {
        assert_eq!(display_timestamp("2024-05-01T13:20:11+02:00"), "01.05.2024 13:20");
    }

    #[test]
    fn test_display_timestamp_unparsable_is_verbatim() {
        assert_eq!(display_timestamp("wczoraj"), "wczoraj");
        assert_eq!(display_timestamp(""), "");
    }
}
