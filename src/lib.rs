/// airmon_client: data core of a GIOS air-quality monitoring desktop client.
///
/// # Module structure
///
/// ```text
/// airmon_client
/// ├── model        — shared data types (Station, Sensor, MeasurementSeries, errors, …)
/// ├── config       — client configuration loader (airmon.toml + AIRMON_* env)
/// ├── stations     — in-memory station/sensor registry, search, display rows
/// ├── history      — local historical cache (per-station / per-sensor JSON snapshots)
/// ├── session      — current selection and last fetched data
/// ├── events       — notifications raised for the UI layer
/// ├── orchestrator — public operations; sequences fetch → parse → update → notify
/// ├── ingest
/// │   ├── gios     — GIOS API: URL construction + JSON parsing
/// │   ├── client   — Fetcher trait and reqwest-backed implementation
/// │   └── fixtures (test only) — representative API response payloads
/// └── analysis
///     └── statistics — average/median/min/max/count over a series
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod events;
pub mod history;
pub mod ingest;
pub mod model;
pub mod orchestrator;
pub mod session;
pub mod stations;

pub use events::Notification;
pub use orchestrator::Orchestrator;
