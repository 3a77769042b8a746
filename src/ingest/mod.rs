/// API ingestion for the air-quality client.
///
/// - `gios`    — endpoint URL construction + JSON parsing
/// - `client`  — `Fetcher` trait and the live `reqwest` implementation
/// - `fixtures` (test only) — representative API response payloads

pub mod client;
pub mod gios;

#[cfg(test)]
pub(crate) mod fixtures;
