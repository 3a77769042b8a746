/// Data analysis for the air-quality client.
///
/// Submodules:
/// - `statistics` — average/median/min/max/count over the current series.

pub mod statistics;
