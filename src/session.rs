/// Session state: what the user has selected and the last data shown.
///
/// Only the orchestrator mutates this, and only on the owning thread.

use crate::model::{AirQualityIndex, MeasurementSeries, NO_SELECTION};

#[derive(Debug, Clone)]
pub struct SessionState {
    pub selected_station_id: i64,
    pub selected_sensor_id: i64,
    pub current_measurements: Option<MeasurementSeries>,
    pub current_air_quality: Option<AirQualityIndex>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selected_station_id: NO_SELECTION,
            selected_sensor_id: NO_SELECTION,
            current_measurements: None,
            current_air_quality: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter key of the current series, if any.
    pub fn current_measurement_key(&self) -> Option<&str> {
        self.current_measurements.as_ref().map(|s| s.key.as_str())
    }

    /// The station to attach a sensor lookup to; `None` for the sentinel.
    pub fn station(&self) -> Option<i64> {
        (self.selected_station_id >= 0).then_some(self.selected_station_id)
    }

    pub fn sensor(&self) -> Option<i64> {
        (self.selected_sensor_id >= 0).then_some(self.selected_sensor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_has_nothing_selected() {
        let state = SessionState::new();
        assert_eq!(state.selected_station_id, -1);
        assert_eq!(state.selected_sensor_id, -1);
        assert!(state.station().is_none());
        assert!(state.sensor().is_none());
        assert!(state.current_measurement_key().is_none());
        assert!(state.current_air_quality.is_none());
    }

    #[test]
    fn test_current_measurement_key_follows_series() {
        let state = SessionState {
            current_measurements: Some(MeasurementSeries {
                key: "SO2".to_string(),
                values: Vec::new(),
            }),
            ..SessionState::new()
        };
        assert_eq!(state.current_measurement_key(), Some("SO2"));
    }
}
