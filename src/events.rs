//! Notifications raised by the orchestrator for the UI layer.
//!
//! Each notification is a named event with a fixed payload. Subscribers
//! are plain callbacks invoked synchronously, in registration order, on the
//! thread that drives the orchestrator.

use serde::Serialize;

use crate::analysis::statistics::SeriesStatistics;
use crate::model::{IndexColor, MeasurementPoint, SensorEntry, StationEntry};

/// Events the UI layer can subscribe to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// The station list to show changed (fetch, search, show-all).
    StationListUpdated { stations: Vec<StationEntry> },
    /// Info panel text for the selected station.
    StationInfoUpdated { info: String },
    /// Sensors for the selected station; empty after a parse failure.
    SensorListUpdated { sensors: Vec<SensorEntry> },
    /// A measurement series to plot; key `"Error"` and no values after a
    /// parse failure.
    MeasurementsUpdated {
        key: String,
        values: Vec<MeasurementPoint>,
    },
    /// Air-quality index text and its display color.
    AirQualityUpdated { text: String, color: IndexColor },
    /// Whether a saved snapshot exists for the current selection.
    HistoricalAvailabilityChanged { available: bool },
    /// Statistics over the current series.
    AnalysisUpdated { statistics: SeriesStatistics },
}

impl Notification {
    /// Event name, as used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Notification::StationListUpdated { .. } => "station_list_updated",
            Notification::StationInfoUpdated { .. } => "station_info_updated",
            Notification::SensorListUpdated { .. } => "sensor_list_updated",
            Notification::MeasurementsUpdated { .. } => "measurements_updated",
            Notification::AirQualityUpdated { .. } => "air_quality_updated",
            Notification::HistoricalAvailabilityChanged { .. } => "historical_availability_changed",
            Notification::AnalysisUpdated { .. } => "analysis_updated",
        }
    }
}

/// Callback registered with the [`EventBus`].
pub type Subscriber = Box<dyn FnMut(&Notification)>;

/// Fan-out of notifications to every registered subscriber.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Notification) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, notification: Notification) {
        tracing::trace!(event = notification.name(), "publishing");
        for subscriber in &mut self.subscribers {
            subscriber(&notification);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
