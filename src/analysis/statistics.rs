/// Summary statistics over a measurement series.
///
/// Missing (`None`) points are skipped entirely: they count toward nothing,
/// including `count`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::MeasurementPoint;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Brak danych do analizy")]
    NoData,

    #[error("Brak ważnych danych do analizy")]
    NoValidData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl SeriesStatistics {
    /// Statistic name → display value; floats with two decimals.
    pub fn summary(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("average", format!("{:.2}", self.average)),
            ("median", format!("{:.2}", self.median)),
            ("min", format!("{:.2}", self.min)),
            ("max", format!("{:.2}", self.max)),
            ("count", self.count.to_string()),
        ])
    }
}

/// Average, median, min, max and count of the non-null values.
///
/// # Errors
/// - `AnalysisError::NoData` — the series has no points.
/// - `AnalysisError::NoValidData` — every point is null.
pub fn analyze(points: &[MeasurementPoint]) -> Result<SeriesStatistics, AnalysisError> {
    if points.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let mut values: Vec<f64> = points.iter().filter_map(|p| p.value).collect();
    if values.is_empty() {
        return Err(AnalysisError::NoValidData);
    }

    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let average = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };

    Ok(SeriesStatistics {
        average,
        median,
        min: values[0],
        max: values[count - 1],
        count,
    })
}
