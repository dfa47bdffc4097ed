//! Statistical summary types.

use serde::{Deserialize, Serialize};

use super::anomaly::Anomaly;
use super::pattern::TrendDirection;

/// Whether a summary was computed from usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    Ok,
    /// Fewer than two samples.
    InsufficientData,
    /// Every sample has the same value.
    Degenerate,
}

/// Descriptive statistics of a series snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub series_id: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub volatility: f64,
    pub trend: TrendDirection,
    pub anomalies: Vec<Anomaly>,
    pub status: DataStatus,
}

impl StatisticalSummary {
    /// Summary of a series with no samples.
    pub fn empty(series_id: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            count: 0,
            mean: 0.0,
            median: 0.0,
            mode: None,
            min: 0.0,
            max: 0.0,
            range: 0.0,
            q1: 0.0,
            q3: 0.0,
            variance: 0.0,
            std_dev: 0.0,
            skewness: 0.0,
            kurtosis: 0.0,
            volatility: 0.0,
            trend: TrendDirection::Stable,
            anomalies: Vec::new(),
            status: DataStatus::InsufficientData,
        }
    }
}
