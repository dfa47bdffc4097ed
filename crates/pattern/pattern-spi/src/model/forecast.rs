//! Forecast result types.

use serde::{Deserialize, Serialize};

/// A single projected step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based distance from the last observed sample.
    pub step: usize,
    pub value: f64,
    pub confidence: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Projection of a series over a horizon.
///
/// Confidence never increases with the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub series_id: String,
    pub horizon: usize,
    /// Slope of the short-window trend used for the projection.
    pub slope: f64,
    /// Period of the seasonal profile applied, if any.
    pub seasonal_period: Option<usize>,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
