//! Trend plus seasonal projection.

use pattern_api::ForecastConfig;
use pattern_spi::{ForecastPoint, ForecastResult, PatternError, Result};
use tracing::debug;

use crate::kernel;

/// Deterministic short-horizon forecaster.
///
/// Projects the slope of the most recent samples from the last observed
/// value, optionally adding a seasonal profile. Interval width grows with
/// `sqrt(step)` and shrinks with confidence.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Project `values` over `horizon` steps.
    ///
    /// `profile` is a zero-mean seasonal profile whose length is the period;
    /// it is phase-aligned so that index 0 is the first sample of `values`.
    pub fn project(
        &self,
        series_id: &str,
        values: &[f64],
        horizon: usize,
        profile: Option<&[f64]>,
    ) -> Result<ForecastResult> {
        if horizon > self.config.max_horizon {
            return Err(PatternError::invalid_parameter(
                "horizon",
                format!(
                    "{} exceeds the maximum of {}",
                    horizon, self.config.max_horizon
                ),
            ));
        }

        let n = values.len();
        let profile = profile.filter(|p| !p.is_empty());
        if n == 0 {
            return Ok(ForecastResult {
                series_id: series_id.to_string(),
                horizon,
                slope: 0.0,
                seasonal_period: None,
                points: Vec::new(),
            });
        }

        let recent = &values[n.saturating_sub(self.config.trend_window)..];
        let slope = kernel::linear_fit(recent).map_or(0.0, |fit| fit.slope);
        let volatility = kernel::std_dev(&kernel::differences(recent));
        let last = values[n - 1];

        let points = (1..=horizon)
            .map(|step| {
                let offset = profile.map_or(0.0, |p| {
                    p[(n - 1 + step) % p.len()] - p[(n - 1) % p.len()]
                });
                let value = last + slope * step as f64 + offset;
                let confidence = self.config.confidence_at(step);
                let half_width = self.config.z_score * volatility * (step as f64).sqrt()
                    / confidence.max(f64::EPSILON);
                ForecastPoint {
                    step,
                    value,
                    confidence,
                    lower: value - half_width,
                    upper: value + half_width,
                }
            })
            .collect();

        debug!(series = series_id, horizon, slope, volatility, "forecast projected");
        Ok(ForecastResult {
            series_id: series_id.to_string(),
            horizon,
            slope,
            seasonal_period: profile.map(|p| p.len()),
            points,
        })
    }
}
