//! Least-squares trend analysis.

use pattern_api::TrendConfig;
use pattern_spi::{
    Detection, PatternDetail, PatternDetector, PatternKey, PatternKind, PatternMetadata,
    TrendDirection,
};
use tracing::debug;

use crate::kernel::{self, EPSILON};

/// Result of fitting a line to a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    /// `1 - mean|residual| / |mean|`, clamped to `[0, 1]`.
    pub confidence: f64,
    pub direction: TrendDirection,
}

/// Linear trend detector.
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Fit a line regardless of quality; `None` below two samples.
    pub fn fit(&self, values: &[f64]) -> Option<TrendFit> {
        let line = kernel::linear_fit(values)?;
        let mean = kernel::mean(values);
        let residuals = line.residuals(values);
        let mean_residual = residuals.iter().map(|r| r.abs()).sum::<f64>() / values.len() as f64;

        let confidence = if mean.abs() < EPSILON {
            if mean_residual < EPSILON {
                1.0
            } else {
                0.0
            }
        } else {
            (1.0 - mean_residual / mean.abs()).clamp(0.0, 1.0)
        };

        let direction = if line.slope.abs() <= self.config.stable_ratio * mean.abs() {
            TrendDirection::Stable
        } else if line.slope > 0.0 {
            TrendDirection::Upward
        } else {
            TrendDirection::Downward
        };

        Some(TrendFit {
            slope: line.slope,
            intercept: line.intercept,
            confidence,
            direction,
        })
    }

    /// Direction label for a summary; stable when no line can be fitted.
    pub fn direction(&self, values: &[f64]) -> TrendDirection {
        self.fit(values)
            .map(|fit| fit.direction)
            .unwrap_or(TrendDirection::Stable)
    }

    /// Report a trend when the series is long enough and the fit is good.
    pub fn analyze(&self, series_id: &str, values: &[f64]) -> Option<Detection> {
        if values.len() < self.config.min_samples {
            return None;
        }
        let fit = self.fit(values)?;
        if fit.confidence < self.config.min_confidence {
            debug!(series = series_id, confidence = fit.confidence, "trend fit too weak");
            return None;
        }
        if fit.direction == TrendDirection::Stable {
            return None;
        }

        let description = match fit.direction {
            TrendDirection::Upward => "Upward trend detected",
            _ => "Downward trend detected",
        };
        debug!(
            series = series_id,
            slope = fit.slope,
            confidence = fit.confidence,
            "trend detected"
        );
        Some(Detection::new(
            PatternKey::trend(series_id),
            description,
            fit.confidence,
            PatternMetadata {
                amplitude: fit.slope.abs(),
                frequency: 0.0,
                phase: 0.0,
                period: None,
                detail: PatternDetail::Trend {
                    slope: fit.slope,
                    intercept: fit.intercept,
                    direction: fit.direction,
                },
            },
        ))
    }
}

impl PatternDetector for TrendAnalyzer {
    fn kind(&self) -> PatternKind {
        PatternKind::Trend
    }

    fn name(&self) -> &str {
        "linear_trend"
    }

    fn detect(&self, series_id: &str, values: &[f64]) -> Vec<Detection> {
        self.analyze(series_id, values).into_iter().collect()
    }
}
