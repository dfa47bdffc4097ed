//! Moving-baseline anomaly detection.

use pattern_api::AnomalyConfig;
use pattern_spi::{Anomaly, AnomalyKind, AnomalySeverity, PatternError, Result, Sample};
use tracing::debug;

use crate::kernel::{self, EPSILON};

/// Absolute floor for the baseline standard deviation.
const MIN_SIGMA: f64 = 1e-9;

/// Flags samples that deviate from the `window` samples before them.
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

/// A flagged index before classification.
struct Candidate {
    index: usize,
    expected: f64,
    deviation: f64,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Scan `samples` with an explicit or configured window and threshold.
    ///
    /// The baseline for sample `i` is `samples[i - window..i]`; the tested
    /// sample never contributes to its own baseline.
    pub fn scan(
        &self,
        samples: &[Sample],
        window: Option<usize>,
        threshold: Option<f64>,
    ) -> Result<Vec<Anomaly>> {
        let window = window.unwrap_or_else(|| self.config.window_for(samples.len()));
        let threshold = threshold.unwrap_or(self.config.threshold_sigma);
        if window == 0 {
            return Err(PatternError::invalid_parameter(
                "window",
                "must be at least 1",
            ));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(PatternError::invalid_parameter(
                "threshold",
                format!("must be positive and finite, got {}", threshold),
            ));
        }

        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        let candidates: Vec<Candidate> = (window..values.len())
            .filter_map(|i| {
                let baseline = &values[i - window..i];
                let expected = kernel::mean(baseline);
                let deviation = self.deviation(values[i], expected, kernel::std_dev(baseline));
                (deviation > threshold).then_some(Candidate {
                    index: i,
                    expected,
                    deviation,
                })
            })
            .collect();

        let anomalies: Vec<Anomaly> = candidates
            .iter()
            .map(|c| {
                let neighbours = candidates
                    .iter()
                    .filter(|o| o.index != c.index && o.index.abs_diff(c.index) <= window)
                    .count();
                let kind = if neighbours >= self.config.collective_neighbors {
                    AnomalyKind::Collective
                } else if c.index > 0 && c.index < values.len() - 1 {
                    AnomalyKind::Contextual
                } else {
                    AnomalyKind::Point
                };
                let value = values[c.index];
                Anomaly {
                    index: c.index,
                    timestamp: samples[c.index].timestamp,
                    value,
                    expected_value: c.expected,
                    deviation: c.deviation,
                    severity: AnomalySeverity::classify(c.deviation, threshold),
                    kind,
                    explanation: explain(value, c.expected, c.deviation),
                }
            })
            .collect();

        debug!(
            samples = values.len(),
            window,
            threshold,
            found = anomalies.len(),
            "anomaly scan complete"
        );
        Ok(anomalies)
    }

    /// Distance from the baseline mean in floored standard deviations.
    fn deviation(&self, value: f64, expected: f64, std_dev: f64) -> f64 {
        if (value - expected).abs() < EPSILON {
            return 0.0;
        }
        let sigma = std_dev
            .max(self.config.min_std_ratio * expected.abs())
            .max(MIN_SIGMA);
        ((value - expected).abs() / sigma).min(f64::MAX)
    }
}

fn explain(value: f64, expected: f64, deviation: f64) -> String {
    if expected.abs() < EPSILON {
        return format!(
            "Value {:.2} is {:.1} standard deviations from the expected {:.2}",
            value, deviation, expected
        );
    }
    let percent = ((value - expected) / expected.abs() * 100.0).abs().round();
    let side = if value > expected { "higher" } else { "lower" };
    format!(
        "Value is {}% {} than expected ({:.2} vs {:.2})",
        percent, side, value, expected
    )
}
