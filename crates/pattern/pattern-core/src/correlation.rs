//! Cross-series Pearson correlation.

use pattern_api::CorrelationConfig;
use pattern_spi::{
    CorrelationDirection, CorrelationResult, CorrelationStrength, Detection, PatternDetail,
    PatternKey, PatternMetadata,
};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, warn};

use crate::kernel;

/// Pearson correlation with a Student's t significance test.
///
/// Series of different lengths are aligned by truncating both to the
/// shorter one from index 0; timestamps are not consulted.
#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    config: CorrelationConfig,
}

impl CorrelationAnalyzer {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    pub fn correlate(
        &self,
        series_a: &str,
        a: &[f64],
        series_b: &str,
        b: &[f64],
    ) -> CorrelationResult {
        let sample_size = a.len().min(b.len());
        let coefficient = kernel::pearson(a, b);
        let p_value = p_value(coefficient, sample_size);

        debug!(
            series_a,
            series_b,
            coefficient,
            p_value,
            sample_size,
            "correlation computed"
        );
        CorrelationResult {
            series_a: series_a.to_string(),
            series_b: series_b.to_string(),
            coefficient,
            strength: CorrelationStrength::from_coefficient(coefficient),
            direction: CorrelationDirection::from_coefficient(coefficient),
            p_value,
            significant: p_value < self.config.significance_level,
            sample_size,
        }
    }

    /// Every unordered pair of `series`, strongest `|r|` first.
    pub fn matrix(&self, series: &[(String, Vec<f64>)]) -> Vec<CorrelationResult> {
        let mut results = Vec::new();
        for (i, (id_a, a)) in series.iter().enumerate() {
            for (id_b, b) in series.iter().skip(i + 1) {
                results.push(self.correlate(id_a, a, id_b, b));
            }
        }
        results.sort_by(|x, y| y.coefficient.abs().total_cmp(&x.coefficient.abs()));
        results
    }

    /// Correlation pattern for `series_a`, keyed by its partner, when `|r|`
    /// clears the configured threshold.
    pub fn pattern(&self, result: &CorrelationResult) -> Option<Detection> {
        let r = result.coefficient;
        if r.abs() <= self.config.pattern_threshold {
            return None;
        }
        let qualifier = if r.abs() > 0.7 { "Strong" } else { "Moderate" };
        let direction = if r > 0.0 { "positive" } else { "negative" };

        Some(Detection::new(
            PatternKey::correlation(&result.series_a, &result.series_b),
            format!(
                "{} {} correlation with {}",
                qualifier, direction, result.series_b
            ),
            r.abs(),
            PatternMetadata {
                amplitude: r.abs(),
                frequency: 0.0,
                phase: 0.0,
                period: None,
                detail: PatternDetail::Correlation {
                    partner: result.series_b.clone(),
                    coefficient: r,
                    p_value: result.p_value,
                },
            },
        ))
    }
}

/// Two-sided p-value of `r` over `n` aligned samples.
pub fn p_value(r: f64, n: usize) -> f64 {
    if n < 3 || !r.is_finite() {
        return 1.0;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    if t.is_nan() {
        return 1.0;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(e) => {
            warn!(df, error = %e, "student t distribution unavailable");
            1.0
        }
    }
}
