//! Descriptive statistics.

use std::collections::HashMap;

use pattern_api::StatisticsConfig;
use pattern_spi::{DataStatus, StatisticalSummary, TrendDirection};

use crate::kernel::{self, EPSILON};

/// Computes [`StatisticalSummary`] values from a snapshot.
///
/// The trend label and anomaly list are left empty here; the engine fills
/// them in from the trend analyzer and anomaly detector.
#[derive(Debug, Clone, Default)]
pub struct DescriptiveStatistics {
    config: StatisticsConfig,
}

impl DescriptiveStatistics {
    pub fn new(config: StatisticsConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, series_id: &str, values: &[f64]) -> StatisticalSummary {
        let n = values.len();
        if n == 0 {
            return StatisticalSummary::empty(series_id);
        }

        let sorted = kernel::sorted(values);
        let min = sorted[0];
        let max = sorted[n - 1];
        let flat = min == max;
        let mean = kernel::mean(values);
        let variance = if flat { 0.0 } else { kernel::variance(values) };

        let status = if n < 2 {
            DataStatus::InsufficientData
        } else if flat {
            DataStatus::Degenerate
        } else {
            DataStatus::Ok
        };

        StatisticalSummary {
            series_id: series_id.to_string(),
            count: n,
            mean,
            median: kernel::median(values),
            mode: mode(values),
            min,
            max,
            range: (max - min).min(f64::MAX),
            q1: kernel::quantile_sorted(&sorted, 0.25),
            q3: kernel::quantile_sorted(&sorted, 0.75),
            variance,
            std_dev: if flat { 0.0 } else { kernel::std_dev(values) },
            skewness: if flat { 0.0 } else { skewness(values) },
            kurtosis: if flat { 0.0 } else { kurtosis(values) },
            volatility: self.volatility(values),
            trend: TrendDirection::Stable,
            anomalies: Vec::new(),
            status,
        }
    }

    /// Std dev of successive relative changes, annualized.
    pub fn volatility(&self, values: &[f64]) -> f64 {
        let returns: Vec<f64> = values
            .windows(2)
            .map(|w| {
                let change = (w[1] - w[0]) / w[0];
                if w[0].abs() < EPSILON || !change.is_finite() {
                    0.0
                } else {
                    change
                }
            })
            .collect();
        kernel::std_dev(&returns) * self.config.annualization_factor
    }
}

/// Most frequent value, earliest to reach the top count; `None` when every
/// value is distinct. `0.0` and `-0.0` count as the same value.
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut best: Option<(f64, usize)> = None;
    for &v in values {
        let v = if v == 0.0 { 0.0 } else { v };
        let count = counts.entry(v.to_bits()).or_insert(0);
        *count += 1;
        if best.map_or(true, |(_, c)| *count > c) {
            best = Some((v, *count));
        }
    }
    best.filter(|(_, c)| *c > 1).map(|(v, _)| v)
}

/// Adjusted Fisher-Pearson skewness (G1).
pub fn skewness(values: &[f64]) -> f64 {
    let (values, _) = kernel::rescaled(values);
    let values = values.as_ref();
    let n = values.len();
    let s = kernel::sample_std_dev(values);
    if n < 3 || s < EPSILON {
        return 0.0;
    }
    let m = kernel::mean(values);
    let nf = n as f64;
    let sum: f64 = values.iter().map(|x| ((x - m) / s).powi(3)).sum();
    nf / ((nf - 1.0) * (nf - 2.0)) * sum
}

/// Sample excess kurtosis (G2).
pub fn kurtosis(values: &[f64]) -> f64 {
    let (values, _) = kernel::rescaled(values);
    let values = values.as_ref();
    let n = values.len();
    let s = kernel::sample_std_dev(values);
    if n < 4 || s < EPSILON {
        return 0.0;
    }
    let m = kernel::mean(values);
    let nf = n as f64;
    let sum: f64 = values.iter().map(|x| ((x - m) / s).powi(4)).sum();
    nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum
        - 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_basic_summary() {
        let stats = DescriptiveStatistics::default();
        let s = stats.compute("s", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.count, 8);
        assert!(approx(s.mean, 5.0, 1e-12));
        assert!(approx(s.median, 4.5, 1e-12));
        assert_eq!(s.mode, Some(4.0));
        assert!(approx(s.variance, 4.0, 1e-12));
        assert!(approx(s.std_dev, 2.0, 1e-12));
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert_eq!(s.range, 7.0);
        assert_eq!(s.q1, 4.0);
        assert_eq!(s.q3, 7.0);
        assert_eq!(s.status, DataStatus::Ok);
    }

    #[test]
    fn test_skewness_and_kurtosis_reference() {
        // reference values from the adjusted estimators
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(skewness(&values), 0.8184875, 1e-6));
        assert!(approx(kurtosis(&values), 0.940625, 1e-6));
    }

    #[test]
    fn test_symmetric_has_zero_skew() {
        assert!(approx(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.0, 1e-12));
    }

    #[test]
    fn test_constant_series_is_degenerate() {
        let stats = DescriptiveStatistics::default();
        let s = stats.compute("flat", &[3.0; 12]);
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.skewness, 0.0);
        assert_eq!(s.kurtosis, 0.0);
        assert_eq!(s.volatility, 0.0);
        assert_eq!(s.mode, Some(3.0));
        assert_eq!(s.status, DataStatus::Degenerate);
    }

    #[test]
    fn test_single_sample() {
        let stats = DescriptiveStatistics::default();
        let s = stats.compute("one", &[42.0]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.status, DataStatus::InsufficientData);
    }

    #[test]
    fn test_empty() {
        let s = DescriptiveStatistics::default().compute("none", &[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.status, DataStatus::InsufficientData);
    }

    #[test]
    fn test_mode_none_when_distinct() {
        assert_eq!(mode(&[1.0, 2.0, 3.0]), None);
        // 2.0 reaches two occurrences before 1.0 does
        assert_eq!(mode(&[1.0, 2.0, 2.0, 1.0]), Some(2.0));
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_mode_treats_signed_zeros_as_equal() {
        assert_eq!(mode(&[-0.0, 1.0, 0.0]), Some(0.0));
        assert!(mode(&[0.0, -0.0]).is_some_and(|m| m.is_sign_positive()));
    }

    #[test]
    fn test_huge_values_summarize_finite() {
        let stats = DescriptiveStatistics::default();
        let s = stats.compute("big", &[1e308, -1.5e308, 1.7e308, 1e308]);
        for v in [s.mean, s.variance, s.std_dev, s.range, s.skewness, s.kurtosis, s.volatility] {
            assert!(v.is_finite(), "{:?}", s);
        }
        assert_eq!(s.status, DataStatus::Ok);
    }

    #[test]
    fn test_volatility() {
        let stats = DescriptiveStatistics::new(StatisticsConfig::new(1.0));
        // returns +10%, -10%: population std dev 0.1
        let v = stats.volatility(&[100.0, 110.0, 99.0]);
        assert!(approx(v, 0.1, 1e-12));
        assert_eq!(stats.volatility(&[0.0, 5.0, 5.0]), 0.0);
    }
}
