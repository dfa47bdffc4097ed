//! Autocorrelation-based cycle detection.

use pattern_api::CycleConfig;
use pattern_spi::{
    Detection, PatternDetail, PatternDetector, PatternKey, PatternKind, PatternMetadata,
};
use tracing::debug;

use crate::kernel::{self, EPSILON};

/// Dominant period found in a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantCycle {
    pub period: usize,
    pub autocorrelation: f64,
}

/// Cycle detector over lags `2..=min(len / 4, max_lag)`.
#[derive(Debug, Clone, Default)]
pub struct CycleDetector {
    config: CycleConfig,
}

impl CycleDetector {
    pub fn new(config: CycleConfig) -> Self {
        Self { config }
    }

    /// Lag with the highest autocorrelation, smallest lag on ties.
    pub fn dominant_cycle(&self, values: &[f64]) -> Option<DominantCycle> {
        let n = values.len();
        if n < self.config.min_samples {
            return None;
        }
        if kernel::variance(values) < EPSILON {
            return None;
        }

        let acf = kernel::autocorrelation(values, (n / 4).min(self.config.max_lag));
        strongest_lag(&acf).filter(|b| b.autocorrelation >= self.config.min_autocorrelation)
    }

    pub fn analyze(&self, series_id: &str, values: &[f64]) -> Option<Detection> {
        let cycle = self.dominant_cycle(values)?;
        let recent = &values[values.len() - cycle.period..];
        let max = recent.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = recent.iter().cloned().fold(f64::INFINITY, f64::min);

        debug!(
            series = series_id,
            period = cycle.period,
            autocorrelation = cycle.autocorrelation,
            "cycle detected"
        );
        Some(Detection::new(
            PatternKey::cycle(series_id),
            format!("Cyclical pattern with period of {} units", cycle.period),
            cycle.autocorrelation,
            PatternMetadata {
                amplitude: max - min,
                frequency: 1.0 / cycle.period as f64,
                phase: 0.0,
                period: Some(cycle.period),
                detail: PatternDetail::Cycle {
                    autocorrelation: cycle.autocorrelation,
                },
            },
        ))
    }
}

impl PatternDetector for CycleDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::Cycle
    }

    fn name(&self) -> &str {
        "autocorrelation_cycle"
    }

    fn detect(&self, series_id: &str, values: &[f64]) -> Vec<Detection> {
        self.analyze(series_id, values).into_iter().collect()
    }
}

/// Highest autocorrelation among lags `>= 2`; the smallest lag wins ties.
pub fn strongest_lag(acf: &[f64]) -> Option<DominantCycle> {
    let mut best: Option<DominantCycle> = None;
    for (lag, &value) in acf.iter().enumerate().skip(2) {
        if best.map_or(true, |b| value > b.autocorrelation) {
            best = Some(DominantCycle {
                period: lag,
                autocorrelation: value,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(period: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 10.0 * (2.0 * PI * i as f64 / period).sin() + 100.0)
            .collect()
    }

    #[test]
    fn test_detects_weekly_sine() {
        let detector = CycleDetector::default();
        let values = sine(7.0, 70);
        let detection = detector.analyze("s", &values).unwrap();
        assert_eq!(detection.metadata.period, Some(7));
        assert!(detection.confidence >= 0.5);
        assert!((detection.metadata.frequency - 1.0 / 7.0).abs() < 1e-12);
        assert!(detection.metadata.amplitude > 15.0);
    }

    #[test]
    fn test_strongest_lag_ties_go_to_smallest() {
        let acf = [1.0, 0.9, 0.6, 0.8, 0.8, 0.3, 0.8];
        let best = strongest_lag(&acf).unwrap();
        assert_eq!(best.period, 3);
        assert_eq!(best.autocorrelation, 0.8);
    }

    #[test]
    fn test_strongest_lag_skips_lags_below_two() {
        assert!(strongest_lag(&[1.0, 0.99]).is_none());
        assert_eq!(strongest_lag(&[1.0, 0.99, -0.2]).unwrap().period, 2);
    }

    #[test]
    fn test_alternating_prefers_smallest_lag() {
        let detector = CycleDetector::default();
        let values: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { 3.0 }).collect();
        let cycle = detector.dominant_cycle(&values).unwrap();
        assert_eq!(cycle.period, 2);
    }

    #[test]
    fn test_short_series() {
        let detector = CycleDetector::default();
        assert!(detector.analyze("s", &sine(7.0, 19)).is_none());
    }

    #[test]
    fn test_constant_series() {
        let detector = CycleDetector::default();
        assert!(detector.analyze("s", &[4.0; 50]).is_none());
    }

    #[test]
    fn test_linear_ramp_below_threshold_at_long_lags() {
        let detector = CycleDetector::new(CycleConfig {
            min_autocorrelation: 0.99,
            ..CycleConfig::default()
        });
        let values: Vec<f64> = (0..40).map(|i| i as f64).collect();
        assert!(detector.analyze("s", &values).is_none());
    }

    #[test]
    fn test_max_lag_bounds_search() {
        let detector = CycleDetector::new(CycleConfig::new(5, 0.5));
        let values = sine(7.0, 70);
        if let Some(cycle) = detector.dominant_cycle(&values) {
            assert!(cycle.period <= 5);
        }
    }
}
