//! Integration tests for the pattern engine stack
//!
//! Exercises the analyzers through the facade re-exports, plus property
//! tests for the numeric invariants.

use chrono::{TimeZone, Utc};
use pattern_facade::{
    kernel, AnomalyDetector, CorrelationAnalyzer, CycleDetector, DescriptiveStatistics,
    EngineConfig, Forecaster, PatternDetector, PatternEngine, PatternKind, Sample,
    SeasonalDecomposer, SeriesStore, TrendAnalyzer,
};
use proptest::prelude::*;

fn samples(values: &[f64]) -> Vec<Sample> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Sample::new(start + chrono::Duration::hours(i as i64), *v))
        .collect()
}

#[test]
fn test_detectors_are_pluggable() {
    let detectors: Vec<Box<dyn PatternDetector>> = vec![
        Box::new(TrendAnalyzer::default()),
        Box::new(CycleDetector::default()),
    ];
    let values: Vec<f64> = (0..60)
        .map(|i| i as f64 + if i % 4 < 2 { 5.0 } else { -5.0 })
        .collect();

    let kinds: Vec<PatternKind> = detectors
        .iter()
        .flat_map(|d| d.detect("s", &values))
        .map(|d| d.kind())
        .collect();
    assert!(kinds.contains(&PatternKind::Cycle));
}

#[test]
fn test_store_feeds_statistics() {
    let store = SeriesStore::new(100);
    for s in samples(&[1.0, 2.0, 3.0, 4.0]) {
        store.append("s", s).unwrap();
    }
    let summary = DescriptiveStatistics::default().compute("s", &store.get("s"));
    assert_eq!(summary.count, 4);
    assert_eq!(summary.mean, 2.5);
    assert_eq!(summary.median, 2.5);
}

#[test]
fn test_seasonal_then_forecast() {
    let values: Vec<f64> = (0..48)
        .map(|i| [5.0, 1.0, -2.0, -4.0][i % 4] + 50.0)
        .collect();
    let decomposition = SeasonalDecomposer::default()
        .decompose(&values, 4)
        .unwrap();
    assert!(decomposition.strength > 0.99);
    assert_eq!(decomposition.peak_phase, 0);
    assert_eq!(decomposition.trough_phase, 3);

    let forecast = Forecaster::default()
        .project("s", &values, 4, Some(decomposition.profile.as_slice()))
        .unwrap();
    let expected = [55.0, 51.0, 48.0, 46.0];
    for (point, want) in forecast.points.iter().zip(expected) {
        assert!((point.value - want).abs() < 0.5, "{} vs {}", point.value, want);
    }
}

#[test]
fn test_anomaly_window_excludes_current_sample() {
    let values = [10.0, 10.0, 10.0, 10.0, 10.0, 30.0];
    let anomalies = AnomalyDetector::default()
        .scan(&samples(&values), Some(5), Some(2.5))
        .unwrap();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].expected_value, 10.0);
}

#[test]
fn test_correlation_matrix_through_engine() {
    let engine = PatternEngine::new(EngineConfig::default()).unwrap();
    engine.ingest_many("x", (0..20).map(|i| i as f64)).unwrap();
    engine.ingest_many("y", (0..20).map(|i| -(i as f64))).unwrap();
    engine
        .ingest_many("z", (0..20).map(|i| ((i * 7) % 5) as f64))
        .unwrap();

    let matrix = engine.correlation_matrix(&[]);
    assert_eq!(matrix.len(), 3);
    assert_eq!(
        (matrix[0].series_a.as_str(), matrix[0].series_b.as_str()),
        ("x", "y")
    );
    assert!((matrix[0].coefficient + 1.0).abs() < 1e-12);
    assert!(matrix[0].significant);

    let direct = CorrelationAnalyzer::default().correlate(
        "x",
        &engine.values("x"),
        "y",
        &engine.values("y"),
    );
    assert_eq!(direct.coefficient, matrix[0].coefficient);
}

fn finite_series(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e4..1.0e4f64, min_len..120)
}

proptest! {
    #[test]
    fn prop_correlation_bounded(a in finite_series(0), b in finite_series(0)) {
        let result = CorrelationAnalyzer::default().correlate("a", &a, "b", &b);
        prop_assert!(result.coefficient.is_finite());
        prop_assert!((-1.0..=1.0).contains(&result.coefficient));
        prop_assert!((0.0..=1.0).contains(&result.p_value));
    }

    #[test]
    fn prop_anomaly_deviation_non_negative(values in finite_series(0), window in 1usize..20) {
        let anomalies = AnomalyDetector::default()
            .scan(&samples(&values), Some(window), None)
            .unwrap();
        for a in anomalies {
            prop_assert!(a.deviation >= 0.0);
            prop_assert!(a.index >= window);
        }
    }

    #[test]
    fn prop_seasonal_round_trip(values in finite_series(8), period in 2usize..5) {
        if let Some(d) = SeasonalDecomposer::default().decompose(&values, period) {
            prop_assert!((0.0..=1.0).contains(&d.strength));
            for (i, v) in values.iter().enumerate() {
                let rebuilt = d.profile[i % period] + d.deseasonalized[i];
                prop_assert!((rebuilt - v).abs() <= 1e-6 * (1.0 + v.abs()));
            }
        }
    }

    #[test]
    fn prop_forecast_confidence_non_increasing(values in finite_series(1), horizon in 1usize..50) {
        let forecast = Forecaster::default().project("s", &values, horizon, None).unwrap();
        prop_assert_eq!(forecast.points.len(), horizon);
        for pair in forecast.points.windows(2) {
            prop_assert!(pair[1].confidence <= pair[0].confidence);
        }
        for p in &forecast.points {
            prop_assert!(p.lower <= p.value && p.value <= p.upper);
        }
    }

    #[test]
    fn prop_trend_confidence_in_unit_interval(values in finite_series(2)) {
        if let Some(fit) = TrendAnalyzer::default().fit(&values) {
            prop_assert!((0.0..=1.0).contains(&fit.confidence));
        }
    }

    #[test]
    fn prop_variance_non_negative(values in finite_series(0)) {
        let summary = DescriptiveStatistics::default().compute("s", &values);
        prop_assert!(summary.variance >= 0.0);
        prop_assert!((summary.std_dev - summary.variance.sqrt()).abs() < 1e-9);
        prop_assert!(kernel::variance(&values) >= 0.0);
    }
}
