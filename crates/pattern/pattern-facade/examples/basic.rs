//! Basic example demonstrating the pattern engine
//!
//! Run with: cargo run --example basic -p pattern-facade

use std::f64::consts::PI;

use pattern_facade::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== pattern-engine Basic Examples ===\n");

    let engine = PatternEngine::new(EngineConfig::default())?;

    // Weekly sales with a gentle upward drift and one outlier
    let mut sales: Vec<f64> = (0..70)
        .map(|i| 100.0 + 0.4 * i as f64 + 12.0 * (2.0 * PI * i as f64 / 7.0).sin())
        .collect();
    sales[50] = 220.0;
    engine.ingest_many("sales", sales)?;

    // Visitors track the same weekly shape
    engine.ingest_many(
        "visitors",
        (0..70).map(|i| 40.0 + 5.0 * (2.0 * PI * i as f64 / 7.0).sin()),
    )?;

    // 1. Summary
    let summary = engine.get_summary("sales");
    println!("1. Summary for 'sales'");
    println!(
        "   n={} mean={:.2} std={:.2} trend={:?}\n",
        summary.count, summary.mean, summary.std_dev, summary.trend
    );

    // 2. Patterns
    println!("2. Detected patterns");
    for pattern in engine.detect_all_patterns() {
        println!(
            "   [{}] {} (confidence {:.2})",
            pattern.series_id(),
            pattern.description,
            pattern.confidence
        );
    }
    println!();

    // 3. Anomalies
    println!("3. Anomalies (window=7, threshold=3.0)");
    for anomaly in engine.scan_anomalies("sales", Some(7), Some(3.0))? {
        println!(
            "   #{} {:?}: {}",
            anomaly.index, anomaly.severity, anomaly.explanation
        );
    }
    println!();

    // 4. Forecast
    println!("4. Forecast for 'sales'");
    let forecast = engine.forecast("sales", 7)?;
    for point in &forecast.points {
        println!(
            "   t+{} {:.2} [{:.2}, {:.2}] confidence {:.2}",
            point.step, point.value, point.lower, point.upper, point.confidence
        );
    }
    println!();

    // 5. Report
    let report = engine.report();
    println!("5. Report");
    println!(
        "   {} patterns across {} series, {} high confidence",
        report.total_patterns, report.series_tracked, report.high_confidence_patterns
    );
    for recommendation in &report.recommendations {
        println!("   - {}", recommendation);
    }

    println!("\n=== Examples Complete ===");
    Ok(())
}
