//! Catalog-wide report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::anomaly::AnomalySeverity;
use super::pattern::PatternKind;
use super::seasonal::SeasonType;

/// Aggregate view over every catalogued pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub generated_at: DateTime<Utc>,
    pub total_patterns: usize,
    pub by_kind: BTreeMap<PatternKind, usize>,
    /// Patterns with confidence above 0.8.
    pub high_confidence_patterns: usize,
    /// Patterns first detected within the last seven days.
    pub recent_patterns: usize,
    pub series_tracked: usize,
    pub anomaly_analysis: AnomalyAnalysis,
    pub seasonal_analysis: SeasonalAnalysis,
    pub recommendations: Vec<String>,
}

/// Anomalies found by a default-parameter scan of every tracked series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAnalysis {
    pub total_anomalies: usize,
    pub by_severity: BTreeMap<AnomalySeverity, usize>,
    /// Anomalies whose sample is stamped within the last seven days.
    pub recent_anomalies: usize,
    /// Anomalies per scanned sample, in `[0, 1]`.
    pub anomaly_rate: f64,
}

/// Breakdown of the catalogued seasonal patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAnalysis {
    pub total_seasonal_patterns: usize,
    pub by_season: BTreeMap<SeasonType, usize>,
    /// Mean confidence of the seasonal patterns; 0 when there are none.
    pub average_confidence: f64,
}
