//! Anomaly record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tiers, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnomalySeverity {
    /// Tier for a deviation that already exceeded `threshold`.
    pub fn classify(deviation: f64, threshold: f64) -> Self {
        if deviation > threshold * 3.0 {
            AnomalySeverity::Critical
        } else if deviation > threshold * 2.0 {
            AnomalySeverity::High
        } else if deviation > threshold * 1.5 {
            AnomalySeverity::Medium
        } else {
            AnomalySeverity::Low
        }
    }
}

/// How an anomaly relates to its neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Isolated sample at the edge of the series.
    Point,
    /// Isolated sample inside the series.
    Contextual,
    /// Part of a cluster of anomalous samples.
    Collective,
}

/// A sample that deviates from its trailing baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position in the scanned snapshot.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub expected_value: f64,
    /// Multiples of the baseline standard deviation; never negative.
    pub deviation: f64,
    pub severity: AnomalySeverity,
    pub kind: AnomalyKind,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_tiers() {
        let t = 2.5;
        assert_eq!(AnomalySeverity::classify(2.6, t), AnomalySeverity::Low);
        assert_eq!(AnomalySeverity::classify(4.0, t), AnomalySeverity::Medium);
        assert_eq!(AnomalySeverity::classify(5.5, t), AnomalySeverity::High);
        assert_eq!(AnomalySeverity::classify(7.6, t), AnomalySeverity::Critical);
    }

    #[test]
    fn test_severity_boundaries_are_exclusive() {
        let t = 2.0;
        assert_eq!(AnomalySeverity::classify(3.0, t), AnomalySeverity::Low);
        assert_eq!(AnomalySeverity::classify(4.0, t), AnomalySeverity::Medium);
        assert_eq!(AnomalySeverity::classify(6.0, t), AnomalySeverity::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(AnomalySeverity::Critical > AnomalySeverity::High);
        assert!(AnomalySeverity::Medium > AnomalySeverity::Low);
    }
}
