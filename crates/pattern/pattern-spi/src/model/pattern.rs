//! Detected pattern types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::seasonal::{SeasonType, SeasonalStrength};

/// Kind of regularity a detector found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Trend,
    Cycle,
    Seasonal,
    Correlation,
}

impl PatternKind {
    /// Weight applied to confidence to obtain the predictive value.
    pub fn predictive_weight(&self) -> f64 {
        match self {
            PatternKind::Trend => 0.8,
            PatternKind::Cycle => 0.7,
            PatternKind::Seasonal => 0.9,
            PatternKind::Correlation => 0.6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Trend => "trend",
            PatternKind::Cycle => "cycle",
            PatternKind::Seasonal => "seasonal",
            PatternKind::Correlation => "correlation",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a linear trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Upward => f.write_str("upward"),
            TrendDirection::Downward => f.write_str("downward"),
            TrendDirection::Stable => f.write_str("stable"),
        }
    }
}

/// Catalog key: one entry per series, kind and discriminator.
///
/// Seasonal patterns are discriminated by period and correlation patterns
/// by partner series; trends and cycles have a single slot per series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    pub series_id: String,
    pub kind: PatternKind,
    pub discriminator: Option<String>,
}

impl PatternKey {
    pub fn new(
        series_id: impl Into<String>,
        kind: PatternKind,
        discriminator: Option<String>,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            kind,
            discriminator,
        }
    }

    pub fn trend(series_id: impl Into<String>) -> Self {
        Self::new(series_id, PatternKind::Trend, None)
    }

    pub fn cycle(series_id: impl Into<String>) -> Self {
        Self::new(series_id, PatternKind::Cycle, None)
    }

    pub fn seasonal(series_id: impl Into<String>, period: usize) -> Self {
        Self::new(series_id, PatternKind::Seasonal, Some(period.to_string()))
    }

    pub fn correlation(series_id: impl Into<String>, partner: impl Into<String>) -> Self {
        Self::new(series_id, PatternKind::Correlation, Some(partner.into()))
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.discriminator {
            Some(d) => write!(f, "{}:{}:{}", self.series_id, self.kind, d),
            None => write!(f, "{}:{}", self.series_id, self.kind),
        }
    }
}

/// Kind-specific measurements attached to a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternDetail {
    Trend {
        slope: f64,
        intercept: f64,
        direction: TrendDirection,
    },
    Cycle {
        autocorrelation: f64,
    },
    Seasonal {
        strength: f64,
        tier: SeasonalStrength,
        season: SeasonType,
        peak_phase: usize,
        trough_phase: usize,
        /// Calendar name of the peak phase, e.g. `"Monday"`.
        peak_label: String,
        trough_label: String,
        profile: Vec<f64>,
    },
    Correlation {
        partner: String,
        coefficient: f64,
        p_value: f64,
    },
}

/// Numeric metadata common to every pattern kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMetadata {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub period: Option<usize>,
    pub detail: PatternDetail,
}

/// Detector output before it is stamped by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub key: PatternKey,
    pub description: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub metadata: PatternMetadata,
}

impl Detection {
    pub fn new(
        key: PatternKey,
        description: impl Into<String>,
        confidence: f64,
        metadata: PatternMetadata,
    ) -> Self {
        Self {
            key,
            description: description.into(),
            confidence: confidence.clamp(0.0, 1.0),
            metadata,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.key.kind
    }

    pub fn predictive_value(&self) -> f64 {
        self.confidence * self.key.kind.predictive_weight()
    }
}

/// A catalogued pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub key: PatternKey,
    pub description: String,
    pub confidence: f64,
    pub metadata: PatternMetadata,
    pub predictive_value: f64,
    pub first_detected: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Pattern {
    /// Stamp a fresh detection.
    pub fn from_detection(detection: Detection, at: DateTime<Utc>) -> Self {
        let predictive_value = detection.predictive_value();
        Self {
            key: detection.key,
            description: detection.description,
            confidence: detection.confidence,
            metadata: detection.metadata,
            predictive_value,
            first_detected: at,
            last_updated: at,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.key.kind
    }

    pub fn series_id(&self) -> &str {
        &self.key.series_id
    }

    /// True when the detection carries the same measurements as this entry.
    pub fn matches(&self, detection: &Detection) -> bool {
        self.confidence == detection.confidence
            && self.metadata == detection.metadata
            && self.description == detection.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trend_detection(confidence: f64) -> Detection {
        Detection::new(
            PatternKey::trend("sales"),
            "Upward trend detected",
            confidence,
            PatternMetadata {
                amplitude: 1.0,
                frequency: 0.0,
                phase: 0.0,
                period: None,
                detail: PatternDetail::Trend {
                    slope: 1.0,
                    intercept: 0.0,
                    direction: TrendDirection::Upward,
                },
            },
        )
    }

    #[test]
    fn test_key_display() {
        assert_eq!(PatternKey::trend("a").to_string(), "a:trend");
        assert_eq!(PatternKey::seasonal("a", 7).to_string(), "a:seasonal:7");
        assert_eq!(
            PatternKey::correlation("a", "b").to_string(),
            "a:correlation:b"
        );
    }

    #[test]
    fn test_key_ordering_groups_series() {
        let mut keys = vec![
            PatternKey::seasonal("b", 7),
            PatternKey::trend("b"),
            PatternKey::cycle("a"),
            PatternKey::trend("a"),
        ];
        keys.sort();
        assert_eq!(keys[0], PatternKey::trend("a"));
        assert_eq!(keys[1], PatternKey::cycle("a"));
        assert_eq!(keys[2], PatternKey::trend("b"));
    }

    #[test]
    fn test_detection_clamps_confidence() {
        assert_eq!(trend_detection(1.7).confidence, 1.0);
        assert_eq!(trend_detection(-0.2).confidence, 0.0);
    }

    #[test]
    fn test_predictive_value_uses_kind_weight() {
        let detection = trend_detection(0.5);
        assert!((detection.predictive_value() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_pattern_from_detection_stamps_both_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let pattern = Pattern::from_detection(trend_detection(0.9), at);
        assert_eq!(pattern.first_detected, at);
        assert_eq!(pattern.last_updated, at);
        assert_eq!(pattern.kind(), PatternKind::Trend);
        assert_eq!(pattern.series_id(), "sales");
    }

    #[test]
    fn test_pattern_matches_detection() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let pattern = Pattern::from_detection(trend_detection(0.9), at);
        assert!(pattern.matches(&trend_detection(0.9)));
        assert!(!pattern.matches(&trend_detection(0.8)));
    }

    #[test]
    fn test_detail_serializes_with_kind_tag() {
        let detail = PatternDetail::Cycle {
            autocorrelation: 0.75,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "cycle");
        assert_eq!(json["autocorrelation"], 0.75);
    }
}
