//! Data models for the pattern engine.
//!
//! This module contains data structures shared by the store, the analyzers
//! and the catalog.

mod anomaly;
mod correlation;
mod forecast;
mod pattern;
mod report;
mod sample;
mod seasonal;
mod summary;

pub use anomaly::{Anomaly, AnomalyKind, AnomalySeverity};
pub use correlation::{CorrelationDirection, CorrelationResult, CorrelationStrength};
pub use forecast::{ForecastPoint, ForecastResult};
pub use pattern::{
    Detection, Pattern, PatternDetail, PatternKey, PatternKind, PatternMetadata, TrendDirection,
};
pub use report::{AnomalyAnalysis, PatternReport, SeasonalAnalysis};
pub use sample::Sample;
pub use seasonal::{SeasonType, SeasonalDecomposition, SeasonalStrength};
pub use summary::{DataStatus, StatisticalSummary};
