//! Pattern Engine Service Provider Interface
//!
//! Defines the data model, the detector and clock contracts, and the error
//! type shared by every pattern engine crate.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Clock, PatternDetector, SystemClock};
pub use error::{PatternError, Result};
pub use model::{
    Anomaly, AnomalyAnalysis, AnomalyKind, AnomalySeverity, CorrelationDirection,
    CorrelationResult, CorrelationStrength, DataStatus, Detection, ForecastPoint, ForecastResult,
    Pattern, PatternDetail, PatternKey, PatternKind, PatternMetadata, PatternReport, Sample,
    SeasonType, SeasonalAnalysis, SeasonalDecomposition, SeasonalStrength, StatisticalSummary,
    TrendDirection,
};
