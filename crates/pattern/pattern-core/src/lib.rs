//! Pattern Engine Core
//!
//! Statistics kernel, analyzers, series store, pattern catalog and the
//! engine that ties them together.

pub mod anomaly;
pub mod catalog;
pub mod clock;
pub mod correlation;
pub mod cycle;
pub mod engine;
pub mod forecast;
pub mod kernel;
pub mod seasonal;
pub mod statistics;
pub mod store;
pub mod trend;

pub use anomaly::AnomalyDetector;
pub use catalog::PatternCatalog;
pub use clock::ManualClock;
pub use correlation::CorrelationAnalyzer;
pub use cycle::{CycleDetector, DominantCycle};
pub use engine::PatternEngine;
pub use forecast::Forecaster;
pub use kernel::LinearFit;
pub use seasonal::SeasonalDecomposer;
pub use statistics::DescriptiveStatistics;
pub use store::SeriesStore;
pub use trend::{TrendAnalyzer, TrendFit};
