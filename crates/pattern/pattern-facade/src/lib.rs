//! Pattern Engine Facade
//!
//! High-level API for time-series pattern recognition. Re-exports all
//! public types from the pattern stack for convenient usage.

// Re-export everything from SPI, API and core
pub use pattern_api::*;
pub use pattern_core::*;
pub use pattern_spi::*;

// Re-export core modules for direct access
pub use pattern_core::{
    anomaly, catalog, clock, correlation, cycle, engine, forecast, kernel, seasonal, statistics,
    store, trend,
};

/// Commonly used types.
pub mod prelude {
    pub use pattern_api::{EngineConfig, EngineConfigBuilder};
    pub use pattern_core::{ManualClock, PatternEngine};
    pub use pattern_spi::{
        Anomaly, AnomalySeverity, Clock, CorrelationResult, ForecastResult, Pattern,
        PatternDetector, PatternError, PatternKey, PatternKind, Result, StatisticalSummary,
        SystemClock, TrendDirection,
    };
}
