//! Pattern Engine API
//!
//! Configuration types and builders for the pattern engine.

mod builder;
mod config;

pub use builder::EngineConfigBuilder;
pub use config::{
    AnomalyConfig, CorrelationConfig, CycleConfig, EngineConfig, ForecastConfig,
    SeasonalConfig, StatisticsConfig, StoreConfig, TrendConfig,
};

// Re-export SPI types
pub use pattern_spi::{PatternError, Result};
