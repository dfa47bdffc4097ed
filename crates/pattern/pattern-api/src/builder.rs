//! Engine configuration builder.

use pattern_spi::Result;

use crate::{
    AnomalyConfig, CorrelationConfig, CycleConfig, EngineConfig, ForecastConfig,
    SeasonalConfig, StatisticsConfig, StoreConfig, TrendConfig,
};

/// Builder for [`EngineConfig`].
///
/// Starts from the defaults; `build` validates the result.
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Section Methods ==========

    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    pub fn statistics(mut self, statistics: StatisticsConfig) -> Self {
        self.config.statistics = statistics;
        self
    }

    pub fn trend(mut self, trend: TrendConfig) -> Self {
        self.config.trend = trend;
        self
    }

    pub fn cycle(mut self, cycle: CycleConfig) -> Self {
        self.config.cycle = cycle;
        self
    }

    pub fn seasonal(mut self, seasonal: SeasonalConfig) -> Self {
        self.config.seasonal = seasonal;
        self
    }

    pub fn anomaly(mut self, anomaly: AnomalyConfig) -> Self {
        self.config.anomaly = anomaly;
        self
    }

    pub fn correlation(mut self, correlation: CorrelationConfig) -> Self {
        self.config.correlation = correlation;
        self
    }

    pub fn forecast(mut self, forecast: ForecastConfig) -> Self {
        self.config.forecast = forecast;
        self
    }

    // ========== Shortcut Methods ==========

    /// Set the per-series sample capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.store.capacity = capacity;
        self
    }

    /// Replace the seasonal candidate periods.
    pub fn candidate_periods(mut self, periods: Vec<usize>) -> Self {
        self.config.seasonal.candidate_periods = periods;
        self
    }

    /// Set the anomaly threshold in standard deviations.
    pub fn threshold_sigma(mut self, threshold: f64) -> Self {
        self.config.anomaly.threshold_sigma = threshold;
        self
    }

    /// Fix the anomaly window instead of deriving it from the series length.
    pub fn anomaly_window(mut self, window: usize) -> Self {
        self.config.anomaly.window = Some(window);
        self
    }

    pub fn max_horizon(mut self, max_horizon: usize) -> Self {
        self.config.forecast.max_horizon = max_horizon;
        self
    }

    pub fn detect_on_ingest(mut self, enabled: bool) -> Self {
        self.config.detect_on_ingest = enabled;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
