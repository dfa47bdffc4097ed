//! Engine configuration types.
//!
//! Every section deserializes with defaults for missing fields and rejects
//! unknown ones, so a partial TOML or JSON file is enough to override a
//! single knob.

use std::path::Path;

use pattern_spi::{PatternError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Store Configuration
// ============================================================================

/// Series buffer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Samples retained per series before the oldest is evicted (default: 1000).
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

impl StoreConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

// ============================================================================
// Analyzer Configuration
// ============================================================================

/// Descriptive statistics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticsConfig {
    /// Multiplier applied to the std dev of relative changes (default: sqrt(252)).
    pub annualization_factor: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            annualization_factor: 252f64.sqrt(),
        }
    }
}

impl StatisticsConfig {
    pub fn new(annualization_factor: f64) -> Self {
        Self {
            annualization_factor,
        }
    }
}

/// Linear trend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendConfig {
    /// Fewer samples than this yield no trend (default: 10).
    pub min_samples: usize,
    /// Fits below this confidence are discarded (default: 0.6).
    pub min_confidence: f64,
    /// Slopes within this fraction of `|mean|` are stable (default: 0.001).
    pub stable_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            min_confidence: 0.6,
            stable_ratio: 0.001,
        }
    }
}

impl TrendConfig {
    pub fn new(min_samples: usize, min_confidence: f64) -> Self {
        Self {
            min_samples,
            min_confidence,
            ..Self::default()
        }
    }
}

/// Autocorrelation cycle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Fewer samples than this yield no cycle (default: 20).
    pub min_samples: usize,
    /// Largest lag examined (default: 100).
    pub max_lag: usize,
    /// Weakest autocorrelation reported as a cycle (default: 0.5).
    pub min_autocorrelation: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_samples: 20,
            max_lag: 100,
            min_autocorrelation: 0.5,
        }
    }
}

impl CycleConfig {
    pub fn new(max_lag: usize, min_autocorrelation: f64) -> Self {
        Self {
            max_lag,
            min_autocorrelation,
            ..Self::default()
        }
    }
}

/// Seasonal decomposition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonalConfig {
    /// Periods tried on every detection pass (default: 7, 12, 30, 90).
    pub candidate_periods: Vec<usize>,
    /// Weakest strength reported as a seasonal pattern (default: 0.1).
    pub min_strength: f64,
    /// Also try the period found by the cycle detector (default: true).
    pub include_cycle_period: bool,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            candidate_periods: vec![7, 12, 30, 90],
            min_strength: 0.1,
            include_cycle_period: true,
        }
    }
}

impl SeasonalConfig {
    pub fn new(candidate_periods: Vec<usize>) -> Self {
        Self {
            candidate_periods,
            ..Self::default()
        }
    }
}

/// Moving-baseline anomaly configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnomalyConfig {
    /// Fixed trailing window; derived from the series length when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
    /// Lower bound of the derived window (default: 5).
    pub min_window: usize,
    /// Upper bound of the derived window (default: 30).
    pub max_window: usize,
    /// Deviation in standard deviations that flags a sample (default: 2.5).
    pub threshold_sigma: f64,
    /// Floor for the baseline std dev as a fraction of `|mean|` (default: 0.01).
    pub min_std_ratio: f64,
    /// Other anomalies within the window that make one collective (default: 3).
    pub collective_neighbors: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window: None,
            min_window: 5,
            max_window: 30,
            threshold_sigma: 2.5,
            min_std_ratio: 0.01,
            collective_neighbors: 3,
        }
    }
}

impl AnomalyConfig {
    pub fn new(window: usize, threshold_sigma: f64) -> Self {
        Self {
            window: Some(window),
            threshold_sigma,
            ..Self::default()
        }
    }

    /// Window used for a series of `len` samples.
    pub fn window_for(&self, len: usize) -> usize {
        self.window
            .unwrap_or_else(|| (len / 10).clamp(self.min_window, self.max_window))
    }
}

/// Cross-series correlation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrelationConfig {
    /// p-value below which a coefficient is significant (default: 0.05).
    pub significance_level: f64,
    /// `|r|` above which a correlation pattern is catalogued (default: 0.5).
    pub pattern_threshold: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            pattern_threshold: 0.5,
        }
    }
}

impl CorrelationConfig {
    pub fn new(significance_level: f64, pattern_threshold: f64) -> Self {
        Self {
            significance_level,
            pattern_threshold,
        }
    }
}

/// Forecast configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Most recent samples used for the slope and volatility (default: 30).
    pub trend_window: usize,
    /// Confidence of the first step (default: 0.9).
    pub initial_confidence: f64,
    /// Confidence lost per step (default: 0.05).
    pub confidence_decay: f64,
    /// Confidence never drops below this (default: 0.3).
    pub confidence_floor: f64,
    /// Interval width in standard deviations (default: 1.96).
    pub z_score: f64,
    /// Largest accepted horizon (default: 1000).
    pub max_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            trend_window: 30,
            initial_confidence: 0.9,
            confidence_decay: 0.05,
            confidence_floor: 0.3,
            z_score: 1.96,
            max_horizon: 1000,
        }
    }
}

impl ForecastConfig {
    pub fn new(trend_window: usize, z_score: f64) -> Self {
        Self {
            trend_window,
            z_score,
            ..Self::default()
        }
    }

    /// Confidence at `step`, 1-based.
    pub fn confidence_at(&self, step: usize) -> f64 {
        (self.initial_confidence - self.confidence_decay * step as f64)
            .max(self.confidence_floor)
            .clamp(0.0, 1.0)
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Re-run detection for a series after each ingest (default: false).
    pub detect_on_ingest: bool,
    pub store: StoreConfig,
    pub statistics: StatisticsConfig,
    pub trend: TrendConfig,
    pub cycle: CycleConfig,
    pub seasonal: SeasonalConfig,
    pub anomaly: AnomalyConfig,
    pub correlation: CorrelationConfig,
    pub forecast: ForecastConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every section, reporting the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.store.capacity == 0 {
            return Err(PatternError::invalid_parameter(
                "store.capacity",
                "must be at least 1",
            ));
        }
        check_positive("statistics.annualization_factor", self.statistics.annualization_factor)?;

        if self.trend.min_samples < 2 {
            return Err(PatternError::invalid_parameter(
                "trend.min_samples",
                "must be at least 2",
            ));
        }
        check_unit("trend.min_confidence", self.trend.min_confidence)?;
        check_non_negative("trend.stable_ratio", self.trend.stable_ratio)?;

        if self.cycle.max_lag < 2 {
            return Err(PatternError::invalid_parameter(
                "cycle.max_lag",
                "must be at least 2",
            ));
        }
        check_unit("cycle.min_autocorrelation", self.cycle.min_autocorrelation)?;

        if let Some(p) = self.seasonal.candidate_periods.iter().find(|&&p| p < 2) {
            return Err(PatternError::invalid_parameter(
                "seasonal.candidate_periods",
                format!("period {} is shorter than 2", p),
            ));
        }
        check_unit("seasonal.min_strength", self.seasonal.min_strength)?;

        if self.anomaly.window == Some(0) {
            return Err(PatternError::invalid_parameter(
                "anomaly.window",
                "must be at least 1",
            ));
        }
        if self.anomaly.min_window == 0 || self.anomaly.min_window > self.anomaly.max_window {
            return Err(PatternError::invalid_parameter(
                "anomaly.min_window",
                "must be between 1 and anomaly.max_window",
            ));
        }
        check_positive("anomaly.threshold_sigma", self.anomaly.threshold_sigma)?;
        check_non_negative("anomaly.min_std_ratio", self.anomaly.min_std_ratio)?;

        check_unit("correlation.significance_level", self.correlation.significance_level)?;
        check_unit("correlation.pattern_threshold", self.correlation.pattern_threshold)?;

        if self.forecast.trend_window < 2 {
            return Err(PatternError::invalid_parameter(
                "forecast.trend_window",
                "must be at least 2",
            ));
        }
        check_unit("forecast.initial_confidence", self.forecast.initial_confidence)?;
        check_unit("forecast.confidence_floor", self.forecast.confidence_floor)?;
        check_non_negative("forecast.confidence_decay", self.forecast.confidence_decay)?;
        check_positive("forecast.z_score", self.forecast.z_score)?;
        if self.forecast.max_horizon == 0 {
            return Err(PatternError::invalid_parameter(
                "forecast.max_horizon",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| PatternError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| PatternError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PatternError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(PatternError::InvalidConfig(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PatternError::InvalidConfig(e.to_string()))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PatternError::invalid_parameter(
            name,
            format!("must be positive and finite, got {}", value),
        ));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PatternError::invalid_parameter(
            name,
            format!("must be non-negative and finite, got {}", value),
        ));
    }
    Ok(())
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PatternError::invalid_parameter(
            name,
            format!("must be within [0, 1], got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.store.capacity, 1000);
        assert_eq!(config.trend.min_samples, 10);
        assert_eq!(config.cycle.max_lag, 100);
        assert_eq!(config.seasonal.candidate_periods, vec![7, 12, 30, 90]);
        assert_eq!(config.anomaly.threshold_sigma, 2.5);
        assert_eq!(config.correlation.significance_level, 0.05);
        assert_eq!(config.forecast.max_horizon, 1000);
        assert!(!config.detect_on_ingest);
        assert!((config.statistics.annualization_factor - 15.874507866).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_for_clamps() {
        let config = AnomalyConfig::default();
        assert_eq!(config.window_for(10), 5);
        assert_eq!(config.window_for(120), 12);
        assert_eq!(config.window_for(5000), 30);
        assert_eq!(AnomalyConfig::new(7, 2.0).window_for(5000), 7);
    }

    #[test]
    fn test_confidence_at_decays_to_floor() {
        let config = ForecastConfig::default();
        assert!((config.confidence_at(1) - 0.85).abs() < 1e-12);
        assert!((config.confidence_at(2) - 0.80).abs() < 1e-12);
        assert_eq!(config.confidence_at(100), 0.3);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = EngineConfig::default();
        config.store.capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(PatternError::InvalidParameter { name, .. }) if name == "store.capacity"
        ));
    }

    #[test]
    fn test_validate_rejects_short_period() {
        let mut config = EngineConfig::default();
        config.seasonal.candidate_periods = vec![7, 1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = EngineConfig::default();
        config.anomaly.threshold_sigma = f64::NAN;
        assert!(config.validate().is_err());
        config.anomaly.threshold_sigma = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = EngineConfig::default();
        config.anomaly.window = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = EngineConfig::from_toml_str(
            r#"
            detect_on_ingest = true

            [store]
            capacity = 50

            [seasonal]
            candidate_periods = [4]
            "#,
        )
        .unwrap();
        assert_eq!(config.store.capacity, 50);
        assert_eq!(config.seasonal.candidate_periods, vec![4]);
        assert!(config.detect_on_ingest);
        assert_eq!(config.trend, TrendConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_field() {
        let err = EngineConfig::from_toml_str("[store]\nsize = 5\n").unwrap_err();
        assert!(matches!(err, PatternError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json() {
        let config =
            EngineConfig::from_json_str(r#"{"forecast": {"max_horizon": 10}}"#).unwrap();
        assert_eq!(config.forecast.max_horizon, 10);
        assert_eq!(config.forecast.trend_window, 30);
    }

    #[test]
    fn test_from_json_validates() {
        let err = EngineConfig::from_json_str(r#"{"store": {"capacity": 0}}"#).unwrap_err();
        assert!(matches!(err, PatternError::InvalidParameter { .. }));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[cycle]\nmax_lag = 12").unwrap();

        let config = EngineConfig::from_path(&path).unwrap();
        assert_eq!(config.cycle.max_lag, 12);

        let other = dir.path().join("engine.yaml");
        std::fs::write(&other, "cycle: {}").unwrap();
        assert!(matches!(
            EngineConfig::from_path(&other),
            Err(PatternError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::from_path(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(PatternError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
