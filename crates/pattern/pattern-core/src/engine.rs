//! Pattern engine: the public boundary over store, analyzers and catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use pattern_api::EngineConfig;
use pattern_spi::{
    Anomaly, AnomalyAnalysis, Clock, CorrelationResult, Detection, ForecastResult, Pattern,
    PatternDetail, PatternDetector, PatternKey, PatternKind, PatternReport, Result, Sample,
    SeasonalAnalysis, SeasonalDecomposition, StatisticalSummary, SystemClock, TrendDirection,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::anomaly::AnomalyDetector;
use crate::catalog::PatternCatalog;
use crate::correlation::CorrelationAnalyzer;
use crate::cycle::CycleDetector;
use crate::forecast::Forecaster;
use crate::seasonal::SeasonalDecomposer;
use crate::statistics::DescriptiveStatistics;
use crate::store::SeriesStore;
use crate::trend::TrendAnalyzer;

/// Patterns above this confidence count as high confidence in reports.
const HIGH_CONFIDENCE: f64 = 0.8;

/// Patterns first seen within this many days count as recent in reports.
const RECENT_DAYS: i64 = 7;

/// Time-series pattern engine.
///
/// Instances are independent; nothing is shared between engines. All
/// methods take `&self` and may be called from several threads.
pub struct PatternEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    store: SeriesStore,
    catalog: PatternCatalog,
    statistics: DescriptiveStatistics,
    trend: TrendAnalyzer,
    seasonal: SeasonalDecomposer,
    anomaly: AnomalyDetector,
    correlation: CorrelationAnalyzer,
    forecaster: Forecaster,
    detectors: Vec<Box<dyn PatternDetector>>,
}

impl PatternEngine {
    /// Create an engine using the system clock.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine with an injected clock.
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let trend = TrendAnalyzer::new(config.trend.clone());
        let detectors: Vec<Box<dyn PatternDetector>> = vec![
            Box::new(trend.clone()),
            Box::new(CycleDetector::new(config.cycle.clone())),
        ];
        info!(
            capacity = config.store.capacity,
            detectors = detectors.len(),
            "pattern engine created"
        );

        Self {
            store: SeriesStore::from_config(&config.store),
            catalog: PatternCatalog::new(clock.clone()),
            statistics: DescriptiveStatistics::new(config.statistics.clone()),
            trend,
            seasonal: SeasonalDecomposer::new(config.seasonal.clone()),
            anomaly: AnomalyDetector::new(config.anomaly.clone()),
            correlation: CorrelationAnalyzer::new(config.correlation.clone()),
            forecaster: Forecaster::new(config.forecast.clone()),
            detectors,
            clock,
            config,
        }
    }

    /// Add a detector run by every subsequent detection pass.
    pub fn register_detector(&mut self, detector: Box<dyn PatternDetector>) {
        debug!(name = detector.name(), kind = %detector.kind(), "detector registered");
        self.detectors.push(detector);
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Ingestion ==========

    /// Append a sample stamped with the engine clock.
    pub fn ingest(&self, series_id: &str, value: f64) -> Result<()> {
        self.ingest_at(series_id, value, self.clock.now())
    }

    /// Append a sample with an explicit timestamp.
    pub fn ingest_at(&self, series_id: &str, value: f64, timestamp: DateTime<Utc>) -> Result<()> {
        self.store.append(series_id, Sample::new(timestamp, value))?;
        if self.config.detect_on_ingest {
            self.detect_patterns(series_id);
        }
        Ok(())
    }

    /// Append several values in order; stops at the first rejected value.
    pub fn ingest_many<I>(&self, series_id: &str, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0;
        for value in values {
            self.ingest(series_id, value)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn series_ids(&self) -> Vec<String> {
        self.store.series_ids()
    }

    /// Snapshot of a series' values; empty when unknown.
    pub fn values(&self, series_id: &str) -> Vec<f64> {
        self.store.get(series_id)
    }

    pub fn samples(&self, series_id: &str) -> Vec<Sample> {
        self.store.samples(series_id)
    }

    // ========== Analysis ==========

    /// Descriptive statistics, trend label and default anomaly scan.
    pub fn get_summary(&self, series_id: &str) -> StatisticalSummary {
        let samples = self.store.samples(series_id);
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

        let mut summary = self.statistics.compute(series_id, &values);
        summary.trend = self.trend.direction(&values);
        summary.anomalies = match self.anomaly.scan(&samples, None, None) {
            Ok(anomalies) => anomalies,
            Err(e) => {
                warn!(series = series_id, error = %e, "anomaly scan skipped");
                Vec::new()
            }
        };
        summary
    }

    /// Run every detector on one series and catalogue what they find.
    pub fn detect_patterns(&self, series_id: &str) -> Vec<Pattern> {
        let values = self.store.get(series_id);
        if values.is_empty() {
            return Vec::new();
        }

        let mut detections: Vec<Detection> = self
            .detectors
            .iter()
            .flat_map(|d| d.detect(series_id, &values))
            .collect();

        let extra_periods: Vec<usize> = if self.seasonal.config().include_cycle_period {
            detections
                .iter()
                .filter(|d| d.kind() == PatternKind::Cycle)
                .filter_map(|d| d.metadata.period)
                .collect()
        } else {
            Vec::new()
        };
        detections.extend(self.seasonal.analyze(series_id, &values, &extra_periods));

        for other in self.store.series_ids() {
            if other == series_id {
                continue;
            }
            let result =
                self.correlation
                    .correlate(series_id, &values, &other, &self.store.get(&other));
            detections.extend(self.correlation.pattern(&result));
        }

        debug!(series = series_id, found = detections.len(), "detection pass complete");
        detections
            .into_iter()
            .map(|d| self.catalog.upsert(d))
            .collect()
    }

    /// Detection pass over every series, in parallel.
    pub fn detect_all_patterns(&self) -> Vec<Pattern> {
        let ids = self.store.series_ids();
        let mut patterns: Vec<Pattern> = ids
            .par_iter()
            .flat_map_iter(|id| self.detect_patterns(id))
            .collect();
        patterns.sort_by(|a, b| a.key.cmp(&b.key));
        patterns
    }

    /// Moving-baseline anomaly scan; configured defaults fill the gaps.
    pub fn scan_anomalies(
        &self,
        series_id: &str,
        window: Option<usize>,
        threshold: Option<f64>,
    ) -> Result<Vec<Anomaly>> {
        self.anomaly
            .scan(&self.store.samples(series_id), window, threshold)
    }

    pub fn correlate(&self, series_a: &str, series_b: &str) -> CorrelationResult {
        self.correlation.correlate(
            series_a,
            &self.store.get(series_a),
            series_b,
            &self.store.get(series_b),
        )
    }

    /// Pairwise correlations, strongest first. An empty list means every
    /// known series.
    pub fn correlation_matrix(&self, series_ids: &[String]) -> Vec<CorrelationResult> {
        let ids = if series_ids.is_empty() {
            self.store.series_ids()
        } else {
            series_ids.to_vec()
        };
        let series: Vec<(String, Vec<f64>)> = ids
            .into_iter()
            .map(|id| {
                let values = self.store.get(&id);
                (id, values)
            })
            .collect();
        self.correlation.matrix(&series)
    }

    pub fn seasonal_decomposition(
        &self,
        series_id: &str,
        period: usize,
    ) -> Option<SeasonalDecomposition> {
        self.seasonal.decompose(&self.store.get(series_id), period)
    }

    /// Project a series `horizon` steps ahead.
    ///
    /// When the catalog holds a seasonal pattern for the series, the one
    /// with the highest confidence (smallest period on ties) supplies the
    /// period, and its profile is rebuilt from the current snapshot so the
    /// phase lines up with the latest sample.
    pub fn forecast(&self, series_id: &str, horizon: usize) -> Result<ForecastResult> {
        let values = self.store.get(series_id);
        let profile = self
            .best_seasonal_period(series_id)
            .and_then(|period| self.seasonal.decompose(&values, period))
            .map(|d| d.profile);
        self.forecaster
            .project(series_id, &values, horizon, profile.as_deref())
    }

    fn best_seasonal_period(&self, series_id: &str) -> Option<usize> {
        self.catalog
            .for_series(series_id)
            .into_iter()
            .filter(|p| p.kind() == PatternKind::Seasonal)
            .filter_map(|p| p.metadata.period.map(|period| (p.confidence, period)))
            .max_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, period)| period)
    }

    // ========== Catalog ==========

    pub fn list_patterns(&self) -> Vec<Pattern> {
        self.catalog.all()
    }

    pub fn get_pattern(&self, key: &PatternKey) -> Option<Pattern> {
        self.catalog.get(key)
    }

    pub fn patterns_for_series(&self, series_id: &str) -> Vec<Pattern> {
        self.catalog.for_series(series_id)
    }

    /// Aggregate view over the catalog with planning recommendations.
    pub fn report(&self) -> PatternReport {
        let patterns = self.catalog.all();
        let now = self.clock.now();

        let mut by_kind: BTreeMap<PatternKind, usize> = BTreeMap::new();
        for p in &patterns {
            *by_kind.entry(p.kind()).or_insert(0) += 1;
        }
        let high_confidence_patterns = patterns
            .iter()
            .filter(|p| p.confidence > HIGH_CONFIDENCE)
            .count();
        let recent_patterns = patterns
            .iter()
            .filter(|p| now - p.first_detected < Duration::days(RECENT_DAYS))
            .count();

        let anomaly_analysis = self.anomaly_analysis(now);
        let seasonal_analysis = seasonal_analysis(&patterns);
        let recommendations = recommendations(&patterns, anomaly_analysis.total_anomalies > 0);

        PatternReport {
            generated_at: now,
            total_patterns: patterns.len(),
            by_kind,
            high_confidence_patterns,
            recent_patterns,
            series_tracked: self.store.series_count(),
            anomaly_analysis,
            seasonal_analysis,
            recommendations,
        }
    }

    /// Default-parameter anomaly scan over every tracked series.
    fn anomaly_analysis(&self, now: DateTime<Utc>) -> AnomalyAnalysis {
        let mut analysis = AnomalyAnalysis::default();
        let mut scanned = 0;
        for id in self.store.series_ids() {
            let samples = self.store.samples(&id);
            scanned += samples.len();
            let found = match self.anomaly.scan(&samples, None, None) {
                Ok(found) => found,
                Err(e) => {
                    warn!(series = %id, error = %e, "anomaly scan skipped in report");
                    continue;
                }
            };
            for a in &found {
                *analysis.by_severity.entry(a.severity).or_insert(0) += 1;
                if now - a.timestamp < Duration::days(RECENT_DAYS) {
                    analysis.recent_anomalies += 1;
                }
            }
            analysis.total_anomalies += found.len();
        }
        if scanned > 0 {
            analysis.anomaly_rate = analysis.total_anomalies as f64 / scanned as f64;
        }
        analysis
    }
}

fn seasonal_analysis(patterns: &[Pattern]) -> SeasonalAnalysis {
    let mut analysis = SeasonalAnalysis::default();
    let mut confidence = 0.0;
    for p in patterns {
        if let PatternDetail::Seasonal { season, .. } = &p.metadata.detail {
            *analysis.by_season.entry(*season).or_insert(0) += 1;
            analysis.total_seasonal_patterns += 1;
            confidence += p.confidence;
        }
    }
    if analysis.total_seasonal_patterns > 0 {
        analysis.average_confidence = confidence / analysis.total_seasonal_patterns as f64;
    }
    analysis
}

fn recommendations(patterns: &[Pattern], anomalous: bool) -> Vec<String> {
    let mut out = Vec::new();
    if patterns.iter().any(|p| p.confidence > HIGH_CONFIDENCE) {
        out.push("Leverage high-confidence patterns for strategic planning".to_string());
    }
    let upward = patterns.iter().any(|p| {
        matches!(
            p.metadata.detail,
            PatternDetail::Trend {
                direction: TrendDirection::Upward,
                ..
            }
        )
    });
    if upward {
        out.push("Capitalize on positive trend patterns".to_string());
    }
    if patterns.iter().any(|p| p.kind() == PatternKind::Seasonal) {
        out.push("Prepare for seasonal fluctuations in planning".to_string());
    }
    if anomalous {
        out.push("Investigate root causes of detected anomalies".to_string());
    }
    if out.is_empty() {
        out.push("No specific recommendations at this time".to_string());
    }
    out
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for PatternEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternEngine")
            .field("series", &self.store.series_count())
            .field("patterns", &self.catalog.len())
            .field("detectors", &self.detector_names())
            .finish()
    }
}
