//! Bounded in-memory series store.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use pattern_api::StoreConfig;
use pattern_spi::{PatternError, Result, Sample};
use tracing::{trace, warn};

/// Append-only ring buffers keyed by series id.
///
/// Appends past capacity evict the oldest sample. Reads copy the series
/// under a short read lock, so analyzers always work on a snapshot.
#[derive(Debug)]
pub struct SeriesStore {
    capacity: usize,
    series: RwLock<HashMap<String, VecDeque<Sample>>>,
}

impl SeriesStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a sample, returning the series length afterwards.
    pub fn append(&self, series_id: &str, sample: Sample) -> Result<usize> {
        if series_id.is_empty() {
            warn!("rejected sample with empty series id");
            return Err(PatternError::invalid_input(series_id, "series id is empty"));
        }
        if !sample.value.is_finite() {
            warn!(series = series_id, value = sample.value, "rejected non-finite sample");
            return Err(PatternError::invalid_input(
                series_id,
                format!("value {} is not finite", sample.value),
            ));
        }

        let mut series = self.series.write();
        let buffer = series
            .entry(series_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity.min(1024)));
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(sample);
        trace!(series = series_id, value = sample.value, len = buffer.len(), "ingested");
        Ok(buffer.len())
    }

    /// Copy of the values, oldest first; empty for an unknown series.
    pub fn get(&self, series_id: &str) -> Vec<f64> {
        self.series
            .read()
            .get(series_id)
            .map(|buffer| buffer.iter().map(|s| s.value).collect())
            .unwrap_or_default()
    }

    /// Copy of the timestamped samples, oldest first.
    pub fn samples(&self, series_id: &str) -> Vec<Sample> {
        self.series
            .read()
            .get(series_id)
            .map(|buffer| buffer.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Known series ids in ascending order.
    pub fn series_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.series.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self, series_id: &str) -> usize {
        self.series
            .read()
            .get(series_id)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    pub fn contains(&self, series_id: &str) -> bool {
        self.series.read().contains_key(series_id)
    }

    pub fn series_count(&self) -> usize {
        self.series.read().len()
    }
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(value: f64) -> Sample {
        Sample::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), value)
    }

    #[test]
    fn test_append_and_get() {
        let store = SeriesStore::new(10);
        assert_eq!(store.append("a", sample(1.0)).unwrap(), 1);
        assert_eq!(store.append("a", sample(2.0)).unwrap(), 2);
        assert_eq!(store.get("a"), vec![1.0, 2.0]);
        assert_eq!(store.len("a"), 2);
        assert!(store.contains("a"));
    }

    #[test]
    fn test_unknown_series_is_empty() {
        let store = SeriesStore::default();
        assert!(store.get("missing").is_empty());
        assert!(store.samples("missing").is_empty());
        assert_eq!(store.len("missing"), 0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = SeriesStore::new(3);
        for v in 1..=5 {
            store.append("a", sample(v as f64)).unwrap();
        }
        assert_eq!(store.get("a"), vec![3.0, 4.0, 5.0]);
        assert_eq!(store.len("a"), 3);
    }

    #[test]
    fn test_rejects_non_finite_without_mutation() {
        let store = SeriesStore::new(10);
        store.append("a", sample(1.0)).unwrap();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = store.append("a", sample(bad)).unwrap_err();
            assert!(matches!(err, PatternError::InvalidInput { .. }));
        }
        assert_eq!(store.get("a"), vec![1.0]);
    }

    #[test]
    fn test_rejects_empty_id() {
        let store = SeriesStore::new(10);
        assert!(store.append("", sample(1.0)).is_err());
        assert_eq!(store.series_count(), 0);
    }

    #[test]
    fn test_series_ids_sorted() {
        let store = SeriesStore::new(10);
        for id in ["zeta", "alpha", "mid"] {
            store.append(id, sample(1.0)).unwrap();
        }
        assert_eq!(store.series_ids(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_get_returns_copy() {
        let store = SeriesStore::new(10);
        store.append("a", sample(1.0)).unwrap();
        let mut snapshot = store.get("a");
        snapshot.push(99.0);
        assert_eq!(store.get("a"), vec![1.0]);
    }
}
