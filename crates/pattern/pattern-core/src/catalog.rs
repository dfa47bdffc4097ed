//! Pattern catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use pattern_spi::{Clock, Detection, Pattern, PatternKey, SystemClock};
use tracing::trace;

/// The only stateful analysis component: the latest pattern per key.
///
/// Writers serialize behind the lock; readers get clones.
pub struct PatternCatalog {
    clock: Arc<dyn Clock>,
    patterns: RwLock<BTreeMap<PatternKey, Pattern>>,
}

impl PatternCatalog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            patterns: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert a new pattern or refresh an existing one.
    ///
    /// `first_detected` is preserved across updates. A detection identical
    /// to the stored entry leaves it untouched, `last_updated` included.
    pub fn upsert(&self, detection: Detection) -> Pattern {
        let mut patterns = self.patterns.write();
        match patterns.get_mut(&detection.key) {
            Some(existing) if existing.matches(&detection) => existing.clone(),
            Some(existing) => {
                let first_detected = existing.first_detected;
                *existing = Pattern::from_detection(detection, self.clock.now());
                existing.first_detected = first_detected;
                trace!(key = %existing.key, confidence = existing.confidence, "pattern updated");
                existing.clone()
            }
            None => {
                let pattern = Pattern::from_detection(detection, self.clock.now());
                trace!(key = %pattern.key, confidence = pattern.confidence, "pattern added");
                patterns.insert(pattern.key.clone(), pattern.clone());
                pattern
            }
        }
    }

    /// Every pattern, ordered by key.
    pub fn all(&self) -> Vec<Pattern> {
        self.patterns.read().values().cloned().collect()
    }

    pub fn for_series(&self, series_id: &str) -> Vec<Pattern> {
        self.patterns
            .read()
            .values()
            .filter(|p| p.series_id() == series_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, key: &PatternKey) -> Option<Pattern> {
        self.patterns.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }

    /// Distinct series with at least one pattern.
    pub fn series_count(&self) -> usize {
        self.patterns
            .read()
            .keys()
            .map(|k| k.series_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for PatternCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCatalog")
            .field("patterns", &self.len())
            .finish()
    }
}
