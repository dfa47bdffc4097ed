//! Pattern detector trait definition.

use crate::model::{Detection, PatternKind};

/// Pattern detector trait.
///
/// Implementations inspect a snapshot of one series and report the
/// regularities they find. A detector never fails on short or flat input;
/// it reports nothing instead.
pub trait PatternDetector: Send + Sync {
    /// Kind of pattern this detector produces.
    fn kind(&self) -> PatternKind;

    /// Human-readable detector name.
    fn name(&self) -> &str;

    /// Detect patterns in `values`, oldest first.
    fn detect(&self, series_id: &str, values: &[f64]) -> Vec<Detection>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PatternDetail, PatternKey, PatternMetadata};

    struct MockDetector;

    impl PatternDetector for MockDetector {
        fn kind(&self) -> PatternKind {
            PatternKind::Cycle
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn detect(&self, series_id: &str, values: &[f64]) -> Vec<Detection> {
            if values.len() < 3 {
                return Vec::new();
            }
            vec![Detection::new(
                PatternKey::cycle(series_id),
                "mock cycle",
                0.5,
                PatternMetadata {
                    amplitude: 0.0,
                    frequency: 0.5,
                    phase: 0.0,
                    period: Some(2),
                    detail: PatternDetail::Cycle {
                        autocorrelation: 0.5,
                    },
                },
            )]
        }
    }

    #[test]
    fn test_mock_detector() {
        let detector: Box<dyn PatternDetector> = Box::new(MockDetector);
        assert_eq!(detector.kind(), PatternKind::Cycle);
        assert_eq!(detector.name(), "mock");
        assert!(detector.detect("s", &[1.0]).is_empty());

        let found = detector.detect("s", &[1.0, 2.0, 1.0]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, PatternKey::cycle("s"));
    }
}
