//! Seasonal decomposition types.

use serde::{Deserialize, Serialize};

/// Canonical seasonal strength ladder.
///
/// `weak [0.1, 0.3)`, `moderate [0.3, 0.5)`, `strong [0.5, 0.7)`,
/// `very_strong [0.7, 1]`. Anything below 0.1 is not seasonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl SeasonalStrength {
    /// Lower bound of the weak tier.
    pub const MIN_STRENGTH: f64 = 0.1;

    pub fn from_strength(strength: f64) -> Option<Self> {
        if strength >= 0.7 {
            Some(SeasonalStrength::VeryStrong)
        } else if strength >= 0.5 {
            Some(SeasonalStrength::Strong)
        } else if strength >= 0.3 {
            Some(SeasonalStrength::Moderate)
        } else if strength >= Self::MIN_STRENGTH {
            Some(SeasonalStrength::Weak)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalStrength::Weak => "weak",
            SeasonalStrength::Moderate => "moderate",
            SeasonalStrength::Strong => "strong",
            SeasonalStrength::VeryStrong => "very_strong",
        }
    }
}

/// Calendar label for a period measured in daily samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonType {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl SeasonType {
    pub fn from_period(period: usize) -> Self {
        match period {
            7 => SeasonType::Weekly,
            30 => SeasonType::Monthly,
            90 => SeasonType::Quarterly,
            365 => SeasonType::Yearly,
            _ => SeasonType::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::Weekly => "weekly",
            SeasonType::Monthly => "monthly",
            SeasonType::Quarterly => "quarterly",
            SeasonType::Yearly => "yearly",
            SeasonType::Custom => "custom",
        }
    }

    /// Human-readable name of a phase within one season.
    ///
    /// Weekly phases are weekday names starting on Sunday; other seasons
    /// count days or periods from one.
    pub fn phase_label(&self, phase: usize) -> String {
        match self {
            SeasonType::Weekly => match WEEKDAYS.get(phase) {
                Some(day) => day.to_string(),
                None => format!("Day {}", phase),
            },
            SeasonType::Monthly => format!("Day {}", phase + 1),
            SeasonType::Quarterly => format!("Day {} of quarter", phase + 1),
            SeasonType::Yearly | SeasonType::Custom => format!("Period {}", phase + 1),
        }
    }
}

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Additive split of a series into a per-phase profile and the remainder.
///
/// `profile[i % period] + deseasonalized[i]` reproduces sample `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalDecomposition {
    pub period: usize,
    /// Zero-mean seasonal offset for each phase.
    pub profile: Vec<f64>,
    pub deseasonalized: Vec<f64>,
    /// `1 - var(deseasonalized) / var(original)`, clamped to `[0, 1]`.
    pub strength: f64,
    pub tier: Option<SeasonalStrength>,
    pub peak_phase: usize,
    pub trough_phase: usize,
}

impl SeasonalDecomposition {
    /// Seasonal offset for an absolute sample index.
    pub fn offset_at(&self, index: usize) -> f64 {
        if self.profile.is_empty() {
            return 0.0;
        }
        self.profile[index % self.profile.len()]
    }

    pub fn amplitude(&self) -> f64 {
        let max = self.profile.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = self.profile.iter().cloned().fold(f64::INFINITY, f64::min);
        if max.is_finite() && min.is_finite() {
            max - min
        } else {
            0.0
        }
    }
}
