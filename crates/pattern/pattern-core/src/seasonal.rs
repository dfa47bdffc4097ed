//! Seasonal decomposition.
//!
//! Additive model: the series minus its least-squares line is averaged per
//! phase over every full cycle, giving a zero-mean profile. Strength is the
//! share of variance the profile explains.

use pattern_api::SeasonalConfig;
use pattern_spi::{
    Detection, PatternDetail, PatternKey, PatternMetadata, SeasonType, SeasonalDecomposition,
    SeasonalStrength,
};
use tracing::debug;

use crate::kernel::{self, EPSILON};

/// Seasonal decomposer over a list of candidate periods.
#[derive(Debug, Clone, Default)]
pub struct SeasonalDecomposer {
    config: SeasonalConfig,
}

impl SeasonalDecomposer {
    pub fn new(config: SeasonalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeasonalConfig {
        &self.config
    }

    /// Decompose `values` with a fixed period.
    ///
    /// Returns `None` unless `period >= 2` and at least two full cycles are
    /// available.
    pub fn decompose(&self, values: &[f64], period: usize) -> Option<SeasonalDecomposition> {
        let n = values.len();
        if period < 2 || n < period * 2 {
            return None;
        }

        let detrended = kernel::linear_fit(values)?.residuals(values);
        let cycles = n / period;

        let mut profile: Vec<f64> = (0..period)
            .map(|phase| {
                (0..cycles)
                    .map(|c| detrended[c * period + phase])
                    .sum::<f64>()
                    / cycles as f64
            })
            .collect();
        let centre = kernel::mean(&profile);
        profile.iter_mut().for_each(|v| *v -= centre);

        let deseasonalized: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, v)| v - profile[i % period])
            .collect();

        let original_variance = kernel::variance(values);
        let strength = if original_variance < EPSILON {
            0.0
        } else {
            (1.0 - kernel::variance(&deseasonalized) / original_variance).clamp(0.0, 1.0)
        };

        Some(SeasonalDecomposition {
            period,
            peak_phase: kernel::argmax(&profile),
            trough_phase: kernel::argmin(&profile),
            tier: SeasonalStrength::from_strength(strength),
            strength,
            profile,
            deseasonalized,
        })
    }

    /// Seasonal patterns for the configured candidates plus `extra` periods.
    pub fn analyze(&self, series_id: &str, values: &[f64], extra: &[usize]) -> Vec<Detection> {
        let mut periods: Vec<usize> = self
            .config
            .candidate_periods
            .iter()
            .chain(extra)
            .copied()
            .collect();
        periods.sort_unstable();
        periods.dedup();

        periods
            .into_iter()
            .filter_map(|period| self.decompose(values, period))
            .filter(|d| d.strength >= self.config.min_strength)
            .map(|d| to_detection(series_id, d))
            .collect()
    }
}

fn to_detection(series_id: &str, decomposition: SeasonalDecomposition) -> Detection {
    let period = decomposition.period;
    let season = SeasonType::from_period(period);
    let tier = decomposition.tier.unwrap_or(SeasonalStrength::Weak);
    debug!(
        series = series_id,
        period,
        strength = decomposition.strength,
        "seasonal pattern detected"
    );

    Detection::new(
        PatternKey::seasonal(series_id, period),
        format!(
            "{} {} seasonal pattern with period {}",
            capitalize(tier.as_str()),
            season.as_str(),
            period
        ),
        decomposition.strength,
        PatternMetadata {
            amplitude: decomposition.amplitude(),
            frequency: 1.0 / period as f64,
            phase: decomposition.peak_phase as f64,
            period: Some(period),
            detail: PatternDetail::Seasonal {
                strength: decomposition.strength,
                tier,
                season,
                peak_phase: decomposition.peak_phase,
                trough_phase: decomposition.trough_phase,
                peak_label: season.phase_label(decomposition.peak_phase),
                trough_label: season.phase_label(decomposition.trough_phase),
                profile: decomposition.profile,
            },
        },
    )
}

fn capitalize(label: &str) -> String {
    let text = label.replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
