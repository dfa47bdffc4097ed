//! Shared statistics kernel.
//!
//! Plain functions over `&[f64]` used by every analyzer. None of them panic
//! on empty or short input; they return 0 (or `None`) instead. Inputs with
//! magnitudes large enough for squared sums to overflow are rescaled first,
//! so finite input gives finite output.

use std::borrow::Cow;

/// Magnitudes below this are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Largest magnitude whose squares still sum safely in `f64`.
const SCALE_LIMIT: f64 = 1e150;

/// `data` divided by its largest magnitude when squaring it could overflow,
/// together with the factor that undoes the division.
pub fn rescaled(data: &[f64]) -> (Cow<'_, [f64]>, f64) {
    let max = data.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max < SCALE_LIMIT || !max.is_finite() {
        return (Cow::Borrowed(data), 1.0);
    }
    (Cow::Owned(data.iter().map(|x| x / max).collect()), max)
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let (data, scale) = rescaled(data);
    data.iter().sum::<f64>() / data.len() as f64 * scale
}

fn sum_sq_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum()
}

/// Population variance, saturating at `f64::MAX`.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let (data, scale) = rescaled(data);
    (sum_sq_dev(&data) / data.len() as f64 * scale * scale).min(f64::MAX)
}

/// Population standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let (data, scale) = rescaled(data);
    (sum_sq_dev(&data) / data.len() as f64).sqrt() * scale
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std_dev(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let (data, scale) = rescaled(data);
    (sum_sq_dev(&data) / (n - 1) as f64).sqrt() * scale
}

/// Copy of `data` in ascending order.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut values = data.to_vec();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Median; the average of the two middle values for even lengths.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let values = sorted(data);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Nearest-rank quantile over already sorted values: `sorted[floor(n * q)]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Successive differences `x[i] - x[i - 1]`.
pub fn differences(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Least-squares line over index positions `0..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Residuals `y[i] - predict(i)`.
    pub fn residuals(&self, data: &[f64]) -> Vec<f64> {
        data.iter()
            .enumerate()
            .map(|(i, y)| y - self.predict(i as f64))
            .collect()
    }
}

/// Closed-form least squares of `data` against its indices.
///
/// Returns `None` for fewer than two samples.
pub fn linear_fit(data: &[f64]) -> Option<LinearFit> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let (data, scale) = rescaled(data);
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(&data);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in data.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        slope: slope * scale,
        intercept: (y_mean - slope * x_mean) * scale,
    })
}

/// Pearson correlation over the common prefix of `a` and `b`.
///
/// Returns 0 when fewer than two samples align, either side is flat, or the
/// coefficient cannot be computed.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (a, _) = rescaled(&a[..n]);
    let (b, _) = rescaled(&b[..n]);
    let (a, b) = (a.as_ref(), b.as_ref());
    let (ma, mb) = (mean(a), mean(b));

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }

    let denom = (saa * sbb).sqrt();
    let r = sab / denom;
    if denom < EPSILON || !r.is_finite() {
        return 0.0;
    }
    r.clamp(-1.0, 1.0)
}

/// Biased autocorrelation at `lag`.
///
/// Returns 0 for flat input or a lag that leaves no overlap.
pub fn autocorrelation_at(data: &[f64], lag: usize) -> f64 {
    let n = data.len();
    if lag >= n {
        return 0.0;
    }
    let (data, _) = rescaled(data);
    let m = mean(&data);
    let var: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    if var < EPSILON {
        return 0.0;
    }
    data.iter()
        .take(n - lag)
        .zip(data.iter().skip(lag))
        .map(|(a, b)| (a - m) * (b - m))
        .sum::<f64>()
        / var
}

/// Autocorrelation function for lags `0..=max_lag`, truncated to the data.
pub fn autocorrelation(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    let (data, _) = rescaled(data);
    let m = mean(&data);
    let var: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    if var < EPSILON {
        return vec![0.0; max_lag.min(n - 1) + 1];
    }

    (0..=max_lag.min(n - 1))
        .map(|lag| {
            if lag == 0 {
                1.0
            } else {
                data.iter()
                    .take(n - lag)
                    .zip(data.iter().skip(lag))
                    .map(|(a, b)| (a - m) * (b - m))
                    .sum::<f64>()
                    / var
            }
        })
        .collect()
}

/// Index of the largest value; first index on ties.
pub fn argmax(data: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in data.iter().enumerate() {
        if *v > data[best] {
            best = i;
        }
    }
    best
}

/// Index of the smallest value; first index on ties.
pub fn argmin(data: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in data.iter().enumerate() {
        if *v < data[best] {
            best = i;
        }
    }
    best
}
