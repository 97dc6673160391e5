//! Descriptive statistics shared by the aggregators
//!
//! Every helper returns `None` instead of NaN when the statistic is not
//! defined for its input, so undefined values cannot leak into reports.

use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.std_dev())
}

/// Median, averaging the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Percentile with linear interpolation between order statistics.
///
/// `q` is a fraction in `[0, 1]`. The position is `q * (n - 1)` on the
/// sorted values, interpolating between its floor and ceiling neighbours.
pub fn percentile_linear(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    let sorted = sorted(values);
    if sorted.is_empty() {
        return None;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
