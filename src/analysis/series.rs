/// Time-series statistics over a single city's temperature column.
///
/// All functions here are pure: they take a slice, return a value, and touch
/// no shared state. Degenerate inputs fail loudly (`Err`) or yield an explicit
/// `None` sentinel — never a silently propagating NaN.
///
/// Rolling windows are positional. Irregular timestamp spacing is not
/// detected or corrected; a 30-row window covers 30 rows whether they span
/// 30 days or 30 years. Known limitation.

use crate::model::{SeriesSummary, TempError};

/// Default trailing window used by the rolling statistics and by the
/// rolling-sigma anomaly policy.
pub const DEFAULT_WINDOW: usize = 30;

// ---------------------------------------------------------------------------
// Rolling statistics
// ---------------------------------------------------------------------------

/// Trailing-window mean: for each index i, the mean of the `window` values
/// ending at i (inclusive), using fewer values at the start of the series.
///
/// Positions where the trailing window holds fewer than `min_periods` values
/// yield `None`. With `min_periods == window` the first `window - 1` entries
/// are undefined; with `min_periods == 1` every entry is defined.
///
/// `min_periods` of zero is treated as 1 — a mean of zero values does not
/// exist.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "rolling window must be at least 1");
    let min_periods = min_periods.max(1);

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        if slice.len() < min_periods {
            out.push(None);
        } else {
            out.push(Some(slice.iter().sum::<f64>() / slice.len() as f64));
        }
    }
    out
}

/// Trailing-window sample standard deviation (n - 1 in the denominator).
///
/// A window holding a single value has no sample deviation, so positions
/// with fewer than two values are `None` regardless of `min_periods`.
pub fn rolling_std(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "rolling window must be at least 1");
    let min_periods = min_periods.max(1);

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        if slice.len() < min_periods || slice.len() < 2 {
            out.push(None);
        } else {
            out.push(sample_std(slice));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Scalar statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean. `None` on an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1). `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Quantile with the linear interpolation convention used by the standard
/// statistical packages: for sorted values v_0..v_{n-1} and q in [0, 1],
/// the result interpolates between the values at rank floor and ceil of
/// (n - 1) * q.
///
/// `None` on an empty slice or q outside [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Median (50th percentile, linear interpolation).
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Sample-adjusted skewness (third standardized moment).
///
/// Convention for degenerate input, chosen and tested here: `None` when the
/// series has fewer than 3 values or zero sample deviation. Callers branch
/// on the sentinel instead of receiving NaN.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_std(values)?;
    if s == 0.0 {
        return None;
    }
    let nf = n as f64;
    let sum3 = values.iter().map(|v| ((v - m) / s).powi(3)).sum::<f64>();
    Some(nf / ((nf - 1.0) * (nf - 2.0)) * sum3)
}

/// Sample-adjusted excess kurtosis (fourth standardized moment, Fisher's
/// definition: a normal distribution scores 0).
///
/// Same sentinel convention as `skewness`; requires at least 4 values.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let m = mean(values)?;
    let s = sample_std(values)?;
    if s == 0.0 {
        return None;
    }
    let nf = n as f64;
    let sum4 = values.iter().map(|v| ((v - m) / s).powi(4)).sum::<f64>();
    let term = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum4;
    let correction = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(term - correction)
}

/// Descriptive statistics table for one series.
///
/// Fails with `Computation` on an empty series rather than fabricating
/// zeros. A single-value series reports a standard deviation of 0.0.
pub fn summarize(values: &[f64]) -> Result<SeriesSummary, TempError> {
    if values.is_empty() {
        return Err(TempError::Computation(
            "cannot summarize an empty series".to_string(),
        ));
    }
    let count = values.len();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // count >= 1 checked above, so mean and median exist
    let mean = mean(values).ok_or_else(|| TempError::Computation("mean of empty series".into()))?;
    let median =
        median(values).ok_or_else(|| TempError::Computation("median of empty series".into()))?;
    let std_dev = sample_std(values).unwrap_or(0.0);

    Ok(SeriesSummary {
        count,
        min,
        max,
        mean,
        median,
        std_dev,
    })
}

/// Pearson correlation coefficient between two equal-length series.
///
/// `None` on length mismatch, fewer than 2 pairs, or zero variance in
/// either series.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let ma = mean(a)?;
    let mb = mean(b)?;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        cov += (x - ma) * (y - mb);
        var_a += (x - ma).powi(2);
        var_b += (y - mb).powi(2);
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a.sqrt() * var_b.sqrt()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
