//! Baseline comparison statistics
//!
//! Standardizes an empirical robustness value against its population of
//! size-matched random controls. The statistic is not a per-sample z-score:
//! the sqrt(k) factor measures the deviation from the baseline mean in units
//! of the mean's standard error, i.e. a one-sample statistic against the
//! sampling distribution of the mean.

use thiserror::Error;

/// Errors from baseline comparison.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// No baseline values were supplied.
    #[error("baseline population is empty")]
    EmptyBaseline,
    /// Every baseline value is identical, so the deviation is undefined.
    #[error("baseline population has zero variance")]
    ConstantBaseline,
}

/// Arithmetic mean of a sample.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divisor `k`, not `k - 1`).
pub fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Standardized deviation of `value` from the baseline population.
///
/// `z = sqrt(k) * (value - mean) / sqrt(population_variance)` with
/// `k = baseline.len()`. A constant baseline is reported as an error rather
/// than silently producing NaN.
pub fn zscore(value: f64, baseline: &[f64]) -> Result<f64, StatsError> {
    if baseline.is_empty() {
        return Err(StatsError::EmptyBaseline);
    }
    let k = baseline.len() as f64;
    let variance = population_variance(baseline);
    if variance == 0.0 {
        return Err(StatsError::ConstantBaseline);
    }
    Ok(k.sqrt() * (value - mean(baseline)) / variance.sqrt())
}
