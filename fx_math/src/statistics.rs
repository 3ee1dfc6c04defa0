//! Descriptive statistics over residual series

use crate::{MathError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Variance below which a series is treated as constant
const DEGENERATE_VARIANCE: f64 = 1e-24;

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom
pub fn variance(values: &[f64], ddof: usize) -> Result<f64> {
    if values.len() <= ddof {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} values for variance, got {}",
            ddof,
            values.len()
        )));
    }

    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok(ss / (values.len() - ddof) as f64)
}

/// Lag-1 autocorrelation coefficient.
///
/// Returns 0 for a (numerically) constant series.
pub fn lag1_autocorrelation(values: &[f64]) -> Result<f64> {
    if values.len() < 3 {
        return Err(MathError::InsufficientData(
            "Need at least 3 values for autocorrelation".to_string(),
        ));
    }

    let m = mean(values)?;
    let denominator: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if denominator / (values.len() as f64) < DEGENERATE_VARIANCE {
        return Ok(0.0);
    }

    let numerator: f64 = values
        .windows(2)
        .map(|w| (w[0] - m) * (w[1] - m))
        .sum();

    Ok(numerator / denominator)
}

/// Quantile of the standard normal distribution
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Probability must be in (0, 1), got {}",
            p
        )));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| MathError::CalculationError(e.to_string()))?;
    Ok(normal.inverse_cdf(p))
}

/// Multiplier `z` such that `mean ± z·sd` covers `confidence` of a normal distribution
pub fn two_sided_z(confidence: f64) -> Result<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Confidence level must be in (0, 1), got {}",
            confidence
        )));
    }

    normal_quantile(0.5 + confidence / 2.0)
}
