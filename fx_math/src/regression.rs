//! Least-squares regression
//!
//! Contains the solvers used to fit additive time-series models:
//! - Ordinary least squares via Householder QR
//! - Leverage of a linear time trend, used for prediction variance

use crate::{MathError, Result};

/// Relative size below which a pivot is treated as collinear
const RANK_TOLERANCE: f64 = 1e-9;

/// Result of an ordinary least-squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// Estimated coefficients, one per design column
    pub coefficients: Vec<f64>,
    /// Fitted values, one per design row
    pub fitted: Vec<f64>,
    /// Observed minus fitted values
    pub residuals: Vec<f64>,
}

impl LeastSquaresFit {
    /// Number of estimated parameters
    pub fn parameters(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluate the fitted linear combination for a new design row
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Design row has {} columns, model has {} coefficients",
                row.len(),
                self.coefficients.len()
            )));
        }

        Ok(dot(row, &self.coefficients))
    }

    /// Residual sum of squares
    pub fn residual_sum_of_squares(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }
}

/// Solve `min ||X b - y||` for `b` using Householder QR decomposition.
///
/// `design` holds one row per observation. Fails when the system is
/// underdetermined, when any input is non-finite, or when a column is
/// (numerically) a linear combination of the preceding ones.
pub fn least_squares(design: &[Vec<f64>], targets: &[f64]) -> Result<LeastSquaresFit> {
    let n = design.len();
    if n != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but {} targets were given",
            n,
            targets.len()
        )));
    }

    let p = design.first().map(|row| row.len()).unwrap_or(0);
    if p == 0 {
        return Err(MathError::InvalidInput(
            "Design matrix has no columns".to_string(),
        ));
    }
    if n < p {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} rows for {} parameters, got {}",
            p, p, n
        )));
    }
    if design.iter().any(|row| row.len() != p) {
        return Err(MathError::InvalidInput(
            "Design rows have inconsistent lengths".to_string(),
        ));
    }
    if design.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Design matrix or targets contain non-finite values".to_string(),
        ));
    }

    // Column-major working copy so reflections touch contiguous memory
    let mut columns: Vec<Vec<f64>> = (0..p)
        .map(|j| design.iter().map(|row| row[j]).collect())
        .collect();
    let column_norms: Vec<f64> = columns.iter().map(|c| norm(c)).collect();
    let mut qty = targets.to_vec();

    for k in 0..p {
        let tail_norm = norm(&columns[k][k..]);
        if tail_norm <= RANK_TOLERANCE * column_norms[k].max(f64::MIN_POSITIVE) {
            return Err(MathError::CalculationError(format!(
                "Design matrix is rank deficient at column {}",
                k
            )));
        }

        let alpha = if columns[k][k] > 0.0 {
            -tail_norm
        } else {
            tail_norm
        };

        let mut v = columns[k][k..].to_vec();
        v[0] -= alpha;
        let v_norm_sq: f64 = v.iter().map(|x| x * x).sum();

        if v_norm_sq > 0.0 {
            for column in columns.iter_mut().skip(k + 1) {
                reflect(&v, v_norm_sq, &mut column[k..]);
            }
            reflect(&v, v_norm_sq, &mut qty[k..]);
        }

        columns[k][k] = alpha;
        for value in columns[k][k + 1..].iter_mut() {
            *value = 0.0;
        }
    }

    // Back substitution on the upper-triangular R
    let mut coefficients = vec![0.0; p];
    for i in (0..p).rev() {
        let mut acc = qty[i];
        for j in i + 1..p {
            acc -= columns[j][i] * coefficients[j];
        }
        coefficients[i] = acc / columns[i][i];
    }

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(MathError::CalculationError(
            "Least-squares solution is not finite".to_string(),
        ));
    }

    let fitted: Vec<f64> = design.iter().map(|row| dot(row, &coefficients)).collect();
    let residuals: Vec<f64> = targets
        .iter()
        .zip(&fitted)
        .map(|(y, f)| y - f)
        .collect();

    Ok(LeastSquaresFit {
        coefficients,
        fitted,
        residuals,
    })
}

/// Leverage of a simple linear trend over the fitted time points.
///
/// Gives the parameter-uncertainty factor `1/n + (t - mean)^2 / Sxx` of an
/// ordinary least-squares trend evaluated at time `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeLeverage {
    n: usize,
    mean: f64,
    sxx: f64,
}

impl TimeLeverage {
    /// Compute the leverage statistics of the given time points
    pub fn from_times(times: &[f64]) -> Result<Self> {
        if times.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 time points to measure trend leverage".to_string(),
            ));
        }

        let n = times.len();
        let mean = times.iter().sum::<f64>() / n as f64;
        let sxx: f64 = times.iter().map(|t| (t - mean).powi(2)).sum();

        if sxx <= 0.0 || !sxx.is_finite() {
            return Err(MathError::CalculationError(
                "Time points have no spread".to_string(),
            ));
        }

        Ok(Self { n, mean, sxx })
    }

    /// Variance multiplier for the trend evaluated at `t`
    pub fn factor(&self, t: f64) -> f64 {
        1.0 / self.n as f64 + (t - self.mean).powi(2) / self.sxx
    }

    /// Mean of the fitted time points
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

fn reflect(v: &[f64], v_norm_sq: f64, target: &mut [f64]) {
    let scale = 2.0 * dot(v, target) / v_norm_sq;
    for (t, vi) in target.iter_mut().zip(v) {
        *t -= scale * vi;
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}
