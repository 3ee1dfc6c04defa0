//! Fourier seasonal features
//!
//! A periodic component is represented by a truncated Fourier series, so a
//! seasonal pattern of any shape can be fitted with ordinary least squares.

use crate::{MathError, Result};
use std::f64::consts::PI;

/// Days in a week
pub const WEEKLY_PERIOD: f64 = 7.0;

/// Mean days in a calendar year
pub const YEARLY_PERIOD: f64 = 365.25;

/// Truncated Fourier series with a fixed period and number of harmonics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierSeries {
    period: f64,
    order: usize,
}

impl FourierSeries {
    /// Create a new Fourier series with the given period (in days) and order
    pub fn new(period: f64, order: usize) -> Result<Self> {
        if !period.is_finite() || period <= 0.0 {
            return Err(MathError::InvalidInput(
                "Seasonal period must be positive".to_string(),
            ));
        }
        if order == 0 {
            return Err(MathError::InvalidInput(
                "Fourier order must be at least 1".to_string(),
            ));
        }

        Ok(Self { period, order })
    }

    /// Weekly seasonality with the given order
    pub fn weekly(order: usize) -> Result<Self> {
        Self::new(WEEKLY_PERIOD, order)
    }

    /// Yearly seasonality with the given order
    pub fn yearly(order: usize) -> Result<Self> {
        Self::new(YEARLY_PERIOD, order)
    }

    /// Get the period in days
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Get the number of harmonics
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of design columns produced (a sine and cosine per harmonic)
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Append the features for day offset `t` to a design row
    pub fn extend_row(&self, t: f64, row: &mut Vec<f64>) {
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * t / self.period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }

    /// Features for day offset `t`
    pub fn features(&self, t: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        self.extend_row(t, &mut row);
        row
    }
}
