//! # FX Math
//!
//! Mathematical building blocks for exchange-rate forecasting.
//! This crate provides the numerical pieces the forecasting engine is made
//! of: least-squares regression, Fourier seasonal features and descriptive
//! statistics over residual series.

use thiserror::Error;

pub mod regression;
pub mod seasonality;
pub mod statistics;

pub use regression::{least_squares, LeastSquaresFit, TimeLeverage};
pub use seasonality::FourierSeries;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
