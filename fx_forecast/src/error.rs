//! Error types for the fx_forecast crate

use chrono::NaiveDate;
use thiserror::Error;

/// Custom error types for the fx_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The series is too short to support trend and seasonality estimation
    #[error("Insufficient history: {observations} observations, at least {required} required")]
    InsufficientHistory {
        /// Observations in the supplied series
        observations: usize,
        /// Configured minimum
        required: usize,
    },

    /// Model fitting failed or produced a non-finite estimate
    #[error("Model fit failure: {reason} ({observations} rows, {parameters} parameters)")]
    ModelFitFailure {
        /// What went wrong
        reason: String,
        /// Rows the model was fitted on
        observations: usize,
        /// Parameters in the model
        parameters: usize,
    },

    /// The travel window cannot be forecast
    #[error("Invalid window {today} to {travel_date} ({horizon_days} days, max {max_horizon_days}): {reason}")]
    InvalidWindow {
        /// First day of the window
        today: NaiveDate,
        /// Departure date
        travel_date: NaiveDate,
        /// Requested horizon in days (negative when the travel date is in the past)
        horizon_days: i64,
        /// Configured maximum horizon
        max_horizon_days: usize,
        /// Why the window was rejected
        reason: String,
    },

    /// Nothing to rank
    #[error("Forecast contains no points to rank")]
    EmptyForecast,

    /// Rate series failed validation
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// Currency pair failed validation
    #[error("Invalid currency pair: {0}")]
    InvalidPair(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A data provider has no data for the request
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl ForecastError {
    /// Wrap a numerical failure raised while fitting a model
    pub(crate) fn fit_failure(
        err: fx_math::MathError,
        observations: usize,
        parameters: usize,
    ) -> Self {
        ForecastError::ModelFitFailure {
            reason: err.to_string(),
            observations,
            parameters,
        }
    }
}
