//! Engine configuration
//!
//! Every tunable of the forecasting and ranking engine lives in
//! [`EngineConfig`], which is passed explicitly into the pipeline.

use crate::error::{ForecastError, Result};
use crate::ranking::Direction;
use crate::window::DEFAULT_MAX_HORIZON_DAYS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default minimum number of observations needed to fit a model
pub const DEFAULT_MIN_HISTORY: usize = 30;

/// Default confidence level of forecast intervals
pub const DEFAULT_CONFIDENCE: f64 = 0.80;

/// Default number of recommended days
pub const DEFAULT_TOP_K: usize = 3;

/// How calendar days without an observation (weekends, holidays) are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDayPolicy {
    /// Carry the last observed rate into every missing day, then fit on the daily grid
    #[default]
    ForwardFill,
    /// Fit on observed days only, with seasonality indexed by true calendar offset
    ObservedOnly,
}

/// Scale on which trend and seasonality combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    /// Components add on the rate itself
    #[default]
    Additive,
    /// Components add on the log rate (multiplicative on the rate)
    LogAdditive,
}

impl Transform {
    /// Map a rate onto the modelling scale
    pub fn forward(&self, rate: f64) -> f64 {
        match self {
            Transform::Additive => rate,
            Transform::LogAdditive => rate.ln(),
        }
    }

    /// Map a modelled value back onto the rate scale
    pub fn inverse(&self, value: f64) -> f64 {
        match self {
            Transform::Additive => value,
            Transform::LogAdditive => value.exp(),
        }
    }
}

/// Fourier orders of the seasonal components; an order of 0 disables a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalityConfig {
    /// Harmonics of the 7-day cycle
    pub weekly_order: usize,
    /// Harmonics of the 365.25-day cycle
    pub yearly_order: usize,
    /// Shortest history span (days) for which the weekly cycle is fitted
    pub weekly_min_span_days: usize,
    /// Shortest history span (days) for which the yearly cycle is fitted
    pub yearly_min_span_days: usize,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            weekly_order: 3,
            yearly_order: 10,
            weekly_min_span_days: 14,
            yearly_min_span_days: 730,
        }
    }
}

/// Settings of the trend + seasonality model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Missing-day policy
    pub missing_days: MissingDayPolicy,
    /// Additive or log-additive decomposition
    pub transform: Transform,
    /// Seasonal components
    pub seasonality: SeasonalityConfig,
}

/// Full configuration of the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum observations required to fit a model
    pub min_history: usize,
    /// Confidence level of forecast intervals, in (0, 1)
    pub confidence: f64,
    /// Number of days to recommend
    pub top_k: usize,
    /// Penalty per unit of interval width
    pub risk_aversion: f64,
    /// Longest accepted travel window, in days
    pub max_horizon_days: usize,
    /// Which side of the pair the traveller converts from
    pub direction: Direction,
    /// Model settings
    pub model: ModelSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_history: DEFAULT_MIN_HISTORY,
            confidence: DEFAULT_CONFIDENCE,
            top_k: DEFAULT_TOP_K,
            risk_aversion: 0.0,
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
            direction: Direction::default(),
            model: ModelSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration; absent fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.min_history < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_history must be at least 2".to_string(),
            ));
        }
        validate_confidence(self.confidence)?;
        validate_top_k(self.top_k)?;
        validate_risk_aversion(self.risk_aversion)?;
        if self.max_horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_horizon_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_confidence(confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "confidence must be in (0, 1), got {}",
            confidence
        )));
    }
    Ok(())
}

pub(crate) fn validate_top_k(top_k: usize) -> Result<()> {
    if top_k == 0 {
        return Err(ForecastError::InvalidParameter(
            "top_k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_risk_aversion(risk_aversion: f64) -> Result<()> {
    if !risk_aversion.is_finite() || risk_aversion < 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "risk_aversion must be finite and non-negative, got {}",
            risk_aversion
        )));
    }
    Ok(())
}
