//! Forecaster: history checks around a forecast model

use crate::config::{EngineConfig, DEFAULT_MIN_HISTORY};
use crate::data::RateSeries;
use crate::error::{ForecastError, Result};
use crate::models::decomposition::DecompositionModel;
use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::window::TravelWindow;

/// Fits a model to a rate series and forecasts a travel window
#[derive(Debug, Clone)]
pub struct Forecaster<M: ForecastModel = DecompositionModel> {
    model: M,
    min_history: usize,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(DecompositionModel::default(), DEFAULT_MIN_HISTORY)
    }
}

impl Forecaster {
    /// Build the default decomposition forecaster from engine settings
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(DecompositionModel::new(config.model), config.min_history)
    }
}

impl<M: ForecastModel> Forecaster<M> {
    /// Create a forecaster requiring at least `min_history` observations
    pub fn new(model: M, min_history: usize) -> Self {
        Self { model, min_history }
    }

    /// Get the underlying model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get the minimum number of observations
    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Fail with `InsufficientHistory` when the series is shorter than the minimum
    pub fn check_history(&self, series: &RateSeries) -> Result<()> {
        if series.len() < self.min_history {
            return Err(ForecastError::InsufficientHistory {
                observations: series.len(),
                required: self.min_history,
            });
        }
        Ok(())
    }

    /// Train the model, rejecting series shorter than the minimum
    pub fn fit(&self, series: &RateSeries) -> Result<M::Trained> {
        self.check_history(series)?;
        self.model.train(series)
    }

    /// Fit the series and forecast every day of the window
    pub fn forecast(
        &self,
        series: &RateSeries,
        window: &TravelWindow,
        confidence: f64,
    ) -> Result<Vec<ForecastPoint>> {
        crate::config::validate_confidence(confidence)?;
        let trained = self.fit(series)?;
        trained.forecast(window, confidence)
    }
}
