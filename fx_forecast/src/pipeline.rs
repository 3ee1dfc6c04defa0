//! Recommendation pipeline
//!
//! Resolves the travel window, forecasts it and ranks the days. Any failure
//! of a stage is returned unchanged.

use crate::cache::FitCache;
use crate::config::{validate_confidence, EngineConfig};
use crate::currency::CurrencyPair;
use crate::data::RateSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::Forecaster;
use crate::models::decomposition::TrainedDecomposition;
use crate::models::TrainedForecastModel;
use crate::ranking::{Direction, RankingEngine, RecommendationSet};
use crate::window::resolve;
use chrono::NaiveDate;
use std::sync::Arc;

/// Per-request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    /// Pair the series is quoted in
    pub pair: CurrencyPair,
    /// First day of the window
    pub today: NaiveDate,
    /// Departure date, last day of the window
    pub travel_date: NaiveDate,
    /// Conversion direction
    pub direction: Direction,
    /// Number of days to recommend
    pub top_k: usize,
    /// Interval confidence level
    pub confidence: f64,
    /// Penalty per unit of interval width
    pub risk_aversion: f64,
    /// Longest accepted window
    pub max_horizon_days: usize,
}

impl RecommendRequest {
    /// Build a request taking every tunable from the configuration
    pub fn from_config(
        config: &EngineConfig,
        pair: CurrencyPair,
        today: NaiveDate,
        travel_date: NaiveDate,
    ) -> Self {
        Self {
            pair,
            today,
            travel_date,
            direction: config.direction,
            top_k: config.top_k,
            confidence: config.confidence,
            risk_aversion: config.risk_aversion,
            max_horizon_days: config.max_horizon_days,
        }
    }
}

/// Orchestrates window resolution, forecasting and ranking
#[derive(Debug, Clone)]
pub struct RecommendationPipeline {
    config: EngineConfig,
    forecaster: Forecaster,
    cache: Option<Arc<FitCache<TrainedDecomposition>>>,
}

impl Default for RecommendationPipeline {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            forecaster: Forecaster::default(),
            cache: None,
        }
    }
}

impl RecommendationPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let forecaster = Forecaster::from_config(&config);

        Ok(Self {
            config,
            forecaster,
            cache: None,
        })
    }

    /// Share fitted models through a cache
    pub fn with_cache(mut self, cache: Arc<FitCache<TrainedDecomposition>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the fit cache, if any
    pub fn cache(&self) -> Option<&Arc<FitCache<TrainedDecomposition>>> {
        self.cache.as_ref()
    }

    /// Recommend the best days to exchange.
    ///
    /// Parameters are checked before any work is done; the window is resolved
    /// before the model is fitted.
    #[allow(clippy::too_many_arguments)]
    pub fn recommend(
        &self,
        series: &RateSeries,
        today: NaiveDate,
        travel_date: NaiveDate,
        pair: &CurrencyPair,
        direction: Direction,
        top_k: usize,
        confidence: f64,
        risk_aversion: f64,
        max_horizon_days: usize,
    ) -> Result<RecommendationSet> {
        if series.pair() != pair {
            return Err(ForecastError::InvalidPair(format!(
                "Series is quoted in {} but {} was requested",
                series.pair(),
                pair
            )));
        }
        validate_confidence(confidence)?;
        let ranking = RankingEngine::new(direction, top_k, risk_aversion)?;

        let window = resolve(today, travel_date, max_horizon_days)?;
        self.forecaster.check_history(series)?;
        let points = match (&self.cache, series.last_date()) {
            (Some(cache), Some(last_date)) => {
                let mut trained =
                    cache.get_or_fit(pair, last_date, || self.forecaster.fit(series))?;
                if trained.settings() != self.forecaster.model().settings() {
                    log::warn!(
                        "Cached fit for {} at {} used other model settings, refitting",
                        pair,
                        last_date
                    );
                    trained = Arc::new(self.forecaster.fit(series)?);
                }
                trained.forecast(&window, confidence)?
            }
            _ => self.forecaster.forecast(series, &window, confidence)?,
        };

        let set = ranking.rank(&points)?;
        if let Some(best) = set.best() {
            log::info!(
                "{} {}: best of {} day(s) is {} at {:.4} ({} recommended)",
                pair,
                direction,
                window.horizon_days(),
                best.point.date,
                best.point.point_estimate,
                set.len()
            );
        }

        Ok(set)
    }

    /// Recommend using a request struct
    pub fn recommend_request(
        &self,
        series: &RateSeries,
        request: &RecommendRequest,
    ) -> Result<RecommendationSet> {
        self.recommend(
            series,
            request.today,
            request.travel_date,
            &request.pair,
            request.direction,
            request.top_k,
            request.confidence,
            request.risk_aversion,
            request.max_horizon_days,
        )
    }

    /// Recommend with every tunable taken from the configuration
    pub fn recommend_with_defaults(
        &self,
        series: &RateSeries,
        today: NaiveDate,
        travel_date: NaiveDate,
    ) -> Result<RecommendationSet> {
        let request =
            RecommendRequest::from_config(&self.config, series.pair().clone(), today, travel_date);
        self.recommend_request(series, &request)
    }
}
