//! Trend + seasonality decomposition model
//!
//! The (optionally log-transformed) rate is regressed on a linear trend and
//! Fourier terms for the weekly and yearly cycles. What the regression
//! leaves over is treated as an AR(1) process, which drives both the decay
//! of the last residual into the forecast and the width of the intervals.
//!
//! For a date `h` days after the last observation the forecast variance is
//!
//! ```text
//! σ²·(1 − ρ^(2·max(h,1)))  +  σ²·(1/n + (t_h − t̄)² / Sxx)
//! ```
//!
//! The first term is the AR(1) error accumulated over `h` steps and the
//! second the uncertainty of the fitted trend. Both are non-decreasing in
//! `h`, so interval width never shrinks further out.

use crate::config::{MissingDayPolicy, ModelSettings, Transform};
use crate::data::{RateObservation, RateSeries};
use crate::error::{ForecastError, Result};
use crate::models::{
    enforce_non_decreasing_width, ForecastModel, ForecastPoint, TrainedForecastModel,
};
use crate::window::TravelWindow;
use chrono::{Datelike, NaiveDate};
use fx_math::statistics::{lag1_autocorrelation, two_sided_z};
use fx_math::{least_squares, FourierSeries, TimeLeverage};
use std::collections::BTreeSet;

/// Upper clamp of the residual autocorrelation
const MAX_AUTOCORRELATION: f64 = 0.999;

/// Trend + weekly/yearly seasonality model
#[derive(Debug, Clone)]
pub struct DecompositionModel {
    /// Name of the model
    name: String,
    /// Model settings
    settings: ModelSettings,
}

/// Fitted decomposition model
#[derive(Debug, Clone)]
pub struct TrainedDecomposition {
    /// Name of the model
    name: String,
    /// Settings the model was trained with
    settings: ModelSettings,
    /// Scale the components were fitted on
    transform: Transform,
    /// Date of day offset 0
    origin: NaiveDate,
    /// Date of the last observation
    last_date: NaiveDate,
    /// Days mapped onto one unit of trend time
    time_scale: f64,
    /// Weekly component, if fitted
    weekly: Option<FourierSeries>,
    /// Yearly component, if fitted
    yearly: Option<FourierSeries>,
    /// Regression coefficients: intercept, slope, then seasonal terms
    coefficients: Vec<f64>,
    /// Residual standard deviation
    sigma: f64,
    /// Lag-1 residual autocorrelation
    rho: f64,
    /// Residual of the last observation
    last_residual: f64,
    /// Trend leverage over the fitted times
    leverage: TimeLeverage,
    /// Rows the model was fitted on
    observations: usize,
}

impl Default for DecompositionModel {
    fn default() -> Self {
        Self::new(ModelSettings::default())
    }
}

impl DecompositionModel {
    /// Create a new decomposition model
    pub fn new(settings: ModelSettings) -> Self {
        let policy = match settings.missing_days {
            MissingDayPolicy::ForwardFill => "forward-fill",
            MissingDayPolicy::ObservedOnly => "observed-only",
        };
        let scale = match settings.transform {
            Transform::Additive => "additive",
            Transform::LogAdditive => "log-additive",
        };

        Self {
            name: format!(
                "Decomposition(weekly={}, yearly={}, {}, {})",
                settings.seasonality.weekly_order, settings.seasonality.yearly_order, policy, scale
            ),
            settings,
        }
    }

    /// Get the model settings
    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Rows the regression is fitted on
    fn training_rows(&self, series: &RateSeries) -> Vec<RateObservation> {
        match self.settings.missing_days {
            MissingDayPolicy::ForwardFill => {
                let missing = series.missing_days();
                if missing > 0 {
                    log::debug!(
                        "Forward-filling {} missing days in {} history",
                        missing,
                        series.pair()
                    );
                }
                series.forward_filled()
            }
            MissingDayPolicy::ObservedOnly => series.observations().to_vec(),
        }
    }

    /// Weekly component for the given rows, if the history supports one
    fn weekly_component(&self, rows: &[RateObservation], span_days: usize) -> Option<FourierSeries> {
        let seasonality = &self.settings.seasonality;
        if seasonality.weekly_order == 0 || span_days < seasonality.weekly_min_span_days {
            return None;
        }

        // With days missing from the week, only (weekdays - 1) / 2 harmonics are identifiable
        let weekdays: BTreeSet<u32> = rows
            .iter()
            .map(|o| o.date.weekday().num_days_from_monday())
            .collect();
        let order = seasonality.weekly_order.min((weekdays.len().saturating_sub(1)) / 2);

        FourierSeries::weekly(order).ok()
    }

    /// Yearly component, if the history supports one
    fn yearly_component(&self, span_days: usize) -> Option<FourierSeries> {
        let seasonality = &self.settings.seasonality;
        if seasonality.yearly_order == 0 || span_days < seasonality.yearly_min_span_days {
            return None;
        }

        FourierSeries::yearly(seasonality.yearly_order).ok()
    }
}

impl ForecastModel for DecompositionModel {
    type Trained = TrainedDecomposition;

    fn train(&self, series: &RateSeries) -> Result<Self::Trained> {
        let rows = self.training_rows(series);
        let (origin, last_date) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => {
                return Err(ForecastError::InsufficientHistory {
                    observations: 0,
                    required: 1,
                })
            }
        };

        let span_days = (last_date - origin).num_days() as usize + 1;
        let weekly = self.weekly_component(&rows, span_days);
        let yearly = self.yearly_component(span_days);
        let parameters =
            2 + weekly.map_or(0, |w| w.width()) + yearly.map_or(0, |y| y.width());
        let n = rows.len();

        if span_days < 2 {
            return Err(ForecastError::ModelFitFailure {
                reason: "history covers a single day, trend is not identifiable".to_string(),
                observations: n,
                parameters,
            });
        }

        let time_scale = (span_days - 1) as f64;
        let offsets: Vec<f64> = rows
            .iter()
            .map(|o| (o.date - origin).num_days() as f64)
            .collect();
        let design: Vec<Vec<f64>> = offsets
            .iter()
            .map(|&d| design_row(d, time_scale, weekly.as_ref(), yearly.as_ref()))
            .collect();
        let targets: Vec<f64> = rows
            .iter()
            .map(|o| self.settings.transform.forward(o.rate))
            .collect();

        let fit = least_squares(&design, &targets)
            .map_err(|e| ForecastError::fit_failure(e, n, parameters))?;

        if n <= parameters {
            return Err(ForecastError::ModelFitFailure {
                reason: "no residual degrees of freedom".to_string(),
                observations: n,
                parameters,
            });
        }

        let sigma = (fit.residual_sum_of_squares() / (n - parameters) as f64).sqrt();
        let rho = lag1_autocorrelation(&fit.residuals)
            .map_err(|e| ForecastError::fit_failure(e, n, parameters))?
            .clamp(0.0, MAX_AUTOCORRELATION);
        let times: Vec<f64> = offsets.iter().map(|d| d / time_scale).collect();
        let leverage = TimeLeverage::from_times(&times)
            .map_err(|e| ForecastError::fit_failure(e, n, parameters))?;
        let last_residual = fit.residuals.last().copied().unwrap_or(0.0);

        if !sigma.is_finite() || !rho.is_finite() || !last_residual.is_finite() {
            return Err(ForecastError::ModelFitFailure {
                reason: "residual statistics are not finite".to_string(),
                observations: n,
                parameters,
            });
        }

        log::debug!(
            "Fitted {} on {} rows of {}: {} parameters, sigma={:.6}, rho={:.4}",
            self.name,
            n,
            series.pair(),
            parameters,
            sigma,
            rho
        );

        Ok(TrainedDecomposition {
            name: self.name.clone(),
            settings: self.settings,
            transform: self.settings.transform,
            origin,
            last_date,
            time_scale,
            weekly,
            yearly,
            coefficients: fit.coefficients,
            sigma,
            rho,
            last_residual,
            leverage,
            observations: n,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedDecomposition {
    /// Settings the model was trained with
    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Residual standard deviation on the modelling scale
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Lag-1 autocorrelation of the residuals
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Number of regression parameters
    pub fn parameters(&self) -> usize {
        self.coefficients.len()
    }

    /// Trend slope per day on the modelling scale
    pub fn daily_slope(&self) -> f64 {
        self.coefficients[1] / self.time_scale
    }

    /// Trend + seasonality on the modelling scale at day offset `d`
    fn structural(&self, d: f64) -> f64 {
        design_row(d, self.time_scale, self.weekly.as_ref(), self.yearly.as_ref())
            .iter()
            .zip(&self.coefficients)
            .map(|(x, b)| x * b)
            .sum()
    }

    /// Forecast variance on the modelling scale `h` days after the last observation
    fn variance(&self, h: i64) -> f64 {
        let steps = h.max(1) as i32;
        let sigma_sq = self.sigma * self.sigma;
        let ar = sigma_sq * (1.0 - self.rho.powi(2 * steps));
        let last_offset = (self.last_date - self.origin).num_days() as f64;
        let t = (last_offset + h.max(0) as f64) / self.time_scale;
        ar + sigma_sq * self.leverage.factor(t)
    }
}

impl TrainedForecastModel for TrainedDecomposition {
    fn forecast(&self, window: &TravelWindow, confidence: f64) -> Result<Vec<ForecastPoint>> {
        let z = two_sided_z(confidence)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        let mut points = Vec::with_capacity(window.horizon_days());
        for date in window.dates() {
            let d = (date - self.origin).num_days() as f64;
            let h = (date - self.last_date).num_days();

            let mut estimate = self.structural(d);
            if h > 0 {
                estimate += self.rho.powi(h.min(i32::MAX as i64) as i32) * self.last_residual;
            }
            let half_width = z * self.variance(h).sqrt();

            let point = ForecastPoint {
                date,
                point_estimate: self.transform.inverse(estimate),
                lower_bound: self.transform.inverse(estimate - half_width),
                upper_bound: self.transform.inverse(estimate + half_width),
                confidence_level: confidence,
            };

            if !(point.point_estimate.is_finite()
                && point.lower_bound.is_finite()
                && point.upper_bound.is_finite())
            {
                return Err(ForecastError::ModelFitFailure {
                    reason: format!("non-finite forecast on {}", date),
                    observations: self.observations,
                    parameters: self.parameters(),
                });
            }
            points.push(point);
        }

        enforce_non_decreasing_width(&mut points);
        Ok(points)
    }

    fn last_observation(&self) -> NaiveDate {
        self.last_date
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Regression row for day offset `d`: intercept, scaled trend, seasonal terms
fn design_row(
    d: f64,
    time_scale: f64,
    weekly: Option<&FourierSeries>,
    yearly: Option<&FourierSeries>,
) -> Vec<f64> {
    let width = 2 + weekly.map_or(0, |w| w.width()) + yearly.map_or(0, |y| y.width());
    let mut row = Vec::with_capacity(width);
    row.push(1.0);
    row.push(d / time_scale);
    if let Some(weekly) = weekly {
        weekly.extend_row(d, &mut row);
    }
    if let Some(yearly) = yearly {
        yearly.extend_row(d, &mut row);
    }
    row
}
