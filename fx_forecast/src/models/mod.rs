//! Forecasting models for daily rate series

use crate::data::RateSeries;
use crate::error::Result;
use crate::window::TravelWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Forecast for a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast date
    pub date: NaiveDate,
    /// Expected rate
    pub point_estimate: f64,
    /// Lower end of the confidence interval
    pub lower_bound: f64,
    /// Upper end of the confidence interval
    pub upper_bound: f64,
    /// Probability the interval is meant to cover
    pub confidence_level: f64,
}

impl ForecastPoint {
    /// Width of the confidence interval
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Generate one point per calendar day of the window
    fn forecast(&self, window: &TravelWindow, confidence: f64) -> Result<Vec<ForecastPoint>>;

    /// Date of the last observation the model was trained on
    fn last_observation(&self) -> NaiveDate;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a rate series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a rate series
    fn train(&self, series: &RateSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Widen intervals so their width never shrinks from one day to the next.
///
/// Each deficit is split evenly between the two bounds, so the point
/// estimate stays inside the interval.
pub fn enforce_non_decreasing_width(points: &mut [ForecastPoint]) {
    let mut widest = 0.0_f64;
    for point in points.iter_mut() {
        let width = point.interval_width();
        if width < widest {
            let pad = (widest - width) / 2.0;
            point.lower_bound -= pad;
            point.upper_bound += pad;
        }
        widest = widest.max(point.interval_width());
    }
}

pub mod decomposition;
