//! Travel window resolution

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default upper bound on the forecast horizon, in days
pub const DEFAULT_MAX_HORIZON_DAYS: usize = 365;

/// The calendar days from "today" through the travel date, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TravelWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TravelWindow {
    /// First day of the window ("today")
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (the travel date)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the window
    pub fn horizon_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Check whether a date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every calendar day in the window, in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }
}

/// Converts a travel date and "today" into a validated window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResolver {
    max_horizon_days: usize,
}

impl Default for WindowResolver {
    fn default() -> Self {
        Self {
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
        }
    }
}

impl WindowResolver {
    /// Create a resolver with the given maximum horizon
    pub fn new(max_horizon_days: usize) -> Result<Self> {
        if max_horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_horizon_days must be at least 1".to_string(),
            ));
        }

        Ok(Self { max_horizon_days })
    }

    /// Get the maximum horizon
    pub fn max_horizon_days(&self) -> usize {
        self.max_horizon_days
    }

    /// Resolve the window with this resolver's maximum horizon
    pub fn window(&self, today: NaiveDate, travel_date: NaiveDate) -> Result<TravelWindow> {
        resolve(today, travel_date, self.max_horizon_days)
    }
}

/// Build the travel window `[today, travel_date]`.
///
/// Fails with `InvalidWindow` when the travel date is before today or the
/// window would be longer than `max_horizon_days`.
pub fn resolve(
    today: NaiveDate,
    travel_date: NaiveDate,
    max_horizon_days: usize,
) -> Result<TravelWindow> {
    let horizon_days = (travel_date - today).num_days() + 1;

    let invalid = |reason: &str| ForecastError::InvalidWindow {
        today,
        travel_date,
        horizon_days,
        max_horizon_days,
        reason: reason.to_string(),
    };

    if travel_date < today {
        return Err(invalid("travel date is before today"));
    }
    if max_horizon_days == 0 {
        return Err(invalid("maximum horizon must be at least one day"));
    }
    if horizon_days as u64 > max_horizon_days as u64 {
        return Err(invalid("horizon exceeds the maximum"));
    }
    // Window end must stay representable when iterating days
    if travel_date.checked_add_days(Days::new(1)).is_none() {
        return Err(invalid("travel date is out of range"));
    }

    Ok(TravelWindow {
        start: today,
        end: travel_date,
    })
}
