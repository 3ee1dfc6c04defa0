//! Synthetic rate series for tests, demos and benchmarks

use crate::currency::CurrencyPair;
use crate::data::{RateObservation, RateSeries};
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Parameters of a synthetic daily series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSeries {
    /// First date
    pub start: NaiveDate,
    /// Number of consecutive days
    pub days: usize,
    /// Rate on the first day
    pub start_rate: f64,
    /// Deterministic change per day
    pub daily_drift: f64,
    /// Amplitude of a 7-day sine cycle
    pub weekly_amplitude: f64,
    /// Standard deviation of Gaussian day noise
    pub noise_sd: f64,
    /// RNG seed
    pub seed: u64,
}

impl SyntheticSeries {
    /// A noise-free straight line
    pub fn linear(start: NaiveDate, days: usize, start_rate: f64, daily_drift: f64) -> Self {
        Self {
            start,
            days,
            start_rate,
            daily_drift,
            weekly_amplitude: 0.0,
            noise_sd: 0.0,
            seed: 0,
        }
    }

    /// Set the weekly cycle amplitude
    pub fn with_weekly(mut self, amplitude: f64) -> Self {
        self.weekly_amplitude = amplitude;
        self
    }

    /// Set the noise level and seed
    pub fn with_noise(mut self, noise_sd: f64, seed: u64) -> Self {
        self.noise_sd = noise_sd;
        self.seed = seed;
        self
    }

    /// Generate the series; identical parameters give identical output
    pub fn generate(&self, pair: CurrencyPair) -> Result<RateSeries> {
        let noise = Normal::new(0.0, self.noise_sd)
            .map_err(|e| ForecastError::InvalidParameter(format!("Invalid noise level: {}", e)))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut observations = Vec::with_capacity(self.days);
        for i in 0..self.days {
            let date = self
                .start
                .checked_add_days(Days::new(i as u64))
                .ok_or_else(|| ForecastError::InvalidParameter("Series runs past the calendar".to_string()))?;
            let cycle = self.weekly_amplitude
                * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin();
            let jitter = if self.noise_sd > 0.0 {
                noise.sample(&mut rng)
            } else {
                0.0
            };
            observations.push(RateObservation::new(
                date,
                self.start_rate + self.daily_drift * i as f64 + cycle + jitter,
            ));
        }

        RateSeries::new(pair, observations)
    }
}

/// Noise-free linear series of `days` consecutive days
pub fn linear_series(
    pair: CurrencyPair,
    start: NaiveDate,
    days: usize,
    start_rate: f64,
    daily_drift: f64,
) -> Result<RateSeries> {
    SyntheticSeries::linear(start, days, start_rate, daily_drift).generate(pair)
}

/// Drop Saturdays and Sundays, as market data does
pub fn weekdays_only(series: &RateSeries) -> Result<RateSeries> {
    use chrono::{Datelike, Weekday};

    let observations = series
        .observations()
        .iter()
        .filter(|o| !matches!(o.date.weekday(), Weekday::Sat | Weekday::Sun))
        .copied()
        .collect();

    RateSeries::new(series.pair().clone(), observations)
}
