//! Historical rate series and CSV loading

use crate::currency::CurrencyPair;
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single daily observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Units of quote currency per unit of base currency
    pub rate: f64,
}

impl RateObservation {
    /// Create a new observation
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }
}

/// Validated historical daily rates for one currency pair.
///
/// Dates are strictly increasing and every rate is finite and positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSeries {
    pair: CurrencyPair,
    observations: Vec<RateObservation>,
}

impl RateSeries {
    /// Create a validated series
    pub fn new(pair: CurrencyPair, observations: Vec<RateObservation>) -> Result<Self> {
        for (i, obs) in observations.iter().enumerate() {
            if !obs.rate.is_finite() || obs.rate <= 0.0 {
                return Err(ForecastError::InvalidSeries(format!(
                    "Rate on {} must be positive and finite, got {}",
                    obs.date, obs.rate
                )));
            }
            if i > 0 && obs.date <= observations[i - 1].date {
                return Err(ForecastError::InvalidSeries(format!(
                    "Dates must be strictly increasing: {} follows {}",
                    obs.date,
                    observations[i - 1].date
                )));
            }
        }

        Ok(Self { pair, observations })
    }

    /// Create a series from `(date, rate)` tuples
    pub fn from_pairs(pair: CurrencyPair, points: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let observations = points
            .into_iter()
            .map(|(date, rate)| RateObservation::new(date, rate))
            .collect();
        Self::new(pair, observations)
    }

    /// Get the currency pair
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    /// Get the observations
    pub fn observations(&self) -> &[RateObservation] {
        &self.observations
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Date of the first observation
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    /// Date of the last observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Get the rates as a vector
    pub fn rates(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.rate).collect()
    }

    /// Calendar days between the first and last observation with no observation
    pub fn missing_days(&self) -> usize {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => {
                let span = (last - first).num_days() as usize + 1;
                span - self.observations.len()
            }
            _ => 0,
        }
    }

    /// Expand to one observation per calendar day, carrying the last seen rate forward
    pub fn forward_filled(&self) -> Vec<RateObservation> {
        let mut filled = Vec::with_capacity(self.observations.len() + self.missing_days());

        for obs in &self.observations {
            if let Some(prev) = filled.last().copied() {
                let RateObservation { date, rate } = prev;
                let mut day = date;
                while let Some(next) = day.checked_add_days(Days::new(1)) {
                    if next >= obs.date {
                        break;
                    }
                    filled.push(RateObservation::new(next, rate));
                    day = next;
                }
            }
            filled.push(*obs);
        }

        filled
    }

    /// Observations with `start <= date <= end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            pair: self.pair.clone(),
            observations: self
                .observations
                .iter()
                .filter(|o| o.date >= start && o.date <= end)
                .copied()
                .collect(),
        }
    }
}

/// Data loader for rate series stored as CSV
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a rate series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, pair: CurrencyPair) -> Result<RateSeries> {
        let file = File::open(path)?;
        Self::from_reader(file, pair)
    }

    /// Load a rate series from any CSV source.
    ///
    /// The header must contain a date column and a rate column. Rows with a
    /// blank or non-numeric rate are dropped, duplicate dates keep the first
    /// row, and rows are sorted by date before validation.
    pub fn from_reader<R: Read>(reader: R, pair: CurrencyPair) -> Result<RateSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let date_idx = Self::detect_date_column(&headers)?;
        let rate_idx = Self::detect_rate_column(&headers)?;

        let mut observations = Vec::new();
        let mut dropped = 0usize;

        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date = Self::parse_date(raw_date).ok_or_else(|| {
                ForecastError::InvalidSeries(format!(
                    "Row {}: cannot parse date '{}'",
                    line + 2,
                    raw_date
                ))
            })?;

            match record.get(rate_idx).and_then(|v| v.parse::<f64>().ok()) {
                Some(rate) if rate.is_finite() => observations.push(RateObservation::new(date, rate)),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            log::debug!("Dropped {} rows without a usable rate for {}", dropped, pair);
        }

        observations.sort_by_key(|o| o.date);
        let before = observations.len();
        observations.dedup_by_key(|o| o.date);
        if observations.len() < before {
            log::debug!(
                "Dropped {} duplicate dates for {}",
                before - observations.len(),
                pair
            );
        }

        RateSeries::new(pair, observations)
    }

    /// Detect the date column in a header row
    fn detect_date_column(headers: &csv::StringRecord) -> Result<usize> {
        headers
            .iter()
            .position(|name| {
                let lower = name.to_lowercase();
                lower.contains("date") || lower.contains("time") || lower == "ds"
            })
            .ok_or_else(|| ForecastError::CsvError("No date column found in data".to_string()))
    }

    /// Detect the rate column in a header row
    fn detect_rate_column(headers: &csv::StringRecord) -> Result<usize> {
        let names: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        ["close", "rate", "price"]
            .iter()
            .find_map(|wanted| names.iter().position(|n| n.contains(wanted)))
            .or_else(|| names.iter().position(|n| n == "y"))
            .ok_or_else(|| ForecastError::CsvError("No rate column found in data".to_string()))
    }

    /// Parse `YYYY-MM-DD`, ignoring any time-of-day suffix
    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}
