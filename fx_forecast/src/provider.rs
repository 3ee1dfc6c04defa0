//! Sources of historical rate series

use crate::currency::CurrencyPair;
use crate::data::{DataLoader, RateSeries};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default amount of history requested
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;

/// A request for daily history of one pair over `[start, end]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryRequest {
    /// Pair to fetch
    pub pair: CurrencyPair,
    /// First day, inclusive
    pub start: NaiveDate,
    /// Last day, inclusive
    pub end: NaiveDate,
}

impl HistoryRequest {
    /// Create a new request
    pub fn new(pair: CurrencyPair, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ForecastError::InvalidParameter(format!(
                "History window ends ({}) before it starts ({})",
                end, start
            )));
        }

        Ok(Self { pair, start, end })
    }

    /// The `years` of history ending the day before `today`
    pub fn lookback(pair: CurrencyPair, today: NaiveDate, years: u32) -> Result<Self> {
        let end = today.pred_opt().ok_or_else(|| {
            ForecastError::InvalidParameter(format!("No day before {}", today))
        })?;
        let start = years_before(today, years).ok_or_else(|| {
            ForecastError::InvalidParameter(format!("{} years before {} is out of range", years, today))
        })?;

        Self::new(pair, start.min(end), end)
    }
}

fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = date.year() - years as i32;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        // Feb 29 in a non-leap year
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
}

/// Supplies rate history
pub trait DataProvider {
    /// Fetch the series for the request, or `DataUnavailable`
    fn fetch(&self, request: &HistoryRequest) -> Result<RateSeries>;
}

/// Serves series held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<CurrencyPair, RateSeries>,
}

impl InMemoryProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the series for its pair
    pub fn insert(&mut self, series: RateSeries) {
        self.series.insert(series.pair().clone(), series);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_series(mut self, series: RateSeries) -> Self {
        self.insert(series);
        self
    }
}

impl DataProvider for InMemoryProvider {
    fn fetch(&self, request: &HistoryRequest) -> Result<RateSeries> {
        let series = self.series.get(&request.pair).ok_or_else(|| {
            ForecastError::DataUnavailable(format!("No series held for {}", request.pair))
        })?;

        Ok(series.between(request.start, request.end))
    }
}

/// Reads `<BASE><QUOTE>.csv` files from a directory
#[derive(Debug, Clone)]
pub struct CsvDirectoryProvider {
    root: PathBuf,
}

impl CsvDirectoryProvider {
    /// Create a provider over a directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the file holding a pair
    pub fn path_for(&self, pair: &CurrencyPair) -> PathBuf {
        self.root.join(format!("{}{}.csv", pair.base(), pair.quote()))
    }
}

impl DataProvider for CsvDirectoryProvider {
    fn fetch(&self, request: &HistoryRequest) -> Result<RateSeries> {
        let path = self.path_for(&request.pair);
        if !path.is_file() {
            return Err(ForecastError::DataUnavailable(format!(
                "No data file for {} at {}",
                request.pair,
                path.display()
            )));
        }

        let series = DataLoader::from_csv(&path, request.pair.clone())?;
        let window = series.between(request.start, request.end);
        log::debug!(
            "Loaded {} of {} rows for {} from {}",
            window.len(),
            series.len(),
            request.pair,
            path.display()
        );
        Ok(window)
    }
}
