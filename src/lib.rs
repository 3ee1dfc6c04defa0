//! # Travel FX
//!
//! `travel_fx` recommends the most favorable days to exchange currency
//! between "today" and a departure date.
//!
//! The engine lives in [`fx_forecast`]; numeric kernels live in [`fx_math`].
//! This crate re-exports both and hosts the `travel_fx` command-line tool.
//!
//! ## Example
//!
//! ```
//! use chrono::{Days, NaiveDate};
//! use travel_fx::{utils::linear_series, CurrencyPair, Direction, RecommendationPipeline};
//!
//! let pair = CurrencyPair::new("EUR", "USD").unwrap();
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = linear_series(pair.clone(), start, 120, 1.08, 0.001).unwrap();
//!
//! let today = series.last_date().unwrap() + Days::new(1);
//! let travel = today + Days::new(9);
//! let set = RecommendationPipeline::default()
//!     .recommend(&series, today, travel, &pair, Direction::BaseToQuote, 3, 0.8, 0.0, 365)
//!     .unwrap();
//!
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.best().unwrap().point.date, travel);
//! ```

pub use fx_forecast::*;
pub use fx_math;
