//! # FX Forecast
//!
//! A Rust library that forecasts daily exchange rates over a travel window
//! and recommends the most favorable days to exchange currency.
//!
//! ## Features
//!
//! - Validated daily rate series with CSV loading
//! - Trend + weekly/yearly seasonality model with AR(1) residuals
//! - Confidence intervals whose width never shrinks with the horizon
//! - Favorability ranking with a risk-aversion penalty
//! - Optional thread-safe fit cache
//! - Data providers and reminder sinks as pluggable traits
//!
//! ## Rate Convention
//!
//! A rate is the amount of quote currency received per unit of base
//! currency. With `Direction::BaseToQuote` a higher rate is favorable; with
//! `Direction::QuoteToBase` a lower rate is.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use fx_forecast::config::EngineConfig;
//! use fx_forecast::currency::CurrencyPair;
//! use fx_forecast::data::DataLoader;
//! use fx_forecast::pipeline::RecommendationPipeline;
//! use fx_forecast::ranking::Direction;
//!
//! # fn main() -> fx_forecast::error::Result<()> {
//! let pair = CurrencyPair::new("EUR", "USD")?;
//! let series = DataLoader::from_csv("EURUSD.csv", pair.clone())?;
//!
//! let pipeline = RecommendationPipeline::new(EngineConfig::default())?;
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let travel = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//!
//! let set = pipeline.recommend(
//!     &series,
//!     today,
//!     travel,
//!     &pair,
//!     Direction::BaseToQuote,
//!     3,    // top_k
//!     0.80, // confidence
//!     0.5,  // risk aversion
//!     365,  // max horizon
//! )?;
//!
//! for entry in &set {
//!     println!("#{} {} {:.4}", entry.rank, entry.point.date, entry.point.point_estimate);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod currency;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod provider;
pub mod ranking;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use crate::cache::FitCache;
pub use crate::config::{EngineConfig, MissingDayPolicy, ModelSettings, SeasonalityConfig, Transform};
pub use crate::currency::CurrencyPair;
pub use crate::data::{DataLoader, RateObservation, RateSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::Forecaster;
pub use crate::models::decomposition::{DecompositionModel, TrainedDecomposition};
pub use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
pub use crate::notify::{LogSink, MemorySink, NotificationSink, Reminder};
pub use crate::pipeline::{RecommendRequest, RecommendationPipeline};
pub use crate::provider::{CsvDirectoryProvider, DataProvider, HistoryRequest, InMemoryProvider};
pub use crate::ranking::{rank, Direction, RankingEngine, Recommendation, RecommendationSet};
pub use crate::window::{resolve, TravelWindow, WindowResolver};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
