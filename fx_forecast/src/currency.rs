//! Currency codes and pairs

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regions offered to travellers and the currency each one uses
pub const REGION_CURRENCIES: [(&str, &str); 7] = [
    ("United States", "USD"),
    ("India", "INR"),
    ("United Kingdom", "GBP"),
    ("Euro Area", "EUR"),
    ("Japan", "JPY"),
    ("Australia", "AUD"),
    ("Canada", "CAD"),
];

/// Look up the currency code used in a region (case-insensitive)
pub fn currency_for_region(region: &str) -> Option<&'static str> {
    REGION_CURRENCIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(region.trim()))
        .map(|(_, code)| *code)
}

/// An exchange-rate pair: the rate is the amount of `quote` received per unit of `base`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PairRepr", into = "PairRepr")]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

#[derive(Serialize, Deserialize)]
struct PairRepr {
    base: String,
    quote: String,
}

impl TryFrom<PairRepr> for CurrencyPair {
    type Error = ForecastError;

    fn try_from(repr: PairRepr) -> Result<Self> {
        CurrencyPair::new(&repr.base, &repr.quote)
    }
}

impl From<CurrencyPair> for PairRepr {
    fn from(pair: CurrencyPair) -> Self {
        PairRepr {
            base: pair.base,
            quote: pair.quote,
        }
    }
}

impl CurrencyPair {
    /// Create a pair from two three-letter codes (normalised to upper case)
    pub fn new(base: &str, quote: &str) -> Result<Self> {
        let base = normalize_code(base)?;
        let quote = normalize_code(quote)?;

        if base == quote {
            return Err(ForecastError::InvalidPair(format!(
                "Base and quote must differ, got {}/{}",
                base, quote
            )));
        }

        Ok(Self { base, quote })
    }

    /// Create the pair for converting money from one region's currency to another's
    pub fn from_regions(from: &str, to: &str) -> Result<Self> {
        let base = currency_for_region(from)
            .ok_or_else(|| ForecastError::InvalidPair(format!("Unknown region '{}'", from)))?;
        let quote = currency_for_region(to)
            .ok_or_else(|| ForecastError::InvalidPair(format!("Unknown region '{}'", to)))?;

        Self::new(base, quote)
    }

    /// Get the base currency code
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Get the quote currency code
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// The same pair quoted the other way round
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Market symbol used by FX quote services, e.g. `EURUSD=X`
    pub fn ticker(&self) -> String {
        format!("{}{}=X", self.base, self.quote)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ForecastError::InvalidPair(format!(
            "'{}' is not a three-letter currency code",
            code
        )));
    }

    Ok(code.to_ascii_uppercase())
}
