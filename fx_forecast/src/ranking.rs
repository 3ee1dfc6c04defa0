//! Ranking of forecast days by favorability
//!
//! A day's favorability score is
//! `direction.sign() * point_estimate - risk_aversion * interval_width`.
//! Days are ordered by score (highest first), then by earlier date, then by
//! narrower interval.

use crate::config::{validate_risk_aversion, validate_top_k};
use crate::error::{ForecastError, Result};
use crate::models::ForecastPoint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which way the traveller converts.
///
/// Rates are quoted as units of quote currency per unit of base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Selling base for quote: a higher rate is better
    #[default]
    BaseToQuote,
    /// Selling quote for base: a lower rate is better
    QuoteToBase,
}

impl Direction {
    /// +1 when higher rates are favorable, -1 otherwise
    pub fn sign(&self) -> f64 {
        match self {
            Direction::BaseToQuote => 1.0,
            Direction::QuoteToBase => -1.0,
        }
    }

    /// Check whether rate `a` is at least as favorable as rate `b`
    pub fn at_least_as_good(&self, a: f64, b: f64) -> bool {
        self.sign() * a >= self.sign() * b
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::BaseToQuote => write!(f, "base-to-quote"),
            Direction::QuoteToBase => write!(f, "quote-to-base"),
        }
    }
}

impl FromStr for Direction {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base-to-quote" | "b2q" | "sell-base" => Ok(Direction::BaseToQuote),
            "quote-to-base" | "q2b" | "buy-base" => Ok(Direction::QuoteToBase),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown direction '{}', expected 'base-to-quote' or 'quote-to-base'",
                other
            ))),
        }
    }
}

/// One ranked day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based rank
    pub rank: usize,
    /// The forecast for the day
    pub point: ForecastPoint,
    /// Score the day was ranked by
    pub favorability_score: f64,
}

/// Top-ranked days, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    entries: Vec<Recommendation>,
}

impl RecommendationSet {
    /// Ranked entries, best first
    pub fn entries(&self) -> &[Recommendation] {
        &self.entries
    }

    /// Number of recommended days
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recommended
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The highest-ranked day
    pub fn best(&self) -> Option<&Recommendation> {
        self.entries.first()
    }

    /// Iterate over the entries in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RecommendationSet {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Favorability score of a single forecast point
pub fn favorability_score(point: &ForecastPoint, direction: Direction, risk_aversion: f64) -> f64 {
    direction.sign() * point.point_estimate - risk_aversion * point.interval_width()
}

/// Ranks forecast points with fixed direction, K and risk aversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingEngine {
    direction: Direction,
    top_k: usize,
    risk_aversion: f64,
}

impl RankingEngine {
    /// Create a new ranking engine
    pub fn new(direction: Direction, top_k: usize, risk_aversion: f64) -> Result<Self> {
        validate_top_k(top_k)?;
        validate_risk_aversion(risk_aversion)?;

        Ok(Self {
            direction,
            top_k,
            risk_aversion,
        })
    }

    /// Get the direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the number of days selected
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Get the risk aversion
    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Score, order and truncate the points
    pub fn rank(&self, points: &[ForecastPoint]) -> Result<RecommendationSet> {
        if points.is_empty() {
            return Err(ForecastError::EmptyForecast);
        }

        let mut scored: Vec<(f64, &ForecastPoint)> = points
            .iter()
            .map(|p| (favorability_score(p, self.direction, self.risk_aversion), p))
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| {
                    a.interval_width()
                        .partial_cmp(&b.interval_width())
                        .unwrap_or(Ordering::Equal)
                })
        });

        let entries = scored
            .into_iter()
            .take(self.top_k)
            .enumerate()
            .map(|(i, (favorability_score, point))| Recommendation {
                rank: i + 1,
                point: *point,
                favorability_score,
            })
            .collect();

        Ok(RecommendationSet { entries })
    }
}

/// Rank forecast points and keep the best `top_k`.
///
/// Fails with `EmptyForecast` when `points` is empty.
pub fn rank(
    points: &[ForecastPoint],
    direction: Direction,
    top_k: usize,
    risk_aversion: f64,
) -> Result<RecommendationSet> {
    if points.is_empty() {
        return Err(ForecastError::EmptyForecast);
    }
    RankingEngine::new(direction, top_k, risk_aversion)?.rank(points)
}
