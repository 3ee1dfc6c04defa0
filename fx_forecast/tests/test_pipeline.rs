use chrono::{Days, NaiveDate};
use fx_forecast::cache::FitCache;
use fx_forecast::config::EngineConfig;
use fx_forecast::currency::CurrencyPair;
use fx_forecast::data::RateSeries;
use fx_forecast::error::ForecastError;
use fx_forecast::pipeline::{RecommendRequest, RecommendationPipeline};
use fx_forecast::ranking::{Direction, RecommendationSet};
use fx_forecast::utils::{linear_series, SyntheticSeries};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

fn pair() -> CurrencyPair {
    CurrencyPair::new("USD", "INR").unwrap()
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
}

fn trend_series() -> RateSeries {
    linear_series(pair(), start(), 120, 82.0, 0.01).unwrap()
}

fn noisy_series(seed: u64) -> RateSeries {
    SyntheticSeries::linear(start(), 300, 82.0, 0.002)
        .with_weekly(0.15)
        .with_noise(0.2, seed)
        .generate(pair())
        .unwrap()
}

fn day_after(series: &RateSeries, days: u64) -> NaiveDate {
    series.last_date().unwrap() + Days::new(days)
}

#[allow(clippy::too_many_arguments)]
fn recommend(
    series: &RateSeries,
    today: NaiveDate,
    travel: NaiveDate,
    direction: Direction,
    top_k: usize,
    risk_aversion: f64,
    max_horizon_days: usize,
) -> fx_forecast::Result<RecommendationSet> {
    RecommendationPipeline::default().recommend(
        series,
        today,
        travel,
        &pair(),
        direction,
        top_k,
        0.80,
        risk_aversion,
        max_horizon_days,
    )
}

#[test]
fn test_upward_trend_picks_latest_days() {
    let series = trend_series();
    let today = day_after(&series, 1);
    let travel = today + Days::new(9);

    let set = recommend(&series, today, travel, Direction::BaseToQuote, 3, 0.0, 365).unwrap();

    let dates: Vec<NaiveDate> = set.iter().map(|r| r.point.date).collect();
    assert_eq!(
        dates,
        vec![travel, travel - Days::new(1), travel - Days::new(2)]
    );
    let ranks: Vec<usize> = set.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_upward_trend_selling_quote_picks_earliest_days() {
    let series = trend_series();
    let today = day_after(&series, 1);
    let travel = today + Days::new(9);

    let set = recommend(&series, today, travel, Direction::QuoteToBase, 2, 0.0, 365).unwrap();

    let dates: Vec<NaiveDate> = set.iter().map(|r| r.point.date).collect();
    assert_eq!(dates, vec![today, today + Days::new(1)]);
}

#[rstest]
#[case(3, 10, 3)]
#[case(3, 2, 2)]
#[case(1, 1, 1)]
#[case(20, 15, 15)]
fn test_set_length_and_membership(
    #[case] top_k: usize,
    #[case] horizon: u64,
    #[case] expected: usize,
) {
    let series = noisy_series(4);
    let today = day_after(&series, 2);
    let travel = today + Days::new(horizon - 1);

    let set = recommend(&series, today, travel, Direction::BaseToQuote, top_k, 0.1, 365).unwrap();

    assert_eq!(set.len(), expected);
    for entry in &set {
        assert!(entry.point.date >= today && entry.point.date <= travel);
        assert!(entry.point.lower_bound <= entry.point.point_estimate);
        assert!(entry.point.point_estimate <= entry.point.upper_bound);
    }
}

#[test]
fn test_set_sorted_by_score_with_earlier_date_on_ties() {
    let series = noisy_series(9);
    let today = day_after(&series, 1);
    let set = recommend(
        &series,
        today,
        today + Days::new(29),
        Direction::BaseToQuote,
        30,
        0.5,
        365,
    )
    .unwrap();

    for pair in set.entries().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.favorability_score >= b.favorability_score);
        if a.favorability_score == b.favorability_score {
            assert!(a.point.date < b.point.date);
        }
        assert_eq!(b.rank, a.rank + 1);
    }
}

#[rstest]
#[case(Direction::BaseToQuote, 0.5)]
#[case(Direction::BaseToQuote, 5.0)]
#[case(Direction::QuoteToBase, 0.5)]
#[case(Direction::QuoteToBase, 5.0)]
fn test_selected_days_are_not_dominated(#[case] direction: Direction, #[case] risk_aversion: f64) {
    let series = noisy_series(17);
    let today = day_after(&series, 1);
    let travel = today + Days::new(44);

    let all = recommend(&series, today, travel, direction, 45, risk_aversion, 365).unwrap();
    let selected = recommend(&series, today, travel, direction, 5, risk_aversion, 365).unwrap();

    let chosen: Vec<NaiveDate> = selected.iter().map(|r| r.point.date).collect();
    for s in &selected {
        for u in all.iter().filter(|u| !chosen.contains(&u.point.date)) {
            let as_good = direction.at_least_as_good(u.point.point_estimate, s.point.point_estimate);
            let narrower = u.point.interval_width() < s.point.interval_width();
            assert!(
                !(as_good && narrower),
                "{} is dominated by unselected {}",
                s.point.date,
                u.point.date
            );
        }
    }
}

#[test]
fn test_identical_calls_are_bit_identical() {
    let series = noisy_series(23);
    let today = day_after(&series, 3);
    let travel = today + Days::new(40);

    let a = recommend(&series, today, travel, Direction::BaseToQuote, 3, 0.25, 365).unwrap();
    let b = recommend(&series, today, travel, Direction::BaseToQuote, 3, 0.25, 365).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_short_series_is_insufficient_history() {
    let series = linear_series(pair(), start(), 10, 82.0, 0.01).unwrap();
    let today = day_after(&series, 1);

    let result = recommend(&series, today, today, Direction::BaseToQuote, 3, 0.0, 365);

    match result {
        Err(ForecastError::InsufficientHistory {
            observations,
            required,
        }) => {
            assert_eq!(observations, 10);
            assert_eq!(required, 30);
        }
        other => panic!("Expected InsufficientHistory, got {:?}", other),
    }
}

#[test]
fn test_travel_date_in_the_past_is_invalid_window() {
    let series = trend_series();
    let today = day_after(&series, 5);

    let result = recommend(
        &series,
        today,
        today - Days::new(1),
        Direction::BaseToQuote,
        3,
        0.0,
        365,
    );

    assert!(matches!(result, Err(ForecastError::InvalidWindow { .. })));
}

#[test]
fn test_travel_today_gives_single_day() {
    let series = trend_series();
    let today = day_after(&series, 1);

    let set = recommend(&series, today, today, Direction::BaseToQuote, 3, 0.0, 365).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.best().unwrap().point.date, today);
}

#[test]
fn test_horizon_over_maximum_is_invalid_window() {
    let series = trend_series();
    let today = day_after(&series, 1);

    let result = recommend(
        &series,
        today,
        today + Days::new(30),
        Direction::BaseToQuote,
        3,
        0.0,
        30,
    );

    match result {
        Err(ForecastError::InvalidWindow {
            horizon_days,
            max_horizon_days,
            ..
        }) => {
            assert_eq!(horizon_days, 31);
            assert_eq!(max_horizon_days, 30);
        }
        other => panic!("Expected InvalidWindow, got {:?}", other),
    }
}

#[test]
fn test_window_is_checked_before_history() {
    // Both the window and the history are bad; the window is resolved first
    let series = linear_series(pair(), start(), 5, 82.0, 0.01).unwrap();
    let today = day_after(&series, 1);

    let result = recommend(
        &series,
        today,
        today - Days::new(2),
        Direction::BaseToQuote,
        3,
        0.0,
        365,
    );

    assert!(matches!(result, Err(ForecastError::InvalidWindow { .. })));
}

#[rstest]
#[case(0, 0.8, 0.0)]
#[case(3, 0.0, 0.0)]
#[case(3, 1.0, 0.0)]
#[case(3, 0.8, -1.0)]
fn test_invalid_parameters(#[case] top_k: usize, #[case] confidence: f64, #[case] risk_aversion: f64) {
    let series = trend_series();
    let today = day_after(&series, 1);

    let result = RecommendationPipeline::default().recommend(
        &series,
        today,
        today + Days::new(5),
        &pair(),
        Direction::BaseToQuote,
        top_k,
        confidence,
        risk_aversion,
        365,
    );

    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_pair_mismatch_rejected() {
    let series = trend_series();
    let today = day_after(&series, 1);
    let other = CurrencyPair::new("INR", "USD").unwrap();

    let result = RecommendationPipeline::default().recommend(
        &series,
        today,
        today,
        &other,
        Direction::BaseToQuote,
        3,
        0.8,
        0.0,
        365,
    );

    assert!(matches!(result, Err(ForecastError::InvalidPair(_))));
}

#[test]
fn test_cached_pipeline_matches_uncached() {
    let series = noisy_series(31);
    let today = day_after(&series, 1);
    let travel = today + Days::new(20);
    let cache = Arc::new(FitCache::new());

    let plain = RecommendationPipeline::default();
    let cached = RecommendationPipeline::default().with_cache(Arc::clone(&cache));
    let request = RecommendRequest::from_config(plain.config(), pair(), today, travel);

    let expected = plain.recommend_request(&series, &request).unwrap();
    let first = cached.recommend_request(&series, &request).unwrap();
    let second = cached.recommend_request(&series, &request).unwrap();

    assert_eq!(first, expected);
    assert_eq!(second, expected);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&pair(), series.last_date().unwrap()));
}

#[test]
fn test_config_defaults_drive_recommendation() {
    let config = EngineConfig::from_json_str(r#"{ "top_k": 2, "direction": "quote-to-base" }"#).unwrap();
    let pipeline = RecommendationPipeline::new(config).unwrap();
    let series = trend_series();
    let today = day_after(&series, 1);

    let set = pipeline
        .recommend_with_defaults(&series, today, today + Days::new(9))
        .unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.best().unwrap().point.date, today);
}

#[test]
fn test_cached_pipeline_still_requires_history() {
    let full = noisy_series(47);
    let tail = RateSeries::new(pair(), full.observations()[290..].to_vec()).unwrap();
    assert_eq!(tail.last_date(), full.last_date());

    let today = day_after(&full, 1);
    let travel = today + Days::new(10);
    let cache = Arc::new(FitCache::new());
    let pipeline = RecommendationPipeline::default().with_cache(Arc::clone(&cache));
    let request = RecommendRequest::from_config(pipeline.config(), pair(), today, travel);

    pipeline.recommend_request(&full, &request).unwrap();
    assert!(cache.contains(&pair(), full.last_date().unwrap()));

    match pipeline.recommend_request(&tail, &request) {
        Err(ForecastError::InsufficientHistory {
            observations,
            required,
        }) => {
            assert_eq!(observations, 10);
            assert_eq!(required, 30);
        }
        other => panic!("Expected InsufficientHistory, got {:?}", other),
    }
}

#[test]
fn test_shared_cache_respects_model_settings() {
    let series = noisy_series(53);
    let today = day_after(&series, 1);
    let travel = today + Days::new(20);
    let cache = Arc::new(FitCache::new());
    let log_config =
        || EngineConfig::from_json_str(r#"{ "model": { "transform": "log-additive" } }"#).unwrap();

    let additive = RecommendationPipeline::default().with_cache(Arc::clone(&cache));
    let log_cached = RecommendationPipeline::new(log_config())
        .unwrap()
        .with_cache(Arc::clone(&cache));
    let log_plain = RecommendationPipeline::new(log_config()).unwrap();
    let request = RecommendRequest::from_config(additive.config(), pair(), today, travel);

    additive.recommend_request(&series, &request).unwrap();
    assert!(cache.contains(&pair(), series.last_date().unwrap()));

    let expected = log_plain.recommend_request(&series, &request).unwrap();
    let actual = log_cached.recommend_request(&series, &request).unwrap();
    assert_eq!(actual, expected);
}
