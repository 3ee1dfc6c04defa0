use chrono::{Days, NaiveDate};
use fx_forecast::config::EngineConfig;
use fx_forecast::currency::CurrencyPair;
use fx_forecast::models::decomposition::DecompositionModel;
use fx_forecast::models::{ForecastModel, TrainedForecastModel};
use fx_forecast::notify::{LogSink, NotificationSink, Reminder};
use fx_forecast::pipeline::RecommendationPipeline;
use fx_forecast::ranking::Direction;
use fx_forecast::utils::{weekdays_only, SyntheticSeries};
use fx_forecast::window::resolve;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("FX Forecast: Travel Window Example");
    println!("==================================\n");

    // Create sample data: two years of weekday closes with a weekly cycle
    println!("Creating sample data...");
    let pair = CurrencyPair::from_regions("United Kingdom", "Japan")?;
    let start = NaiveDate::from_ymd_opt(2022, 6, 1).ok_or("bad start date")?;
    let series = weekdays_only(
        &SyntheticSeries::linear(start, 730, 160.0, 0.03)
            .with_weekly(0.8)
            .with_noise(0.6, 42)
            .generate(pair.clone())?,
    )?;
    let last = series.last_date().ok_or("empty series")?;
    println!(
        "Sample data created: {} observations for {} ending {}\n",
        series.len(),
        pair,
        last
    );

    // Forecast the next three weeks
    let today = last + Days::new(3);
    let travel = today + Days::new(20);
    let window = resolve(today, travel, 365)?;

    let trained = DecompositionModel::default().train(&series)?;
    println!("Model: {}", trained.name());
    println!(
        "Residual sd {:.4}, autocorrelation {:.3}\n",
        trained.sigma(),
        trained.rho()
    );

    println!("80% forecast intervals:");
    for point in trained.forecast(&window, 0.80)? {
        println!(
            "  {}  {:.3}  ({:.3}, {:.3})",
            point.date.format("%a %Y-%m-%d"),
            point.point_estimate,
            point.lower_bound,
            point.upper_bound
        );
    }

    // Rank the days for a traveller selling pounds for yen
    let pipeline = RecommendationPipeline::new(EngineConfig::default())?;
    for risk_aversion in [0.0, 1.0] {
        let set = pipeline.recommend(
            &series,
            today,
            travel,
            &pair,
            Direction::BaseToQuote,
            3,
            0.80,
            risk_aversion,
            365,
        )?;

        println!("\nTop days with risk aversion {}:", risk_aversion);
        for entry in &set {
            println!(
                "  #{} {}  rate {:.3}  score {:.3}",
                entry.rank, entry.point.date, entry.point.point_estimate, entry.favorability_score
            );
        }

        if risk_aversion > 0.0 {
            let reminder = Reminder::from_recommendations(&pair, &set);
            LogSink.deliver("traveller@example.com", &reminder)?;
            println!("\n{}\n\n{}", reminder.subject, reminder.body);
        }
    }

    Ok(())
}
