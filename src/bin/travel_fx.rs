use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use travel_fx::provider::DEFAULT_LOOKBACK_YEARS;
use travel_fx::{
    CsvDirectoryProvider, CurrencyPair, DataLoader, DataProvider, Direction, EngineConfig,
    HistoryRequest, LogSink, NotificationSink, RecommendationPipeline, Reminder,
};

/// Recommend the best days to exchange currency before a trip
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with the pair's daily history
    #[arg(long, conflicts_with = "data_dir", required_unless_present = "data_dir")]
    csv: Option<PathBuf>,

    /// Directory of <BASE><QUOTE>.csv files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Currency being sold, e.g. USD
    #[arg(long)]
    base: String,

    /// Currency being bought, e.g. EUR
    #[arg(long)]
    quote: String,

    /// First day of the window (defaults to the local date)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Departure date, last day of the window
    #[arg(long)]
    travel_date: NaiveDate,

    /// base-to-quote (higher rate is better) or quote-to-base
    #[arg(long)]
    direction: Option<Direction>,

    /// Number of days to recommend
    #[arg(long)]
    top_k: Option<usize>,

    /// Confidence level of the forecast intervals
    #[arg(long)]
    confidence: Option<f64>,

    /// Penalty per unit of interval width
    #[arg(long)]
    risk_aversion: Option<f64>,

    /// Longest accepted window in days
    #[arg(long)]
    max_horizon_days: Option<usize>,

    /// JSON engine configuration; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the recommendations as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Address to send a reminder to
    #[arg(long)]
    remind: Option<String>,
}

impl Cli {
    fn engine_config(&self) -> travel_fx::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(confidence) = self.confidence {
            config.confidence = confidence;
        }
        if let Some(risk_aversion) = self.risk_aversion {
            config.risk_aversion = risk_aversion;
        }
        if let Some(max_horizon_days) = self.max_horizon_days {
            config.max_horizon_days = max_horizon_days;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    log::debug!("Parsed arguments: {:?}", args);

    let config = args.engine_config()?;
    let pair = CurrencyPair::new(&args.base, &args.quote)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let series = match (&args.csv, &args.data_dir) {
        (Some(path), _) => DataLoader::from_csv(path, pair.clone())?,
        (None, Some(dir)) => {
            let request = HistoryRequest::lookback(pair.clone(), today, DEFAULT_LOOKBACK_YEARS)?;
            CsvDirectoryProvider::new(dir).fetch(&request)?
        }
        (None, None) => return Err("either --csv or --data-dir is required".into()),
    };
    log::info!(
        "Loaded {} observations for {} ({})",
        series.len(),
        pair,
        pair.ticker()
    );

    let pipeline = RecommendationPipeline::new(config)?;
    let set = pipeline.recommend_with_defaults(&series, today, args.travel_date)?;

    if args.json {
        let output = serde_json::json!({
            "pair": &pair,
            "today": today,
            "travel_date": args.travel_date,
            "direction": pipeline.config().direction,
            "recommendations": &set,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Best days to exchange {} ({}) between {} and {}:",
            pair,
            pipeline.config().direction,
            today,
            args.travel_date
        );
        println!(
            "{:>4}  {:<14} {:>12} {:>12} {:>12} {:>10}",
            "rank", "date", "rate", "lower", "upper", "score"
        );
        for entry in &set {
            println!(
                "{:>4}  {:<14} {:>12.4} {:>12.4} {:>12.4} {:>10.4}",
                entry.rank,
                entry.point.date.format("%a %Y-%m-%d").to_string(),
                entry.point.point_estimate,
                entry.point.lower_bound,
                entry.point.upper_bound,
                entry.favorability_score
            );
        }
    }

    if let Some(address) = &args.remind {
        let reminder = Reminder::from_recommendations(&pair, &set);
        LogSink.deliver(address, &reminder)?;
    }

    Ok(())
}
