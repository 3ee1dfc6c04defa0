use chrono::NaiveDate;
use fx_forecast::currency::CurrencyPair;
use fx_forecast::data::{DataLoader, RateSeries};
use fx_forecast::error::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn pair() -> CurrencyPair {
    CurrencyPair::new("EUR", "USD").unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
}

#[test]
fn test_data_loader_from_csv() {
    // Create a temporary CSV file in market-download layout
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    writeln!(file, "2023-01-02,1.0700,1.0710,1.0650,1.0690,1.0690,0").unwrap();
    writeln!(file, "2023-01-03,1.0680,1.0690,1.0530,1.0550,1.0550,0").unwrap();
    writeln!(file, "2023-01-04,1.0560,1.0630,1.0540,1.0600,1.0600,0").unwrap();

    let series = DataLoader::from_csv(file.path(), pair()).unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.rates(), vec![1.0690, 1.0550, 1.0600]);
    assert_eq!(series.first_date(), Some(date(2)));
    assert_eq!(series.pair(), &pair());
}

#[test]
fn test_loader_cleans_rows() {
    let csv = "\
ds,y
2023-01-05,1.05
2023-01-03,1.03
2023-01-04,
2023-01-03,9.99
2023-01-06,null
2023-01-07 00:00:00,1.07
";

    let series = DataLoader::from_reader(csv.as_bytes(), pair()).unwrap();

    let dates: Vec<NaiveDate> = series.observations().iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![date(3), date(5), date(7)]);
    // Duplicate dates keep the first row
    assert_eq!(series.rates(), vec![1.03, 1.05, 1.07]);
}

#[test]
fn test_loader_rejects_non_positive_rates() {
    let csv = "date,rate\n2023-01-01,1.0\n2023-01-02,-0.5\n";

    let result = DataLoader::from_reader(csv.as_bytes(), pair());
    assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
}

#[test]
fn test_loader_requires_known_columns() {
    let no_date = "when,rate\n2023-01-01,1.0\n";
    let no_rate = "date,volume\n2023-01-01,100\n";

    assert!(matches!(
        DataLoader::from_reader(no_date.as_bytes(), pair()),
        Err(ForecastError::CsvError(_))
    ));
    assert!(matches!(
        DataLoader::from_reader(no_rate.as_bytes(), pair()),
        Err(ForecastError::CsvError(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = DataLoader::from_csv("/nonexistent/EURUSD.csv", pair());
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_forward_fill_over_weekend() {
    // Friday, then Monday
    let series = RateSeries::from_pairs(
        pair(),
        vec![(date(6), 1.10), (date(9), 1.20), (date(10), 1.25)],
    )
    .unwrap();

    let filled = series.forward_filled();

    assert_eq!(series.missing_days(), 2);
    assert_eq!(filled.len(), 5);
    assert_eq!(filled[1].date, date(7));
    assert_eq!(filled[1].rate, 1.10);
    assert_eq!(filled[2].rate, 1.10);
    assert_eq!(filled[3].rate, 1.20);
}

#[test]
fn test_between_filters_inclusive() {
    let series = RateSeries::from_pairs(
        pair(),
        (1..=10).map(|d| (date(d), 1.0 + d as f64 / 100.0)).collect(),
    )
    .unwrap();

    let window = series.between(date(3), date(5));

    assert_eq!(window.len(), 3);
    assert_eq!(window.first_date(), Some(date(3)));
    assert_eq!(window.last_date(), Some(date(5)));
}

#[test]
fn test_series_serializes_to_json() {
    let series = RateSeries::from_pairs(pair(), vec![(date(1), 1.5)]).unwrap();
    let json = serde_json::to_string(&series).unwrap();

    assert!(json.contains("\"EUR\""));
    assert!(json.contains("2023-01-01"));
}
