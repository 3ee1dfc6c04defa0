use chrono::NaiveDate;
use fx_forecast::currency::CurrencyPair;
use fx_forecast::models::ForecastPoint;
use fx_forecast::notify::{LogSink, MemorySink, NotificationSink, Reminder, DISCLAIMER, REMINDER_SUBJECT};
use fx_forecast::ranking::{rank, Direction};
use pretty_assertions::assert_eq;

fn point(day: u32, estimate: f64) -> ForecastPoint {
    ForecastPoint {
        date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
        point_estimate: estimate,
        lower_bound: estimate - 0.01,
        upper_bound: estimate + 0.01,
        confidence_level: 0.8,
    }
}

fn reminder() -> Reminder {
    let pair = CurrencyPair::new("EUR", "JPY").unwrap();
    let points = vec![point(5, 160.12346), point(6, 161.5), point(7, 159.0)];
    let set = rank(&points, Direction::BaseToQuote, 2, 0.0).unwrap();
    Reminder::from_recommendations(&pair, &set)
}

#[test]
fn test_reminder_body() {
    let reminder = reminder();

    assert_eq!(reminder.subject, REMINDER_SUBJECT);
    let lines: Vec<&str> = reminder.body.lines().collect();
    assert_eq!(lines[0], "Hello,");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Here are the top 2 predicted days to exchange your currency:");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "- Tuesday, 2024-08-06 (Predicted Rate: 161.5000)");
    assert_eq!(lines[5], "- Monday, 2024-08-05 (Predicted Rate: 160.1235)");
    assert_eq!(*lines.last().unwrap(), DISCLAIMER);
}

#[test]
fn test_memory_sink_records_deliveries() {
    let sink = MemorySink::new();
    let reminder = reminder();

    sink.deliver("traveller@example.com", &reminder).unwrap();
    sink.deliver("other@example.com", &reminder).unwrap();

    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[0].0, "traveller@example.com");
    assert_eq!(delivered[1].1, reminder);
}

#[test]
fn test_log_sink_accepts_delivery() {
    let sink: &dyn NotificationSink = &LogSink;
    assert!(sink.deliver("traveller@example.com", &reminder()).is_ok());
}
