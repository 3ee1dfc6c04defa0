//! Reminder messages and delivery sinks

use crate::currency::CurrencyPair;
use crate::error::Result;
use crate::ranking::RecommendationSet;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::{Mutex, PoisonError};

/// Subject line of every reminder
pub const REMINDER_SUBJECT: &str = "Your Currency Exchange Reminder";

/// Closing line of every reminder body
pub const DISCLAIMER: &str =
    "Disclaimer: This is an automated statistical forecast, not financial advice.";

/// A rendered reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl Reminder {
    /// Render a reminder listing the recommended days in rank order
    pub fn from_recommendations(pair: &CurrencyPair, set: &RecommendationSet) -> Self {
        log::debug!("Rendering reminder for {} with {} day(s)", pair, set.len());
        let mut body = format!(
            "Hello,\n\nHere are the top {} predicted days to exchange your currency:\n\n",
            set.len()
        );
        for entry in set {
            // Writing into a String cannot fail
            let _ = writeln!(
                body,
                "- {} (Predicted Rate: {:.4})",
                entry.point.date.format("%A, %Y-%m-%d"),
                entry.point.point_estimate
            );
        }
        body.push('\n');
        body.push_str(DISCLAIMER);

        Self {
            subject: REMINDER_SUBJECT.to_string(),
            body,
        }
    }
}

/// Delivers reminders to an address
pub trait NotificationSink {
    /// Deliver one reminder
    fn deliver(&self, address: &str, reminder: &Reminder) -> Result<()>;
}

/// Writes reminders to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, address: &str, reminder: &Reminder) -> Result<()> {
        log::info!(
            "Reminder to {}: {}\n{}",
            address,
            reminder.subject,
            reminder.body
        );
        Ok(())
    }
}

/// Keeps delivered reminders in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<(String, Reminder)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first
    pub fn delivered(&self) -> Vec<(String, Reminder)> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&self, address: &str, reminder: &Reminder) -> Result<()> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((address.to_string(), reminder.clone()));
        Ok(())
    }
}
