//! Reading the editor's "feature until" field.
//!
//! The separator decides the field order, as in the host date parser the
//! plugin was built against:
//!
//! - `m/d/y` when separated by slashes (`10/31/2024`)
//! - `d-m-y` or `d.m.y` when separated by dashes or dots (`31-10-2024`)
//! - `y-m-d` when the first dash-separated field has four digits (`2024-10-31`)
//!
//! Two-digit years pivot at 70: `69` is 2069, `70` is 1970.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use thiserror::Error;

static US_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$").expect("valid regex"));
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid regex"));
static EU_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([-.])(\d{1,2})([-.])(\d{4}|\d{2})$").expect("valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("unrecognised date format: {0:?}")]
    Format(String),

    #[error("no such calendar date: year {year}, month {month}, day {day}")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Convert the editor's input into the timestamp to store.
///
/// `None` means the stored date should be cleared. That covers both an empty
/// field and text that is not a valid date; the latter is only logged.
pub fn parse_feature_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    match parse_calendar_date(input) {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(e) => {
            tracing::debug!("Ignoring feature date {:?}: {}", input, e);
            None
        }
    }
}

/// Format a stored timestamp the way the editing box shows it.
pub fn format_feature_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%m/%d/%Y").to_string()
}

pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let (year, month, day) = if let Some(caps) = US_DATE.captures(input) {
        (expand_year(&caps[3]), number(&caps[1]), number(&caps[2]))
    } else if let Some(caps) = ISO_DATE.captures(input) {
        (expand_year(&caps[1]), number(&caps[2]), number(&caps[3]))
    } else if let Some(caps) = EU_DATE.captures(input) {
        // Mixed separators like "31-10.2024" are not a date.
        if caps[2] != caps[4] {
            return Err(DateParseError::Format(input.to_string()));
        }
        (expand_year(&caps[5]), number(&caps[3]), number(&caps[1]))
    } else {
        return Err(DateParseError::Format(input.to_string()));
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateParseError::OutOfRange { year, month, day })
}

// Captures are at most four ASCII digits, so these cannot overflow.
fn number(digits: &str) -> u32 {
    digits.parse().unwrap_or_default()
}

fn expand_year(digits: &str) -> i32 {
    let year = number(digits) as i32;
    match digits.len() {
        2 if year < 70 => 2000 + year,
        2 => 1900 + year,
        _ => year,
    }
}
