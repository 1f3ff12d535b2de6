//! Analysis window date rules
//!
//! End dates arrive as `YYYY-MM-DD` strings and are validated before any job
//! exists; the window start is always 90 days earlier.

use chrono::{Duration, NaiveDate, ParseError};

/// Length of the analysis window, in days.
pub const ANALYSIS_WINDOW_DAYS: i64 = 90;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a user-supplied end date, rejecting anything that is not a valid
/// `YYYY-MM-DD` calendar date.
pub fn parse_end_date(raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
}

/// Start of the analysis window for a given end date.
pub fn start_date_for(end_date: NaiveDate) -> NaiveDate {
    end_date - Duration::days(ANALYSIS_WINDOW_DAYS)
}
