//! Calendar arithmetic for day sequencing
//!
//! Every `Day::date` in a trip is derived from the trip start date through
//! [`add_days`]. Dates are plain calendar dates with no time-of-day or
//! timezone component, serialized as `YYYY-MM-DD`.

use chrono::{Days, NaiveDate};

use crate::error::{ErrorCode, PlannerError, Result};

/// Calendar date used throughout the itinerary
pub type CalendarDate = NaiveDate;

/// Format used for dates in the trip document and on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Return the calendar date `n` days after `date` (`n` may be negative).
///
/// Saturates at the bounds of the representable date range.
#[must_use]
pub fn add_days(date: CalendarDate, n: i64) -> CalendarDate {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };

    shifted.unwrap_or(if n >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Parse a `YYYY-MM-DD` date as accepted at the input boundary
pub fn parse_date(input: &str) -> Result<CalendarDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| {
        PlannerError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_FORMAT,
            format!("'{}' is not a date in YYYY-MM-DD form", input.trim()),
            Some("date".to_string()),
        )
        .with_source(e)
    })
}

/// Render a date the way the trip document stores it
#[must_use]
pub fn format_date(date: CalendarDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render a date for display, e.g. `Mon 3 Mar 2025`
#[must_use]
pub fn format_date_long(date: CalendarDate) -> String {
    date.format("%a %-d %b %Y").to_string()
}
