//! Date parsing utilities.

use crate::error::{BugError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Parse a due-date argument.
///
/// Supports:
/// - Simple date: `2025-01-15`
/// - Relative days/weeks from `today`: `+3d`, `+2w`
/// - Keywords: `today`, `tomorrow`, `next-week`
///
/// An empty string means "no due date" and yields `Ok(None)`.
///
/// # Errors
///
/// Returns a validation error if the input is not in a recognised format.
pub fn parse_due_date(s: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    if let Some(rest) = s.strip_prefix('+') {
        if let Some(unit_char) = rest.chars().last() {
            let amount_str = &rest[..rest.len() - unit_char.len_utf8()];
            if let Ok(amount) = amount_str.parse::<i64>() {
                let duration = match unit_char {
                    'd' => Duration::try_days(amount),
                    'w' => Duration::try_weeks(amount),
                    _ => {
                        return Err(BugError::validation(
                            "due_date",
                            "invalid unit (use d or w)",
                        ));
                    }
                };
                return offset(today, duration);
            }
        }
    }

    match s.to_lowercase().as_str() {
        "today" => Ok(Some(today)),
        "tomorrow" => offset(today, Duration::try_days(1)),
        "next-week" | "nextweek" => offset(today, Duration::try_weeks(1)),
        _ => Err(BugError::validation(
            "due_date",
            "invalid date (try: 2025-01-15, +3d, +1w, tomorrow, next-week)",
        )),
    }
}

fn offset(today: NaiveDate, duration: Option<Duration>) -> Result<Option<NaiveDate>> {
    duration
        .and_then(|duration| today.checked_add_signed(duration))
        .map(Some)
        .ok_or_else(|| BugError::validation("due_date", "out of range"))
}

/// Calendar date (UTC) of a timestamp, as used for trend buckets.
#[must_use]
pub fn utc_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}
