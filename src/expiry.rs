//! Expiry parsing and evaluation.
//!
//! Expiry strings are wall-clock times in the local time zone. A layout
//! without a time component means local midnight at the start of that day.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::config::EXPIRY_LAYOUTS;

fn parse_naive(raw: &str, layout: &str) -> Option<NaiveDateTime> {
    if layout.contains("%H") {
        NaiveDateTime::parse_from_str(raw, layout).ok()
    } else {
        NaiveDate::parse_from_str(raw, layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}

/// Parses `raw` against `layouts` in order and returns the first match.
///
/// The string is trimmed first. A local time that does not exist (skipped by
/// a DST transition) fails that layout; an ambiguous one resolves to the
/// earlier instant.
pub fn parse_first_match(raw: &str, layouts: &[&str]) -> Option<DateTime<Local>> {
    let trimmed = raw.trim();
    layouts.iter().find_map(|layout| {
        parse_naive(trimmed, layout).and_then(|naive| Local.from_local_datetime(&naive).earliest())
    })
}

/// Parses `raw` against the accepted expiry layouts.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Local>> {
    parse_first_match(raw, EXPIRY_LAYOUTS)
}

/// True if `expiry_raw` parses and `now` is not after it.
///
/// Unparseable expiries are never valid.
pub fn is_unexpired(expiry_raw: &str, now: DateTime<Local>) -> bool {
    match parse_expiry(expiry_raw) {
        Some(expiry) => now <= expiry,
        None => {
            log::debug!("Expiry '{}' matches no accepted layout", expiry_raw);
            false
        }
    }
}
