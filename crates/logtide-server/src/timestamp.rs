//! ISO-8601 timestamp handling for the HTTP layer.
//!
//! Accepted inputs, all converted to UTC:
//! - RFC 3339 with `Z` or a numeric offset (`2025-03-17T10:15:00+02:00`)
//! - Naive date-times, which are taken to be UTC (`2025-03-17T10:15:00`,
//!   `2025-03-17 10:15:00.250`, `2025-03-17T10:15`), with or without a
//!   trailing `Z`
//! - Bare dates, meaning midnight UTC (`2025-03-17`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 timestamp into a UTC instant.
///
/// Returns `None` if the input matches none of the accepted forms.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.and_utc())
}

/// Formats an instant as RFC 3339 in UTC with a `Z` suffix.
///
/// Whole seconds carry no fraction. Otherwise the fraction is six digits,
/// or nine when the instant has sub-microsecond precision.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    let format = match ts.timestamp_subsec_nanos() {
        0 => SecondsFormat::Secs,
        n if n % 1_000 == 0 => SecondsFormat::Micros,
        _ => SecondsFormat::Nanos,
    };
    ts.to_rfc3339_opts(format, true)
}
