//! Formatting and timestamp parsing helpers shared across UIs.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

/// Format a timestamp as a 12-hour wall clock reading (e.g., "8:30 AM").
///
/// No seconds, no timezone suffix, no leading zero on the hour.
pub fn clock_time<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%-I:%M %p").to_string()
}

/// Parse a timestamp string from an attendance record.
///
/// Accepts RFC 3339 with an explicit offset, or a naive datetime
/// (`2025-01-15T09:04:00` or `2025-01-15 09:04:00`) which is interpreted
/// in the local timezone. Returns `None` when nothing matches.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(ts) => Some(ts.with_timezone(&Utc)),
        // DST fold: take the earlier reading
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}
