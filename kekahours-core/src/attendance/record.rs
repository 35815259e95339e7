//! Field probing for raw attendance records.
//!
//! The upstream API has shipped several spellings for the same quantity over
//! time, so minutes are extracted by walking an ordered list of candidate
//! fields and taking the first populated one. Keeping the candidates as an
//! explicit table makes the upstream ambiguity visible and testable.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde_json::Value;

use crate::format::parse_timestamp;

/// One candidate field: its name and how to read minutes out of it.
pub struct FieldProbe {
    pub name: &'static str,
    pub parse: fn(&Value) -> i64,
}

/// Candidate fields for effective minutes, highest priority first.
pub const EFFECTIVE_FIELDS: &[FieldProbe] = &[
    FieldProbe {
        name: "effectiveHoursInHHMM",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "effectiveHours",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "effective_hours",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "effectiveTime",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "effective_time",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "productiveHours",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "productive_hours",
        parse: minutes_from_value,
    },
];

/// Candidate fields for gross minutes, highest priority first.
pub const GROSS_FIELDS: &[FieldProbe] = &[
    FieldProbe {
        name: "grossHoursInHHMM",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "grossHours",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "gross_hours",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "totalHours",
        parse: minutes_from_value,
    },
    FieldProbe {
        name: "total_hours",
        parse: minutes_from_value,
    },
];

/// Timestamp of the first attendance log entry of the day.
pub const FIRST_LOG_FIELD: &str = "firstLogOfTheDay";
/// Timestamp of the last attendance log entry of the day.
pub const LAST_LOG_FIELD: &str = "lastLogOfTheDay";

/// Locate the record for the given calendar day.
///
/// Matches on the `attendanceDate` prefix so both plain dates and full
/// datetimes are accepted.
pub fn find_today_record(records: &[Value], today: NaiveDate) -> Option<&Value> {
    let prefix = today.format("%Y-%m-%d").to_string();
    records.iter().find(|record| {
        record["attendanceDate"]
            .as_str()
            .map(|date| date.starts_with(&prefix))
            .unwrap_or(false)
    })
}

/// Walk the candidate fields in order and parse the first populated one.
///
/// Returns `None` only when no candidate is populated at all. A populated
/// field that parses to zero still wins, so garbage in a high-priority field
/// shadows anything below it.
pub fn probe_minutes(record: &Value, fields: &[FieldProbe]) -> Option<i64> {
    for probe in fields {
        let value = &record[probe.name];
        if is_populated(value) {
            return Some((probe.parse)(value));
        }
    }
    None
}

/// Whether a field value counts as present for probing purposes.
///
/// Null, `false`, numeric zero and the empty string do not; the string "0"
/// does.
fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read a minute count out of a populated field value.
///
/// Numbers are raw minute counts, clamped at zero. Strings must carry an
/// `"<h>h <m>m"` pattern somewhere in the text. Anything else counts as
/// zero minutes.
pub fn minutes_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f.max(0.0) as i64).unwrap_or(0),
        Value::String(s) => parse_hm_text(s).unwrap_or(0),
        _ => 0,
    }
}

fn parse_hm_text(text: &str) -> Option<i64> {
    let re = Regex::new(r"(\d+)h\s+(\d+)m").ok()?;
    let caps = re.captures(text)?;
    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    Some(hours.saturating_mul(60).saturating_add(minutes))
}

/// Read and parse a timestamp field off the record.
pub fn log_timestamp(record: &Value, field: &str) -> Option<DateTime<Utc>> {
    record[field].as_str().and_then(parse_timestamp)
}
