//! Daily summary construction.
//!
//! [`build_daily_summary`] is the one suspending operation in the crate: it
//! resolves the token, fetches today's records and reduces them to a
//! [`DailySummary`]. Every failure mode is absorbed into a degraded summary;
//! nothing propagates to the caller, so each refresh cycle is self-healing.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::completion::compute_completion;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::token::read_access_token;
use crate::types::{DailySummary, DurationHM, SummaryStatus, TARGETS};

use super::client::AttendanceClient;
use super::record::{
    find_today_record, log_timestamp, probe_minutes, EFFECTIVE_FIELDS, FIRST_LOG_FIELD,
    GROSS_FIELDS, LAST_LOG_FIELD,
};

/// Build today's summary, absorbing every failure into a degraded result.
pub async fn build_daily_summary(config: &Config) -> DailySummary {
    let token = match read_access_token(&config.auth) {
        Some(token) => token,
        None => {
            tracing::warn!("No access token available");
            return DailySummary::degraded(SummaryStatus::NoToken, "Please login");
        }
    };

    let client = match AttendanceClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build attendance client");
            return DailySummary::degraded(SummaryStatus::Error, "Error");
        }
    };

    match client.fetch_day_records(&token).await {
        Ok(records) => summarize_records(&records, Local::now().date_naive()),
        Err(Error::Api { status }) => {
            DailySummary::degraded(SummaryStatus::ApiError, &status.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Attendance fetch failed");
            DailySummary::degraded(SummaryStatus::Error, "Error")
        }
    }
}

/// Reduce raw day records to a summary for the given calendar day.
///
/// Pure apart from tracing, so the whole reduction is testable with canned
/// records.
pub fn summarize_records(records: &[Value], today: NaiveDate) -> DailySummary {
    let record = match find_today_record(records, today) {
        Some(record) => record,
        None => {
            tracing::info!(records = records.len(), "No attendance record for today");
            return DailySummary::degraded(SummaryStatus::NoTodayRecord, "Not found");
        }
    };

    let first_log = log_timestamp(record, FIRST_LOG_FIELD);
    let last_log = log_timestamp(record, LAST_LOG_FIELD);

    let effective_minutes = probe_minutes(record, EFFECTIVE_FIELDS)
        .unwrap_or_else(|| fallback_effective_minutes(first_log, last_log))
        .max(0);
    let gross_minutes = probe_minutes(record, GROSS_FIELDS).unwrap_or(0).max(0);
    let break_minutes = (gross_minutes - effective_minutes).max(0);

    let mut completion = BTreeMap::new();
    let mut completion_info = BTreeMap::new();
    for (label, target_minutes) in TARGETS {
        let info = compute_completion(effective_minutes, last_log, target_minutes);
        completion.insert(label.to_string(), info.display_text());
        completion_info.insert(label.to_string(), info);
    }

    DailySummary {
        effective: DurationHM::from_minutes(effective_minutes),
        gross: DurationHM::from_minutes(gross_minutes),
        break_time: DurationHM::from_minutes(break_minutes),
        completion,
        completion_info: Some(completion_info),
        last_log_timestamp: last_log,
        status: SummaryStatus::Ok,
    }
}

/// Wall-clock span between the first and last log of the day.
///
/// Used only when no effective field is populated at all. Requires both
/// timestamps with the last strictly after the first; anything else counts
/// as zero minutes.
fn fallback_effective_minutes(
    first_log: Option<DateTime<Utc>>,
    last_log: Option<DateTime<Utc>>,
) -> i64 {
    match (first_log, last_log) {
        (Some(first), Some(last)) if last > first => (last - first).num_minutes(),
        _ => 0,
    }
}

/// Blocking wrapper around [`build_daily_summary`] for threads without an
/// ambient async runtime.
pub struct SyncSummaryBuilder {
    config: Config,
    runtime: tokio::runtime::Runtime,
}

impl SyncSummaryBuilder {
    pub fn new(config: Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { config, runtime })
    }

    /// Build today's summary (blocking).
    pub fn build(&self) -> DailySummary {
        self.runtime.block_on(build_daily_summary(&self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Completion;
    use chrono::TimeZone;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_summarize_full_record() {
        let records = vec![json!({
            "attendanceDate": "2025-01-01T00:00:00",
            "effectiveHoursInHHMM": "5h 30m",
            "grossHoursInHHMM": "7h 0m",
            "lastLogOfTheDay": "2025-01-01T10:00:00Z",
        })];

        let summary = summarize_records(&records, today());
        assert_eq!(summary.status, SummaryStatus::Ok);
        assert_eq!(summary.effective.to_string(), "5h 30m");
        assert_eq!(summary.gross.to_string(), "7h 0m");
        assert_eq!(summary.break_time.to_string(), "1h 30m");
        assert_eq!(
            summary.last_log_timestamp,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap())
        );

        let info = summary.completion_info.as_ref().unwrap();
        assert_eq!(
            info["4h"],
            Completion::Reached {
                reached_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap()
            }
        );
        assert_eq!(
            info["6h"],
            Completion::Pending {
                eta: Utc.with_ymd_and_hms(2025, 1, 1, 10, 30, 0).unwrap()
            }
        );
        assert_eq!(
            info["8h"],
            Completion::Pending {
                eta: Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap()
            }
        );

        // Display strings track the structured outcomes
        assert_eq!(summary.completion["4h"], "Reached");
        assert_eq!(summary.completion["6h"], info["6h"].display_text());
    }

    #[test]
    fn test_no_record_for_today() {
        let records = vec![json!({"attendanceDate": "2024-12-31T00:00:00"})];
        let summary = summarize_records(&records, today());

        assert_eq!(summary.status, SummaryStatus::NoTodayRecord);
        assert_eq!(summary.completion["8h"], "Not found");
        assert!(summary.completion_info.is_none());
    }

    #[test]
    fn test_effective_falls_back_to_log_span() {
        let records = vec![json!({
            "attendanceDate": "2025-01-01",
            "firstLogOfTheDay": "2025-01-01T09:00:00Z",
            "lastLogOfTheDay": "2025-01-01T13:30:00Z",
        })];

        let summary = summarize_records(&records, today());
        assert_eq!(summary.effective.total_minutes(), 270);
        // Gross has no fallback derivation
        assert_eq!(summary.gross.total_minutes(), 0);
        assert_eq!(summary.break_time.total_minutes(), 0);
    }

    #[test]
    fn test_populated_zero_suppresses_fallback() {
        let records = vec![json!({
            "attendanceDate": "2025-01-01",
            "effectiveHoursInHHMM": "0",
            "firstLogOfTheDay": "2025-01-01T09:00:00Z",
            "lastLogOfTheDay": "2025-01-01T13:30:00Z",
        })];

        let summary = summarize_records(&records, today());
        assert_eq!(summary.effective.total_minutes(), 0);
    }

    #[test]
    fn test_fallback_requires_ordered_pair() {
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2025, 1, 1, 13, 30, 0).unwrap();

        assert_eq!(fallback_effective_minutes(Some(first), Some(last)), 270);
        // Inverted or equal spans count as zero
        assert_eq!(fallback_effective_minutes(Some(last), Some(first)), 0);
        assert_eq!(fallback_effective_minutes(Some(first), Some(first)), 0);
        assert_eq!(fallback_effective_minutes(None, Some(last)), 0);
        assert_eq!(fallback_effective_minutes(Some(first), None), 0);
    }

    #[test]
    fn test_break_never_negative() {
        let records = vec![json!({
            "attendanceDate": "2025-01-01",
            "effectiveHours": 300,
            "grossHours": 120,
        })];

        let summary = summarize_records(&records, today());
        assert_eq!(summary.break_time.total_minutes(), 0);
    }

    #[test]
    fn test_missing_last_log_means_unavailable() {
        let records = vec![json!({
            "attendanceDate": "2025-01-01",
            "effectiveHours": 330,
        })];

        let summary = summarize_records(&records, today());
        assert_eq!(summary.status, SummaryStatus::Ok);
        assert!(summary.last_log_timestamp.is_none());
        for (label, _) in TARGETS {
            assert_eq!(summary.completion[label], "Not available");
            assert_eq!(
                summary.completion_info.as_ref().unwrap()[label],
                Completion::Unavailable
            );
        }
    }

    #[test]
    fn test_oversized_minutes_fold_to_unavailable() {
        // Epoch milliseconds where a minute count belongs
        let records = vec![json!({
            "attendanceDate": "2025-01-01",
            "effectiveTime": 1_736_935_200_000_i64,
            "lastLogOfTheDay": "2025-01-01T10:00:00Z",
        })];

        let summary = summarize_records(&records, today());
        assert_eq!(summary.status, SummaryStatus::Ok);
        assert_eq!(summary.progress_percent(), 100);
        for (label, _) in TARGETS {
            assert_eq!(summary.completion[label], "Not available");
            assert_eq!(
                summary.completion_info.as_ref().unwrap()[label],
                Completion::Unavailable
            );
        }
    }
}
