//! Core domain types for kekahours
//!
//! These types represent the single day summary that every surface (dashboard,
//! CLI, snapshot store) agrees on.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Effective** | Time actually worked, as reported by the attendance API |
//! | **Gross** | Total clocked-in span for the day |
//! | **Break** | Gross minus effective, floored at zero |
//! | **Target** | A milestone to reach in a day: 4h, 6h or 8h of effective time |
//! | **Completion** | Per-target outcome: reached at some time, pending with an ETA, or unavailable |
//! | **Degraded** | A summary built without usable data, carrying a placeholder message instead |

use crate::completion::Completion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The daily milestones, in ascending order: label and target minutes.
pub const TARGETS: [(&str, i64); 3] = [("4h", 240), ("6h", 360), ("8h", 480)];

/// Minutes in a full working day, used for the progress gauge.
pub const FULL_DAY_MINUTES: i64 = 480;

// ============================================
// Durations
// ============================================

/// A duration split into whole hours and leftover minutes.
///
/// Always normalized: minutes stay in `0..60` and neither field goes negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationHM {
    pub hours: i64,
    pub minutes: i64,
}

impl DurationHM {
    /// Build from a total minute count. Negative inputs clamp to zero.
    pub fn from_minutes(total: i64) -> Self {
        let total = total.max(0);
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    /// Total minutes represented by this duration.
    pub fn total_minutes(&self) -> i64 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for DurationHM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

// ============================================
// Daily summary
// ============================================

/// Outcome class of a summary build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStatus {
    /// Built from a real attendance record
    Ok,
    /// No access token available
    NoToken,
    /// The attendance API answered with a non-success status
    ApiError,
    /// The API answered but had no record for today
    NoTodayRecord,
    /// Anything else went wrong (network, malformed response)
    Error,
}

/// One day's attendance summary.
///
/// Serialized field names match the snapshot format consumed by earlier
/// clients (`breakTime`, `lastLogTimestamp`, ...), so stored summaries stay
/// readable across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Effective working time
    pub effective: DurationHM,
    /// Gross clocked-in time
    pub gross: DurationHM,
    /// Break time (gross minus effective)
    pub break_time: DurationHM,
    /// Per-target display text, keyed by target label ("4h", "6h", "8h")
    pub completion: BTreeMap<String, String>,
    /// Structured per-target outcomes; absent on degraded summaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_info: Option<BTreeMap<String, Completion>>,
    /// Timestamp of the last attendance log entry, if the record had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_log_timestamp: Option<DateTime<Utc>>,
    /// How this summary was produced
    pub status: SummaryStatus,
}

impl DailySummary {
    /// Build a degraded summary: zeroed durations and the same placeholder
    /// text repeated for every target.
    pub fn degraded(status: SummaryStatus, placeholder: &str) -> Self {
        let completion = TARGETS
            .iter()
            .map(|(label, _)| (label.to_string(), placeholder.to_string()))
            .collect();

        Self {
            effective: DurationHM::default(),
            gross: DurationHM::default(),
            break_time: DurationHM::default(),
            completion,
            completion_info: None,
            last_log_timestamp: None,
            status,
        }
    }

    /// Progress toward a full day, rounded to whole percent and clamped to 0..=100.
    pub fn progress_percent(&self) -> u16 {
        let pct = self.effective.total_minutes() as f64 / FULL_DAY_MINUTES as f64 * 100.0;
        (pct.round() as i64).clamp(0, 100) as u16
    }

    /// True when this summary carries placeholders instead of real data.
    pub fn is_degraded(&self) -> bool {
        self.status != SummaryStatus::Ok
    }

    /// The placeholder message of a degraded summary, if any.
    pub fn status_message(&self) -> Option<String> {
        if self.is_degraded() {
            self.completion.values().next().cloned()
        } else {
            None
        }
    }
}
