//! Per-target completion outcomes and the projection calculator.
//!
//! The projection assumes effective time accrued linearly up to the last log
//! entry, so remaining minutes are added straight onto that timestamp. Breaks
//! after the last log are not modeled.

use crate::format::clock_time;
use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

/// Outcome for one target duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum Completion {
    /// No last log timestamp to extrapolate from
    Unavailable,
    /// Target already crossed, back-computed from the overshoot
    Reached {
        #[serde(rename = "reachedAt")]
        reached_at: DateTime<Utc>,
    },
    /// Target still ahead, projected linearly from the last log
    Pending { eta: DateTime<Utc> },
}

impl Completion {
    pub fn is_reached(&self) -> bool {
        matches!(self, Completion::Reached { .. })
    }

    /// Short text shown in the target row.
    pub fn display_text(&self) -> String {
        match self {
            Completion::Unavailable => "Not available".to_string(),
            Completion::Reached { .. } => "Reached".to_string(),
            Completion::Pending { eta } => clock_time(&eta.with_timezone(&Local)),
        }
    }

    /// Longer text carried alongside the row, if there is anything to say.
    pub fn tooltip(&self) -> Option<String> {
        match self {
            Completion::Unavailable => None,
            Completion::Reached { reached_at } => Some(format!(
                "Reached at {}",
                clock_time(&reached_at.with_timezone(&Local))
            )),
            Completion::Pending { eta } => Some(format!(
                "Estimated {}",
                clock_time(&eta.with_timezone(&Local))
            )),
        }
    }
}

/// Project when `target_minutes` of effective time was, or will be, reached.
///
/// With no last log entry the outcome is [`Completion::Unavailable`]. When the
/// target is already met, the overshoot is subtracted from the last log
/// timestamp to recover the crossing instant. Otherwise the shortfall is added
/// to it. An offset too large to land on a representable timestamp (minutes on
/// the scale of an epoch value, say) also folds to
/// [`Completion::Unavailable`] rather than overflowing.
pub fn compute_completion(
    effective_minutes: i64,
    last_log: Option<DateTime<Utc>>,
    target_minutes: i64,
) -> Completion {
    let last_log = match last_log {
        Some(ts) => ts,
        None => return Completion::Unavailable,
    };

    if effective_minutes >= target_minutes {
        let overshoot = effective_minutes.saturating_sub(target_minutes);
        match Duration::try_minutes(overshoot).and_then(|d| last_log.checked_sub_signed(d)) {
            Some(reached_at) => Completion::Reached { reached_at },
            None => Completion::Unavailable,
        }
    } else {
        let shortfall = target_minutes.saturating_sub(effective_minutes);
        match Duration::try_minutes(shortfall).and_then(|d| last_log.checked_add_signed(d)) {
            Some(eta) => Completion::Pending { eta },
            None => Completion::Unavailable,
        }
    }
}
