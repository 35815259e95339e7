//! Rendered text forms of a daily summary.
//!
//! Two pure renderers: the card printed by the status command and stored as
//! the latest snapshot, and the one-line-per-metric digest kept under the
//! legacy `hourData` key for older readers of the store.

use crate::types::{DailySummary, TARGETS};

/// Bar width for the text progress gauge.
const BAR_WIDTH: usize = 20;

/// One target row, ready for display.
#[derive(Debug, Clone)]
pub struct TargetRow {
    /// Target label ("4h", "6h", "8h")
    pub label: String,
    /// Short display text: "Reached", a clock time, or a placeholder
    pub text: String,
    /// Longer hover text, when there is anything to add
    pub tooltip: Option<String>,
    /// Whether this row gets the reached pill treatment
    pub reached: bool,
}

/// Build the per-target rows for a summary.
///
/// Degraded summaries have no structured outcomes, so their rows carry the
/// placeholder text straight through with no pill and no tooltip.
pub fn target_rows(summary: &DailySummary) -> Vec<TargetRow> {
    TARGETS
        .iter()
        .map(|(label, _)| {
            let info = summary
                .completion_info
                .as_ref()
                .and_then(|info| info.get(*label));
            TargetRow {
                label: label.to_string(),
                text: summary.completion.get(*label).cloned().unwrap_or_default(),
                tooltip: info.and_then(|info| info.tooltip()),
                reached: info.map(|info| info.is_reached()).unwrap_or(false),
            }
        })
        .collect()
}

/// Render the text card.
///
/// Deterministic given the summary; degraded placeholders flow straight
/// through the target rows.
pub fn render_card(summary: &DailySummary) -> String {
    let percent = summary.progress_percent();
    let filled = percent as usize * BAR_WIDTH / 100;
    let bar: String = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);

    let mut lines = vec![
        "Keka Hours".to_string(),
        format!("Hours Completed: {}", summary.effective),
        format!("Break Time: {}", summary.break_time),
        format!("{:>3}% [{}]", percent, bar),
    ];

    for row in target_rows(summary) {
        let text = match &row.tooltip {
            Some(tooltip) if row.reached => tooltip.clone(),
            _ => row.text.clone(),
        };
        lines.push(format!("{}: {}", row.label, text));
    }

    lines.join("\n")
}

/// Render the legacy plain-text digest.
pub fn render_digest(summary: &DailySummary) -> String {
    let mut lines = vec![format!("⏰ Hours Completed: {}", summary.effective)];
    for (emoji, (label, _)) in ["🕐", "🕕", "🕗"].iter().zip(TARGETS.iter()) {
        let text = summary.completion.get(*label).cloned().unwrap_or_default();
        lines.push(format!("{} {} Complete: {}", emoji, label, text));
    }
    lines.push(format!("☕ Break Time: {}", summary.break_time));
    lines.join("\n")
}
