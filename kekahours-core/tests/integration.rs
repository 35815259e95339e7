//! Integration tests for the kekahours summary pipeline
//!
//! These tests use a canned API response in `tests/fixtures/` to verify the
//! record-to-summary reduction and the snapshot persistence flow end to end.

use chrono::{NaiveDate, TimeZone, Utc};
use kekahours_core::card::{render_card, render_digest};
use kekahours_core::{summarize_records, Completion, DailySummary, SnapshotStore, SummaryStatus};
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Load the day records out of the canned API response
fn fixture_records() -> Vec<serde_json::Value> {
    let raw = std::fs::read_to_string(fixture_path("summary_response.json")).unwrap();
    let body: serde_json::Value = serde_json::from_str(&raw).unwrap();
    body["data"].as_array().unwrap().clone()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================
// Record-to-summary reduction
// ============================================

#[test]
fn test_summarize_fixture_day() {
    let summary = summarize_records(&fixture_records(), day(2025, 1, 15));

    assert_eq!(summary.status, SummaryStatus::Ok);
    assert_eq!(summary.effective.total_minutes(), 330);
    assert_eq!(summary.gross.total_minutes(), 420);
    assert_eq!(summary.break_time.total_minutes(), 90);
    assert_eq!(
        summary.last_log_timestamp,
        Some(Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap())
    );

    let info = summary.completion_info.as_ref().unwrap();
    assert_eq!(
        info["4h"],
        Completion::Reached {
            reached_at: Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap()
        }
    );
    assert_eq!(
        info["6h"],
        Completion::Pending {
            eta: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
        }
    );
    assert_eq!(
        info["8h"],
        Completion::Pending {
            eta: Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap()
        }
    );
}

#[test]
fn test_summarize_earlier_fixture_day() {
    // The 14th has all three targets already reached
    let summary = summarize_records(&fixture_records(), day(2025, 1, 14));

    assert_eq!(summary.effective.total_minutes(), 485);
    let info = summary.completion_info.as_ref().unwrap();
    for label in ["4h", "6h", "8h"] {
        assert!(info[label].is_reached(), "{} should be reached", label);
    }
    assert_eq!(
        info["8h"],
        Completion::Reached {
            reached_at: Utc.with_ymd_and_hms(2025, 1, 14, 12, 35, 0).unwrap()
        }
    );
}

#[test]
fn test_summarize_day_without_record() {
    let summary = summarize_records(&fixture_records(), day(2025, 1, 16));

    assert_eq!(summary.status, SummaryStatus::NoTodayRecord);
    assert_eq!(summary.effective.total_minutes(), 0);
    for label in ["4h", "6h", "8h"] {
        assert_eq!(summary.completion[label], "Not found");
    }
}

// ============================================
// Snapshot persistence
// ============================================

#[test]
fn test_snapshot_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("snapshots.db");

    let summary = summarize_records(&fixture_records(), day(2025, 1, 15));
    let card = render_card(&summary);
    let digest = render_digest(&summary);

    {
        let store = SnapshotStore::open(&db_path).expect("store should open");
        store.migrate().expect("migrations should run");
        store.put_snapshot(&summary, &card, &digest).unwrap();
        store.set_widget_minimized(true).unwrap();
    }

    // A fresh handle, as the status command would open it
    let store = SnapshotStore::open(&db_path).expect("store should reopen");
    store.migrate().expect("migrations should be idempotent");

    let (loaded, _) = store.load_summary().unwrap().expect("summary present");
    assert_eq!(loaded, summary);
    assert_eq!(store.load_card().unwrap().unwrap().0, card);
    assert_eq!(store.load_digest().unwrap().unwrap().0, digest);
    assert!(store.widget_minimized().unwrap());
}

#[test]
fn test_degraded_snapshot_is_stored_too() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("snapshots.db");

    let store = SnapshotStore::open(&db_path).unwrap();
    store.migrate().unwrap();

    let summary = DailySummary::degraded(SummaryStatus::ApiError, "500");
    store
        .put_snapshot(&summary, &render_card(&summary), &render_digest(&summary))
        .unwrap();

    let (loaded, _) = store.load_summary().unwrap().unwrap();
    assert_eq!(loaded.status, SummaryStatus::ApiError);
    assert_eq!(loaded.completion["4h"], "500");

    let (digest, _) = store.load_digest().unwrap().unwrap();
    assert!(digest.contains("4h Complete: 500"));
}
