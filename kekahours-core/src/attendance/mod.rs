//! Attendance fetching and summarization
//!
//! This module turns the remote attendance API into a [`DailySummary`]:
//! - HTTP client for the summary endpoint
//! - Field probing over raw day records
//! - The summary builder tying both together
//!
//! [`DailySummary`]: crate::types::DailySummary

pub mod builder;
pub mod client;
pub mod record;

pub use builder::{build_daily_summary, summarize_records, SyncSummaryBuilder};
pub use client::AttendanceClient;
