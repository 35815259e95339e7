//! # kekahours-core
//!
//! Core library for kekahours - a Keka attendance hours tracker.
//!
//! This library provides:
//! - Domain types for the daily attendance summary
//! - Completion projection for the 4h/6h/8h targets
//! - The attendance API client and summary builder
//! - Snapshot persistence with SQLite
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use kekahours_core::{Config, SnapshotStore};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open the snapshot store
//! let store = SnapshotStore::open(&Config::snapshot_db_path()).expect("failed to open store");
//! store.migrate().expect("failed to run migrations");
//! ```

// Re-export commonly used items at the crate root
pub use attendance::{build_daily_summary, summarize_records, AttendanceClient, SyncSummaryBuilder};
pub use completion::{compute_completion, Completion};
pub use config::Config;
pub use error::{Error, Result};
pub use store::SnapshotStore;
pub use types::*;

// Public modules
pub mod attendance;
pub mod card;
pub mod completion;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod store;
pub mod token;
pub mod types;
