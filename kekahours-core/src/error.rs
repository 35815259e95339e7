//! Error types for kekahours-core

use thiserror::Error;

/// Main error type for the kekahours-core library
#[derive(Error, Debug)]
pub enum Error {
    /// No access token available in the environment or on disk
    #[error("access token not available")]
    NoToken,

    /// Attendance API returned a non-success status
    #[error("attendance API error: HTTP {status}")]
    Api { status: u16 },

    /// No attendance record found for the current day
    #[error("no attendance record for today")]
    NoTodayRecord,

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for kekahours-core
pub type Result<T> = std::result::Result<T, Error>;
