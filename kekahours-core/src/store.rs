//! Snapshot persistence for kekahours
//!
//! A small key-value table in SQLite holds the latest daily summary plus its
//! pre-rendered text forms. The fetch path writes it after every refresh
//! (degraded summaries included) and the status command and the dashboard's
//! snapshot view read whatever is latest.

use crate::error::{Error, Result};
use crate::types::DailySummary;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage key for the structured summary JSON.
pub const KEY_SUMMARY: &str = "hourDataObj";
/// Storage key for the rendered card. The name is kept from earlier clients
/// that stored an HTML fragment here.
pub const KEY_CARD: &str = "hourDataHtml";
/// Storage key for the plain-text digest.
pub const KEY_DIGEST: &str = "hourData";
/// Storage key for the minimize toggle.
pub const KEY_MINIMIZED: &str = "widgetMinimized";

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: single key-value table
    r#"
    CREATE TABLE IF NOT EXISTS snapshots (
        key        TEXT PRIMARY KEY,
        value      TEXT NOT NULL,
        updated_at DATETIME NOT NULL
    );
    "#,
];

/// Run all pending migrations
fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running snapshot store migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Snapshot store migrations complete"
        );
    }

    Ok(())
}

/// Snapshot store handle (single connection)
pub struct SnapshotStore {
    conn: Mutex<Connection>,
}

impl SnapshotStore {
    /// Open or create a store at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL so the status command can read while the dashboard writes
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this store
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        run_migrations(&conn)
    }

    /// Write a complete snapshot: the structured summary plus both rendered
    /// forms, all under one transaction so readers never see a mixed state.
    pub fn put_snapshot(&self, summary: &DailySummary, card: &str, digest: &str) -> Result<()> {
        let json = serde_json::to_string(summary)?;
        let now = Utc::now().to_rfc3339();

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for (key, value) in [
            (KEY_SUMMARY, json.as_str()),
            (KEY_CARD, card),
            (KEY_DIGEST, digest),
        ] {
            tx.execute(
                r#"
                INSERT INTO snapshots (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the latest structured summary and when it was written.
    ///
    /// An unreadable stored value is treated as absent so callers fall
    /// through to the rendered forms.
    pub fn load_summary(&self) -> Result<Option<(DailySummary, DateTime<Utc>)>> {
        let row = match self.get(KEY_SUMMARY)? {
            Some(row) => row,
            None => return Ok(None),
        };

        match serde_json::from_str(&row.0) {
            Ok(summary) => Ok(Some((summary, row.1))),
            Err(e) => {
                tracing::warn!(error = %e, "Stored summary is unreadable, treating as absent");
                Ok(None)
            }
        }
    }

    /// Load the latest rendered card and when it was written.
    pub fn load_card(&self) -> Result<Option<(String, DateTime<Utc>)>> {
        self.get(KEY_CARD)
    }

    /// Load the latest plain-text digest and when it was written.
    pub fn load_digest(&self) -> Result<Option<(String, DateTime<Utc>)>> {
        self.get(KEY_DIGEST)
    }

    /// Whether the widget was last left minimized. Absent means expanded.
    pub fn widget_minimized(&self) -> Result<bool> {
        Ok(self
            .get(KEY_MINIMIZED)?
            .map(|(value, _)| value == "true")
            .unwrap_or(false))
    }

    /// Persist the minimize toggle.
    pub fn set_widget_minimized(&self, minimized: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![
                KEY_MINIMIZED,
                if minimized { "true" } else { "false" },
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<(String, DateTime<Utc>)>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value, updated_at FROM snapshots WHERE key = ?",
            [key],
            |row| {
                let value: String = row.get(0)?;
                let updated_at_str: String = row.get(1)?;
                let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());
                Ok((value, updated_at))
            },
        )
        .optional()
        .map_err(Error::from)
    }
}
