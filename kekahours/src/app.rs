//! Application state for the TUI.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kekahours_core::{DailySummary, SnapshotStore};
use tracing::warn;

use crate::controller::RefreshController;
use crate::worker::FetchWorker;

/// Current view mode.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ViewMode {
    /// Live dashboard fed by the fetch worker (default)
    #[default]
    Dashboard,
    /// Stored snapshot view showing what the store last persisted
    Snapshot,
}

/// Snapshot rows loaded from the store for the snapshot view.
#[derive(Debug, Clone, Default)]
pub struct SnapshotView {
    /// Structured summary snapshot, with the time it was written
    pub summary: Option<(DailySummary, DateTime<Utc>)>,
    /// Rendered card text snapshot
    pub card: Option<(String, DateTime<Utc>)>,
    /// Rendered one-line-per-target digest snapshot
    pub digest: Option<(String, DateTime<Utc>)>,
}

/// Main application state.
pub struct App {
    /// Snapshot store backing the snapshot view and the minimized flag
    store: Arc<SnapshotStore>,
    /// Background fetch worker
    worker: FetchWorker,
    /// Refresh scheduling state
    pub controller: RefreshController,
    /// Current view mode
    pub view_mode: ViewMode,
    /// Latest summary received from the worker
    pub summary: Option<DailySummary>,
    /// When the latest summary arrived
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Rows loaded from the store for the snapshot view
    pub snapshot: SnapshotView,
    /// Whether the dashboard is collapsed to its title bar
    pub minimized: bool,
    /// Whether the terminal currently has focus
    pub focused: bool,
    /// Whether a refresh has been requested but not yet answered
    pub refreshing: bool,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App wired to the store, worker, and controller.
    ///
    /// The minimized flag is restored from the store so the dashboard
    /// reopens the way it was left.
    pub fn new(
        store: Arc<SnapshotStore>,
        worker: FetchWorker,
        controller: RefreshController,
    ) -> Self {
        let minimized = store.widget_minimized().unwrap_or_else(|err| {
            warn!(error = %err, "failed to restore minimized flag");
            false
        });

        Self {
            store,
            worker,
            controller,
            view_mode: ViewMode::default(),
            summary: None,
            refreshed_at: None,
            snapshot: SnapshotView::default(),
            minimized,
            focused: true,
            refreshing: false,
            should_quit: false,
        }
    }

    // ========== Refresh Loop ==========

    /// Drive the refresh schedule; call once per event-loop tick.
    pub fn on_tick(&mut self, now: Instant) {
        if self.controller.poll_due(now) {
            self.worker.request_refresh();
            self.refreshing = true;
        }
    }

    /// Drain completed fetches from the worker into the dashboard.
    pub fn drain_results(&mut self) {
        while let Some(summary) = self.worker.try_recv() {
            // A destroyed controller means shutdown is underway; drop
            // late results instead of repainting.
            if self.controller.is_destroyed() {
                continue;
            }
            self.summary = Some(summary);
            self.refreshed_at = Some(Utc::now());
            self.refreshing = false;
        }
    }

    /// React to terminal focus changes.
    pub fn on_focus_changed(&mut self, focused: bool) {
        self.focused = focused;
        self.controller.set_visible(focused);
    }

    // ========== Keyboard Input ==========

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view_mode {
            ViewMode::Dashboard => self.handle_dashboard_key(key),
            ViewMode::Snapshot => self.handle_snapshot_key(key),
        }
    }

    /// Handle keyboard input in the dashboard view.
    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
            }
            KeyCode::Char('m') => {
                self.toggle_minimized();
            }
            KeyCode::Char('r') => {
                self.controller.request_refresh();
            }
            KeyCode::Tab => {
                self.open_snapshot_view();
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the snapshot view.
    fn handle_snapshot_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
            }
            KeyCode::Esc | KeyCode::Tab => {
                self.close_snapshot_view();
            }
            KeyCode::Char('r') => {
                self.load_snapshot();
            }
            _ => {}
        }
    }

    // ========== View Transitions ==========

    /// Switch to the snapshot view, pausing the refresh schedule.
    fn open_snapshot_view(&mut self) {
        self.controller.stop();
        self.load_snapshot();
        self.view_mode = ViewMode::Snapshot;
    }

    /// Return to the dashboard, resuming the refresh schedule.
    fn close_snapshot_view(&mut self) {
        self.view_mode = ViewMode::Dashboard;
        self.controller.start();
    }

    /// Reload the snapshot rows from the store.
    fn load_snapshot(&mut self) {
        self.snapshot = SnapshotView {
            summary: self.store.load_summary().unwrap_or_else(|err| {
                warn!(error = %err, "failed to load summary snapshot");
                None
            }),
            card: self.store.load_card().unwrap_or_else(|err| {
                warn!(error = %err, "failed to load card snapshot");
                None
            }),
            digest: self.store.load_digest().unwrap_or_else(|err| {
                warn!(error = %err, "failed to load digest snapshot");
                None
            }),
        };
    }

    /// Toggle the minimized flag and persist it.
    fn toggle_minimized(&mut self) {
        self.minimized = !self.minimized;
        if let Err(err) = self.store.set_widget_minimized(self.minimized) {
            warn!(error = %err, "failed to persist minimized flag");
        }
    }

    /// Tear down the refresh schedule and ask the event loop to exit.
    fn quit(&mut self) {
        self.controller.destroy();
        self.should_quit = true;
    }
}

// ============================================
// Tests
// ============================================
