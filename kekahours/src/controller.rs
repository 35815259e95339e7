//! Refresh scheduling for the dashboard.
//!
//! All lifecycle state lives in explicit fields with a `start`/`stop`/
//! `destroy` surface, so the scheduling rules are testable without a
//! terminal or a clock.

use std::time::{Duration, Instant};

/// Schedules refresh cycles for the dashboard.
///
/// `start`/`stop` gate the periodic refresh, `set_visible` pauses it while
/// the terminal is unfocused, and `destroy` is terminal: nothing is ever due
/// again, including requests already queued.
#[derive(Debug)]
pub struct RefreshController {
    /// Time between automatic refreshes
    interval: Duration,
    /// Whether the periodic refresh is active
    running: bool,
    /// Terminal teardown flag
    destroyed: bool,
    /// Whether the terminal currently has focus
    visible: bool,
    /// When the last refresh cycle fired
    last_refresh: Option<Instant>,
    /// A refresh was requested ahead of the interval
    immediate: bool,
}

impl RefreshController {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            destroyed: false,
            visible: true,
            last_refresh: None,
            immediate: false,
        }
    }

    /// Begin the refresh cycle. The first poll after this is due immediately.
    pub fn start(&mut self) {
        if self.destroyed {
            return;
        }
        tracing::debug!("Refresh schedule started");
        self.running = true;
        self.immediate = true;
    }

    /// Pause the refresh cycle without tearing anything down.
    pub fn stop(&mut self) {
        tracing::debug!("Refresh schedule stopped");
        self.running = false;
    }

    /// Terminal teardown. Suppresses every future refresh.
    pub fn destroy(&mut self) {
        tracing::debug!("Refresh schedule destroyed");
        self.destroyed = true;
        self.running = false;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Track terminal focus. Regaining focus while running triggers an
    /// immediate refresh instead of waiting out the interval.
    pub fn set_visible(&mut self, visible: bool) {
        let regained = visible && !self.visible;
        self.visible = visible;
        if regained && self.running && !self.destroyed {
            self.immediate = true;
        }
    }

    /// Ask for a refresh on the next poll, ahead of the interval.
    pub fn request_refresh(&mut self) {
        if self.running && !self.destroyed {
            self.immediate = true;
        }
    }

    /// Whether a refresh cycle is due at `now`.
    ///
    /// Consumes the immediate flag and advances the schedule when it
    /// returns true, so each due cycle fires exactly once.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        if !self.running || self.destroyed || !self.visible {
            return false;
        }

        let due = self.immediate
            || match self.last_refresh {
                Some(last) => now.duration_since(last) >= self.interval,
                None => true,
            };

        if due {
            self.immediate = false;
            self.last_refresh = Some(now);
        }
        due
    }
}
