//! Background fetch worker.
//!
//! Network fetches run on a dedicated thread so the dashboard's event loop
//! never blocks on the attendance API. The worker owns its own runtime via
//! [`SyncSummaryBuilder`], persists every completed summary (degraded ones
//! included) and hands the result back over a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use kekahours_core::card::{render_card, render_digest};
use kekahours_core::{Config, DailySummary, SnapshotStore, SyncSummaryBuilder};

enum WorkerCommand {
    Refresh,
    Shutdown,
}

/// Handle to the fetch thread.
pub struct FetchWorker {
    commands: Sender<WorkerCommand>,
    results: Receiver<DailySummary>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Spawn the fetch thread.
    pub fn spawn(config: Config, store: Arc<SnapshotStore>) -> Result<Self> {
        let builder = SyncSummaryBuilder::new(config).context("failed to create fetch runtime")?;

        let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
        let (result_tx, result_rx) = mpsc::channel::<DailySummary>();

        let handle = thread::Builder::new()
            .name("kekahours-fetch".into())
            .spawn(move || {
                while let Ok(command) = command_rx.recv() {
                    match command {
                        WorkerCommand::Refresh => {
                            let started = std::time::Instant::now();
                            let summary = builder.build();
                            tracing::info!(
                                status = ?summary.status,
                                elapsed_ms = started.elapsed().as_millis() as u64,
                                "Refresh cycle complete"
                            );
                            persist_snapshot(&store, &summary);
                            if result_tx.send(summary).is_err() {
                                break;
                            }
                        }
                        WorkerCommand::Shutdown => break,
                    }
                }
            })
            .context("failed to spawn fetch thread")?;

        Ok(Self {
            commands: command_tx,
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Queue one refresh cycle.
    pub fn request_refresh(&self) {
        if self.commands.send(WorkerCommand::Refresh).is_err() {
            tracing::warn!("Fetch thread is gone, refresh request dropped");
        }
    }

    /// Next completed summary, if one arrived since the last call.
    pub fn try_recv(&self) -> Option<DailySummary> {
        self.results.try_recv().ok()
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(WorkerCommand::Shutdown);
            if handle.join().is_err() {
                tracing::warn!("Fetch thread panicked during shutdown");
            }
        }
    }
}

/// Store the snapshot; failures are logged, never surfaced.
fn persist_snapshot(store: &SnapshotStore, summary: &DailySummary) {
    let card = render_card(summary);
    let digest = render_digest(summary);
    if let Err(e) = store.put_snapshot(summary, &card, &digest) {
        tracing::warn!(error = %e, "Failed to persist snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_clean_shutdown() {
        let store = Arc::new(SnapshotStore::open_in_memory().unwrap());
        store.migrate().unwrap();

        // No refresh queued, so dropping must shut the thread down cleanly
        let worker = FetchWorker::spawn(Config::default(), store).unwrap();
        drop(worker);
    }
}
