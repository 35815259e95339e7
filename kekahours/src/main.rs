//! kekahours - Keka attendance hours for the terminal
//!
//! A dashboard TUI plus CLI commands for:
//! - Watching today's effective/gross hours and target ETAs (default)
//! - Printing the stored snapshot without fetching
//! - Fetching today's summary once, for scripts and cron
//!
//! Uses the XDG Base Directory Specification for file locations:
//! - Snapshots: $XDG_DATA_HOME/kekahours/snapshots.db (~/.local/share/kekahours/snapshots.db)
//! - Config: $XDG_CONFIG_HOME/kekahours/config.toml (~/.config/kekahours/config.toml)

mod app;
mod controller;
mod ui;
mod worker;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kekahours_core::card::{render_card, render_digest};
use kekahours_core::format::format_relative_time;
use kekahours_core::logging::LoggingGuard;
use kekahours_core::{Config, SnapshotStore, SyncSummaryBuilder};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::controller::RefreshController;
use crate::worker::FetchWorker;

#[derive(Parser)]
#[command(name = "kekahours")]
#[command(about = "Keka attendance hours widget for the terminal")]
#[command(version)]
struct Args {
    /// Path to an alternate config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log to file even for one-shot commands
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dashboard TUI (default)
    Watch,

    /// Print the stored snapshot without fetching
    Status {
        /// Print the stored summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch today's summary once, store it, and print the digest
    Fetch,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path).context("failed to load configuration")?,
        None => Config::load().context("failed to load configuration")?,
    };

    match args.command {
        Some(Command::Status { json }) => {
            let _log_guard = verbose_logging(&config, args.verbose)?;
            cmd_status(json)
        }
        Some(Command::Fetch) => {
            let _log_guard = verbose_logging(&config, args.verbose)?;
            cmd_fetch(config)
        }
        Some(Command::Watch) | None => cmd_watch(config),
    }
}

/// Initialize file logging for one-shot commands when --verbose is set.
fn verbose_logging(config: &Config, verbose: bool) -> Result<Option<LoggingGuard>> {
    if !verbose {
        return Ok(None);
    }
    let guard = kekahours_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;
    Ok(Some(guard))
}

fn cmd_watch(config: Config) -> Result<()> {
    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard = kekahours_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    tracing::info!(
        log_file = %kekahours_core::logging::log_file_path().display(),
        "kekahours TUI starting up"
    );

    // Open snapshot store
    let db_path = Config::snapshot_db_path();
    tracing::info!(path = %db_path.display(), "Opening snapshot store");

    let store = SnapshotStore::open(&db_path).context("failed to open snapshot store")?;
    store.migrate().context("failed to run store migrations")?;
    let store = Arc::new(store);

    // Start the background fetch worker and the refresh schedule
    let worker = FetchWorker::spawn(config.clone(), Arc::clone(&store))
        .context("failed to start fetch worker")?;
    let controller = RefreshController::new(Duration::from_secs(config.widget.refresh_secs));

    let mut app = App::new(store, worker, controller);
    app.controller.start();

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("kekahours TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Drive the refresh schedule and collect finished fetches
        app.on_tick(Instant::now());
        app.drain_results();

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::FocusGained => app.on_focus_changed(true),
                Event::FocusLost => app.on_focus_changed(false),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn cmd_status(json: bool) -> Result<()> {
    let db_path = Config::snapshot_db_path();
    if !db_path.exists() {
        if json {
            println!("null");
        } else {
            println!("No data available. Please open the Keka Attendance page.");
        }
        return Ok(());
    }

    let store = SnapshotStore::open(&db_path).context("failed to open snapshot store")?;
    store.migrate().context("failed to run store migrations")?;

    if json {
        match store.load_summary()? {
            Some((summary, _)) => println!("{}", serde_json::to_string_pretty(&summary)?),
            None => println!("null"),
        }
        return Ok(());
    }

    // Fallback chain: structured summary, then card text, then digest
    if let Some((summary, updated_at)) = store.load_summary()? {
        println!("{}", render_card(&summary));
        println!();
        println!("Updated {}", format_relative_time(updated_at));
    } else if let Some((text, updated_at)) = store.load_card()? {
        println!("{}", text);
        println!();
        println!("Updated {}", format_relative_time(updated_at));
    } else if let Some((text, updated_at)) = store.load_digest()? {
        println!("{}", text);
        println!();
        println!("Updated {}", format_relative_time(updated_at));
    } else {
        println!("No data available. Please open the Keka Attendance page.");
        println!();
        println!("Run 'kekahours fetch' to pull today's summary.");
    }

    Ok(())
}

fn cmd_fetch(config: Config) -> Result<()> {
    let builder = SyncSummaryBuilder::new(config).context("failed to create fetch runtime")?;
    let summary = builder.build();

    let card = render_card(&summary);
    let digest = render_digest(&summary);

    let store = SnapshotStore::open(&Config::snapshot_db_path())
        .context("failed to open snapshot store")?;
    store.migrate().context("failed to run store migrations")?;
    store
        .put_snapshot(&summary, &card, &digest)
        .context("failed to store snapshot")?;

    println!("{}", digest);

    if let Some(message) = summary.status_message() {
        anyhow::bail!("fetch did not produce a full summary: {}", message);
    }

    Ok(())
}
