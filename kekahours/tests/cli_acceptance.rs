use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use chrono::Local;
use kekahours_core::card::{render_card, render_digest};
use kekahours_core::{summarize_records, DailySummary, SnapshotStore, SummaryStatus};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("kekahours/snapshots.db")
    }
}

/// Seed the snapshot store with a summary built from a record dated today.
fn seed_snapshot(env: &CliTestEnv) -> DailySummary {
    let today = Local::now().date_naive();
    let records = vec![serde_json::json!({
        "attendanceDate": format!("{}T00:00:00", today.format("%Y-%m-%d")),
        "effectiveHoursInHHMM": "5h 30m",
        "grossHoursInHHMM": "7h 0m",
        "firstLogOfTheDay": "2025-01-15T03:30:00Z",
        "lastLogOfTheDay": "2025-01-15T10:00:00Z",
    })];
    let summary = summarize_records(&records, today);
    assert_eq!(summary.status, SummaryStatus::Ok);

    let store = SnapshotStore::open(&env.db_path()).expect("failed to open store");
    store.migrate().expect("failed to migrate store");
    store
        .put_snapshot(&summary, &render_card(&summary), &render_digest(&summary))
        .expect("failed to seed snapshot");

    summary
}

/// Run the kekahours binary against an isolated XDG environment.
///
/// KEKA_ACCESS_TOKEN is always scrubbed so no test ever talks to the API.
fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("kekahours"));

    let mut command = Command::new(bin_path);

    command
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("KEKA_ACCESS_TOKEN")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute kekahours: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "kekahours {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        output.status,
        stdout,
        stderr
    );
}

#[test]
fn status_without_data_prints_fallback_message() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["status"]);
    assert_success(&["status"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No data available. Please open the Keka Attendance page."),
        "expected fallback message, got:\n{stdout}"
    );
}

#[test]
fn status_prints_seeded_snapshot() {
    let env = CliTestEnv::new();
    seed_snapshot(&env);

    let output = run_bin(&env, &["status"]);
    assert_success(&["status"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Hours Completed: 5h 30m"),
        "expected the stored card, got:\n{stdout}"
    );
    assert!(stdout.contains("Break Time: 1h 30m"));
    assert!(stdout.contains("Updated "));
}

#[test]
fn status_json_emits_stored_summary() {
    let env = CliTestEnv::new();
    seed_snapshot(&env);

    let output = run_bin(&env, &["status", "--json"]);
    assert_success(&["status", "--json"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status --json should print valid JSON");
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["effective"]["hours"], 5);
    assert_eq!(parsed["effective"]["minutes"], 30);
    assert_eq!(parsed["breakTime"]["hours"], 1);
}

#[test]
fn status_json_without_data_prints_null() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["status", "--json"]);
    assert_success(&["status", "--json"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "null");
}

#[test]
fn fetch_without_token_reports_login_and_stores_snapshot() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["fetch"]);
    assert!(
        !output.status.success(),
        "fetch without a token should exit non-zero"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Please login"),
        "expected login placeholder in digest, got:\n{stdout}"
    );

    // The degraded summary is still persisted for other surfaces
    let store = SnapshotStore::open(&env.db_path()).expect("failed to open store");
    store.migrate().expect("failed to migrate store");
    let (summary, _) = store
        .load_summary()
        .expect("failed to load summary")
        .expect("fetch should have stored a summary");
    assert_eq!(summary.status, SummaryStatus::NoToken);
    assert_eq!(summary.effective.total_minutes(), 0);
}
