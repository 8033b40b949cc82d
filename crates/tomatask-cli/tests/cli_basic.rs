//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary home
//! directory so config and database never leak between tests.

use std::process::Command;

use tempfile::TempDir;

struct Cli {
    home: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_tomatask"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("TOMATASK_ENV")
            .env_remove("TOMATASK_LOG")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        serde_json::from_str(&stdout).expect("stdout is JSON")
    }
}

#[test]
fn whoami_defaults_to_anonymous() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["whoami"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "anonymous");
}

#[test]
fn login_then_logout() {
    let cli = Cli::new();
    assert_eq!(cli.run(&["login", "alice"]).2, 0);
    assert_eq!(cli.run(&["whoami"]).0.trim(), "alice");
    assert_eq!(cli.run(&["logout"]).2, 0);
    assert_eq!(cli.run(&["whoami"]).0.trim(), "anonymous");
}

#[test]
fn anonymous_settings_show_defaults() {
    let cli = Cli::new();
    let settings = cli.json(&["settings", "show"]);
    assert_eq!(settings["work_duration"], 25);
    assert_eq!(settings["short_break_duration"], 5);
    assert_eq!(settings["long_break_duration"], 15);
    assert_eq!(settings["sessions_before_long_break"], 4);
    assert_eq!(settings["alarm_volume"], 80);
}

#[test]
fn anonymous_settings_save_asks_for_login() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["settings", "set", "--work", "30"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("login"), "stderr: {stderr}");
}

#[test]
fn settings_set_clamps_and_persists() {
    let cli = Cli::new();
    cli.run(&["login", "alice"]);
    let saved = cli.json(&["settings", "set", "--work", "90", "--volume", "-5"]);
    assert_eq!(saved["work_duration"], 60);
    assert_eq!(saved["alarm_volume"], 0);

    let durations = cli.json(&["timer", "durations"]);
    assert_eq!(durations["work"], 3600);
    assert_eq!(durations["short_break"], 300);

    let reset = cli.json(&["settings", "reset"]);
    assert_eq!(reset["work_duration"], 25);
}

#[test]
fn task_lifecycle() {
    let cli = Cli::new();
    cli.run(&["login", "alice"]);

    let (stdout, _, code) = cli.run(&["task", "add", "write report"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task created:"));

    let tasks = cli.json(&["task", "list", "--json"]);
    let id = tasks[0]["id"].as_str().unwrap().to_string();
    assert_eq!(tasks[0]["text"], "write report");

    // Unique prefixes are accepted.
    assert_eq!(cli.run(&["task", "done", &id[..8]]).2, 0);
    let stats = cli.json(&["stats", "week", "--json"]);
    assert_eq!(stats["total_completed"], 1);
    assert_eq!(stats["daily_counts"].as_array().unwrap().len(), 7);

    assert_eq!(cli.run(&["task", "clear-completed"]).2, 0);
    assert!(cli.json(&["task", "list", "--json"]).as_array().unwrap().is_empty());
    // Hidden tasks still count.
    assert_eq!(cli.json(&["stats", "week", "--json"])["total_completed"], 1);
}

#[test]
fn task_add_requires_login() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["task", "add", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("login"));
}

#[test]
fn config_set_and_get() {
    let cli = Cli::new();
    assert_eq!(cli.run(&["config", "set", "alarm.enabled", "false"]).2, 0);
    assert_eq!(cli.run(&["config", "get", "alarm.enabled"]).0.trim(), "false");
    assert_eq!(cli.run(&["config", "get", "no.such.key"]).2, 1);
    assert_eq!(cli.run(&["config", "reset"]).2, 0);
    assert_eq!(cli.run(&["config", "get", "alarm.enabled"]).0.trim(), "true");
}
