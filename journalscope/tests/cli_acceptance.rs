use chrono::{Duration, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    entries: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let entries = base.join("entries.json");
        seed_entries(&entries);

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            entries,
        }
    }
}

/// Three consecutive days ending today, plus another author's entry.
fn seed_entries(path: &Path) {
    let now = Utc::now();
    let entry = |id: &str, author: &str, template: &str, days_ago: i64, content: &str| {
        serde_json::json!({
            "id": id,
            "authorId": author,
            "journalId": "journal-1",
            "templateId": template,
            "content": content,
            "createdAt": (now - Duration::days(days_ago)).to_rfc3339(),
        })
    };
    let entries = serde_json::json!([
        entry("1", "alice", "gratitude", 2, "grateful for the rain"),
        entry("2", "alice", "gratitude", 1, "grateful for friends"),
        entry("3", "alice", "reflection", 0, "a long walk cleared my head"),
        entry("4", "bob", "gratitude", 0, "not alice"),
    ]);
    fs::write(path, entries.to_string()).expect("failed to write entries");
}

fn run_cli(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("journalscope"));
    Command::new(bin_path)
        .arg("--entries")
        .arg(&env.entries)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute journalscope: {e}"))
}

fn assert_success(output: &Output) {
    if output.status.success() {
        return;
    }
    panic!(
        "journalscope failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn json_export_reports_snapshot_and_fallback_insights() {
    let env = CliTestEnv::new();

    let output = run_cli(&env, &["--author", "alice", "--export", "json"]);
    assert_success(&output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let snapshot = &json["snapshot"];
    assert_eq!(snapshot["totalEntries"], 3);
    assert_eq!(snapshot["currentStreak"], 3);
    assert_eq!(snapshot["templateBreakdown"][0]["templateId"], "gratitude");
    assert_eq!(json["insights"]["source"], "fallback");
}

#[test]
fn template_filter_and_no_insights() {
    let env = CliTestEnv::new();

    let output = run_cli(
        &env,
        &[
            "--author",
            "alice",
            "--template",
            "reflection",
            "--no-insights",
            "--export",
            "json",
        ],
    );
    assert_success(&output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["snapshot"]["totalEntries"], 1);
    assert!(json["insights"].is_null());
}

#[test]
fn markdown_export_for_unknown_author_starts_the_journey() {
    let env = CliTestEnv::new();

    let output = run_cli(&env, &["--author", "nobody", "--export", "md"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Journal Insights: nobody"));
    assert!(stdout.contains("No entries found"));
    assert!(stdout.to_lowercase().contains("start your journey"));
}

#[test]
fn unwritable_log_dir_warns_and_continues() {
    let env = CliTestEnv::new();
    // A regular file where the state directory should be.
    let blocked = env.home.join("state-file");
    fs::write(&blocked, "").expect("failed to write state file");

    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("journalscope"));
    let output = Command::new(bin_path)
        .arg("--entries")
        .arg(&env.entries)
        .args(["--author", "alice", "--no-insights", "--export", "json"])
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &blocked)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute journalscope: {e}"));
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("logging disabled"), "stderr:\n{stderr}");
    assert!(stderr.contains("journalscope.log"), "stderr:\n{stderr}");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["snapshot"]["totalEntries"], 3);
}

#[test]
fn inverted_dates_fail() {
    let env = CliTestEnv::new();

    let output = run_cli(
        &env,
        &["--author", "alice", "--from", "2024-06-10", "--to", "2024-06-01"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid date range"), "stderr:\n{stderr}");
}
