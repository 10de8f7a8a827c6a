//! Command feed integration tests (unix shell fixtures)

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use triage_feed::{CommandFeed, DiagnosticFeed, FeedError};

/// Long enough that only the initial scan and explicit rescans run.
const LONG_INTERVAL: Duration = Duration::from_secs(3600);

fn diagnostic_line(path: &str, line: u32, severity: u8, message: &str) -> String {
    serde_json::json!({
        "path": path,
        "line": line,
        "col": 0,
        "severity": severity,
        "message": message,
    })
    .to_string()
}

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("lint.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test]
async fn command_feed_parses_json_lines_and_skips_chatter() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        &format!(
            "echo 'checking 2 files...'\necho '{}'\necho '{}'",
            diagnostic_line("src/a.rs", 3, 1, "boom"),
            diagnostic_line("src/b.rs", 0, 2, "meh"),
        ),
    );

    let feed = CommandFeed::spawn(script.to_str().unwrap(), Vec::new(), LONG_INTERVAL).unwrap();
    wait_until("first scan", || {
        matches!(feed.pull(), Ok(records) if records.len() == 2)
    })
    .await;

    let records = feed.pull().unwrap();
    assert_eq!(records[0].message(), "boom");
    assert_eq!(records[1].severity(), 2);
}

#[tokio::test]
async fn unresolvable_command_fails_at_spawn() {
    let err = CommandFeed::spawn("triage-no-such-lint-tool", Vec::new(), LONG_INTERVAL)
        .unwrap_err();
    assert!(matches!(err, FeedError::CommandNotFound(_)));
    assert_eq!(
        err.to_string(),
        "feed command `triage-no-such-lint-tool` not found in PATH"
    );
}

#[tokio::test]
async fn rescan_picks_up_new_output() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("findings.jsonl");
    fs::write(&data, diagnostic_line("src/a.rs", 1, 1, "first pass")).unwrap();
    let script = write_script(dir.path(), &format!("cat '{}'", data.display()));

    let feed = CommandFeed::spawn(script.to_str().unwrap(), Vec::new(), LONG_INTERVAL).unwrap();
    wait_until("initial scan", || {
        matches!(feed.pull(), Ok(records) if records.len() == 1)
    })
    .await;

    fs::write(
        &data,
        format!(
            "{}\n{}",
            diagnostic_line("src/a.rs", 1, 1, "second pass"),
            diagnostic_line("src/b.rs", 8, 2, "new file"),
        ),
    )
    .unwrap();
    feed.rescan();

    wait_until("rescan", || {
        matches!(feed.pull(), Ok(records) if records.len() == 2)
    })
    .await;
    let records = feed.pull().unwrap();
    assert_eq!(records[0].message(), "second pass");
}

#[tokio::test]
async fn distinct_outcomes_publish_change_notices() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("findings.jsonl");
    fs::write(&data, diagnostic_line("src/a.rs", 1, 1, "first pass")).unwrap();
    let script = write_script(dir.path(), &format!("cat '{}'", data.display()));

    let feed = CommandFeed::spawn(script.to_str().unwrap(), Vec::new(), LONG_INTERVAL).unwrap();
    wait_until("initial scan", || feed.pull().is_ok_and(|r| !r.is_empty())).await;

    let mut listener = feed.subscribe();
    fs::write(&data, diagnostic_line("src/a.rs", 2, 1, "moved")).unwrap();
    feed.rescan();

    wait_until("change notice", || listener.try_next().is_some()).await;
}

#[tokio::test]
async fn failed_scans_surface_stderr_detail() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo 'config file missing' >&2\nexit 2");

    let feed = CommandFeed::spawn(script.to_str().unwrap(), Vec::new(), LONG_INTERVAL).unwrap();
    wait_until("failing scan", || feed.pull().is_err()).await;

    let err = feed.pull().unwrap_err();
    assert!(matches!(&err, FeedError::Unavailable(_)));
    assert!(
        err.to_string().contains("config file missing"),
        "unexpected detail: {err}"
    );
}

#[tokio::test]
async fn lint_findings_with_nonzero_exit_still_count() {
    // Real lint tools exit 1 when they find problems.
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        &format!("echo '{}'\nexit 1", diagnostic_line("src/a.rs", 3, 1, "boom")),
    );

    let feed = CommandFeed::spawn(script.to_str().unwrap(), Vec::new(), LONG_INTERVAL).unwrap();
    wait_until("scan with findings", || {
        feed.pull().is_ok_and(|r| r.len() == 1)
    })
    .await;
}
