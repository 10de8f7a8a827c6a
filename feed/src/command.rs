//! Command feed: runs a lint command and watches its output for changes.
//!
//! The command is expected to print one JSON object per stdout line (the
//! [`RawDiagnostic`] wire form). Lines that fail to parse are skipped, so a
//! tool that mixes progress chatter into stdout still works. The watcher
//! task re-runs the command on an interval and on demand, and publishes a
//! change notice only when the outcome actually differs from the last one.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use triage_types::RawDiagnostic;

use crate::DiagnosticFeed;
use crate::change::{ChangeListener, Subscribers};
use crate::error::FeedError;

const RESCAN_CHANNEL_CAPACITY: usize = 4;

#[derive(Debug, Default)]
struct ScanState {
    records: Vec<RawDiagnostic>,
    /// Reason the last scan failed. When set, pulls fail until a scan succeeds.
    failure: Option<String>,
    /// Fingerprint of the last published outcome; `None` before the first.
    fingerprint: Option<u64>,
}

/// Feed adapter over an external lint command.
#[derive(Debug)]
pub struct CommandFeed {
    state: Arc<Mutex<ScanState>>,
    subscribers: Arc<Subscribers>,
    rescan_tx: mpsc::Sender<()>,
    watcher: JoinHandle<()>,
}

impl CommandFeed {
    /// Resolve `command` on PATH and start the watcher task.
    ///
    /// The watcher scans immediately, then on every `interval` tick and on
    /// every [`DiagnosticFeed::rescan`] request. Must be called from within
    /// a tokio runtime.
    pub fn spawn(
        command: &str,
        args: Vec<String>,
        interval: Duration,
    ) -> Result<Self, FeedError> {
        let resolved = which::which(command)
            .map_err(|_| FeedError::CommandNotFound(command.to_string()))?;

        let state = Arc::new(Mutex::new(ScanState::default()));
        let subscribers = Arc::new(Subscribers::default());
        let (rescan_tx, rescan_rx) = mpsc::channel(RESCAN_CHANNEL_CAPACITY);

        tracing::info!(command = %resolved.display(), ?interval, "starting feed watcher");
        let watcher = tokio::spawn(watch_loop(
            resolved,
            args,
            interval,
            state.clone(),
            subscribers.clone(),
            rescan_rx,
        ));

        Ok(Self {
            state,
            subscribers,
            rescan_tx,
            watcher,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ScanState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticFeed for CommandFeed {
    fn pull(&self) -> Result<Vec<RawDiagnostic>, FeedError> {
        let state = self.lock();
        match &state.failure {
            Some(reason) => Err(FeedError::Unavailable(reason.clone())),
            None => Ok(state.records.clone()),
        }
    }

    fn subscribe(&self) -> ChangeListener {
        self.subscribers.subscribe()
    }

    fn rescan(&self) {
        // Full buffer means scans are already queued up.
        let _ = self.rescan_tx.try_send(());
    }
}

impl Drop for CommandFeed {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

async fn watch_loop(
    command: PathBuf,
    args: Vec<String>,
    interval: Duration,
    state: Arc<Mutex<ScanState>>,
    subscribers: Arc<Subscribers>,
    mut rescan_rx: mpsc::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            request = rescan_rx.recv() => {
                if request.is_none() {
                    // Feed handle dropped; nothing left to publish to.
                    break;
                }
            }
        }
        let outcome = scan(&command, &args).await;
        publish(&state, &subscribers, outcome);
    }
}

async fn scan(command: &Path, args: &[String]) -> Result<Vec<RawDiagnostic>, FeedError> {
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| FeedError::Unavailable(format!("spawning {}: {e}", command.display())))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let records = parse_records(&stdout);

    // Lint tools exit nonzero when they find issues, so the exit status
    // alone is not failure. A nonzero exit with nothing parseable is.
    if records.is_empty() && !output.status.success() {
        return Err(FeedError::Unavailable(failure_detail(
            output.status,
            &output.stderr,
        )));
    }

    Ok(records)
}

fn parse_records(stdout: &str) -> Vec<RawDiagnostic> {
    let mut records = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawDiagnostic>(line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!("skipping unparseable feed line: {e}"),
        }
    }
    records
}

fn failure_detail(status: std::process::ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    match stderr.lines().find(|l| !l.trim().is_empty()) {
        Some(line) => format!("{status}: {}", line.trim()),
        None => status.to_string(),
    }
}

/// Store the outcome and notify subscribers, unless it matches the
/// previously published one.
fn publish(
    state: &Mutex<ScanState>,
    subscribers: &Subscribers,
    outcome: Result<Vec<RawDiagnostic>, FeedError>,
) {
    let fingerprint = outcome_fingerprint(&outcome);
    {
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.fingerprint == Some(fingerprint) {
            return;
        }
        guard.fingerprint = Some(fingerprint);
        match outcome {
            Ok(records) => {
                tracing::debug!(count = records.len(), "feed scan produced records");
                guard.records = records;
                guard.failure = None;
            }
            Err(e) => {
                tracing::warn!("feed scan failed: {e}");
                guard.failure = Some(e.to_string());
            }
        }
    }
    subscribers.notify();
}

fn outcome_fingerprint(outcome: &Result<Vec<RawDiagnostic>, FeedError>) -> u64 {
    let mut hasher = DefaultHasher::new();
    match outcome {
        Ok(records) => {
            0u8.hash(&mut hasher);
            for record in records {
                record.hash(&mut hasher);
            }
        }
        Err(e) => {
            1u8.hash(&mut hasher);
            e.to_string().hash(&mut hasher);
        }
    }
    hasher.finish()
}
