//! triage CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`triage_engine`] (application state) and [`triage_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed
//! cleanup.
//!
//! ```text
//! main() -> TerminalSession::new() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`triage_tui::InputPump`])
//! 3. Advance application state (`app.tick()`)
//! 4. Drain feed change notices (`app.poll_feed()`)
//! 5. Render frame

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use triage_engine::{App, ConfigError, TriageConfig, expand_env_vars};
use triage_feed::{CommandFeed, DiagnosticFeed, MemoryFeed};
use triage_tui::{InputPump, draw, handle_events};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_triage_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_triage_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let candidates = triage_log_file_candidates();
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn triage_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.triage/logs/triage.log
    if let Some(config_path) = TriageConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("triage.log"));
    }

    // Fallback: ./.triage/logs/triage.log (useful in constrained environments)
    candidates.push(PathBuf::from(".triage").join("logs").join("triage.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Manages raw mode, the alternate screen, and alternate scroll mode.
/// On drop, all terminal state is restored to its original configuration,
/// so the terminal remains usable even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        // Enter alternate screen and enable alternate scroll mode (mode 1007).
        // Mode 1007 converts scroll wheel events to Up/Down arrow keys when in
        // alternate screen, WITHOUT capturing mouse clicks. This preserves
        // native text selection while still allowing scroll wheel to work.
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        // Enable alternate scroll mode: CSI ? 1007 h
        let _ = out.write_all(b"\x1b[?1007h");
        let _ = out.flush();

        let backend = CrosstermBackend::new(out);
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let mut out = stdout();
                // Disable alternate scroll mode: CSI ? 1007 l
                let _ = out.write_all(b"\x1b[?1007l");
                let _ = out.flush();
                let _ = execute!(out, LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        // Disable alternate scroll mode: CSI ? 1007 l
        let _ = self.terminal.backend_mut().write_all(b"\x1b[?1007l");
        let _ = std::io::Write::flush(&mut *self.terminal.backend_mut());
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

const NO_FEED_HINT: &str = "no feed command configured; set [feed] command in the config";

fn load_config() -> (Option<TriageConfig>, Option<String>) {
    match TriageConfig::load() {
        Ok(config) => (config, None),
        Err(error) => {
            let warning = match &error {
                ConfigError::Read { path, source } => {
                    format!("Couldn't read {} ({source}). Using defaults.", path.display())
                }
                ConfigError::Parse { path, source } => {
                    format!("Couldn't parse {} ({source}). Using defaults.", path.display())
                }
            };
            (None, Some(warning))
        }
    }
}

/// Builds the feed described by `[feed]` in the config. Falls back to an
/// empty in-memory feed, with a footer notice, when no command is
/// configured or the configured one can't start.
fn build_feed(config: Option<&TriageConfig>) -> (Arc<dyn DiagnosticFeed>, Option<String>) {
    let Some(settings) = config.and_then(|cfg| cfg.feed.as_ref()) else {
        return (Arc::new(MemoryFeed::new()), Some(NO_FEED_HINT.to_string()));
    };
    let Some(command) = settings.command.as_deref() else {
        return (Arc::new(MemoryFeed::new()), Some(NO_FEED_HINT.to_string()));
    };

    let command = expand_env_vars(command);
    let args: Vec<String> = settings
        .args
        .iter()
        .map(|arg| expand_env_vars(arg))
        .collect();
    match CommandFeed::spawn(&command, args, settings.poll_interval()) {
        Ok(feed) => (Arc::new(feed), None),
        Err(err) => {
            tracing::warn!("failed to start diagnostic feed: {err}");
            (Arc::new(MemoryFeed::new()), Some(err.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let (config, config_warning) = load_config();
    let (feed, feed_warning) = build_feed(config.as_ref());

    let mut app = App::new(feed, config.as_ref());
    if let Some(warning) = config_warning.or(feed_warning) {
        app.set_status(warning);
    }

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    app.session_mut().close();
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.tick();
        app.poll_feed();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
