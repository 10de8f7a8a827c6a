//! Terminal input pump and key dispatch.
//!
//! Crossterm's `event::read` blocks, so a dedicated blocking task polls for
//! events and forwards them over a bounded channel. The render loop drains
//! that channel once per frame through [`handle_events`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use triage_engine::App;

/// Poll timeout for the input thread. Short enough that shutdown is prompt.
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25);
/// Bounded channel so a wedged render loop cannot grow the queue forever.
const INPUT_CHANNEL_CAPACITY: usize = 1024;
/// Cap on events applied per frame so rendering never starves under a
/// key-repeat flood.
const MAX_EVENTS_PER_FRAME: usize = 64;

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Owns the blocking input task and the channel it feeds.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    /// Spawns the input task. Requires a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let task_stop = Arc::clone(&stop);
        let join = tokio::task::spawn_blocking(move || input_loop(&task_stop, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Stops the input task and waits for it to exit, bounded by a timeout
    /// in case the terminal blocks the final poll.
    pub async fn shutdown(&mut self) {
        // Closing the receiver first unblocks a sender stuck on a full
        // channel.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best effort only; Drop must not block on the input thread.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.blocking_send(InputMsg::Error(err.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(err) => {
                let _ = tx.blocking_send(InputMsg::Error(err.to_string()));
                break;
            }
        }
    }
}

/// Drains pending input and applies it to the app, bounded per frame.
/// Returns `true` once the user has asked to quit.
///
/// # Errors
///
/// Returns an error when the input task reported a terminal read failure
/// or exited unexpectedly.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let msg = match input.rx.try_recv() {
            Ok(msg) => msg,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                return Err(anyhow!("input task exited unexpectedly"));
            }
        };
        processed += 1;

        match msg {
            InputMsg::Event(Event::Key(key)) => apply_key(app, key),
            InputMsg::Event(_) => {}
            InputMsg::Error(reason) => return Err(anyhow!("terminal input failed: {reason}")),
        }
        if app.should_quit() {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

/// Applies a single key event to the app.
pub fn apply_key(app: &mut App, key: KeyEvent) {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => app.clear_status(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_selected(),
        KeyCode::Char('r') => app.request_rescan(),
        _ => {}
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
