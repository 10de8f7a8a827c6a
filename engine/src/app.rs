//! Application state: one panel session plus UI-facing odds and ends.
//!
//! The TUI layer reads this struct every frame and calls its methods
//! from key handlers; it holds no rendering state of its own.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use triage_feed::DiagnosticFeed;
use triage_types::UiOptions;

use crate::config::{SignsConfig, TriageConfig, expand_env_vars};
use crate::normalize::NormalizeContext;
use crate::session::{CHANGE_BUDGET, PanelSession};

/// Frames the sync indicator stays visible after a refresh.
const REFRESH_FLASH_TICKS: u8 = 90;

pub struct App {
    session: PanelSession,
    ui_options: UiOptions,
    status_message: Option<String>,
    tick_count: usize,
    refresh_flash: u8,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(feed: Arc<dyn DiagnosticFeed>, config: Option<&TriageConfig>) -> Self {
        let ui_options = ui_options_from_config(config);
        let signs = config
            .and_then(|cfg| cfg.signs.as_ref())
            .map(SignsConfig::sign_table)
            .unwrap_or_default();
        let ctx = NormalizeContext::new(workspace_root(config), signs);
        let session = PanelSession::open(feed, ctx);

        Self {
            session,
            ui_options,
            status_message: None,
            tick_count: 0,
            refresh_flash: 0,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn session(&self) -> &PanelSession {
        &self.session
    }

    #[must_use]
    pub fn session_mut(&mut self) -> &mut PanelSession {
        &mut self.session
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Replaces the transient status line; the latest message wins.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Advances frame-based state: the tick counter and the sync flash.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.refresh_flash = self.refresh_flash.saturating_sub(1);
    }

    /// Whether the footer should show the sync indicator.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.refresh_flash > 0
    }

    /// Drains feed change notices and refreshes the tree if any arrived.
    pub fn poll_feed(&mut self) {
        if self.session.poll_changes(CHANGE_BUDGET) {
            self.refresh_flash = REFRESH_FLASH_TICKS;
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // Navigation clears the transient status: moving the cursor is the
    // acknowledgement.

    pub fn select_next(&mut self) {
        self.clear_status();
        self.session.select_next();
    }

    pub fn select_prev(&mut self) {
        self.clear_status();
        self.session.select_prev();
    }

    pub fn select_first(&mut self) {
        self.clear_status();
        self.session.select_first();
    }

    pub fn select_last(&mut self) {
        self.clear_status();
        self.session.select_last();
    }

    /// Activates the selected row: groups toggle, leaves surface their
    /// jump target in the status line.
    pub fn activate_selected(&mut self) {
        self.clear_status();
        if self.session.toggle_selected() {
            return;
        }
        if let Some(leaf) = self.session.selected_leaf() {
            let target = leaf.diagnostic().jump_target();
            self.set_status(format!("jump to {target}"));
        }
    }

    /// Asks the feed to rescan now; the result lands via change notice.
    pub fn request_rescan(&mut self) {
        self.session.request_rescan();
        self.set_status("rescanning");
    }
}

fn ui_options_from_config(config: Option<&TriageConfig>) -> UiOptions {
    let app = config.and_then(|cfg| cfg.app.as_ref());
    UiOptions {
        ascii_only: app.map(|cfg| cfg.ascii_only).unwrap_or(false),
        high_contrast: app.map(|cfg| cfg.high_contrast).unwrap_or(false),
        reduced_motion: app.map(|cfg| cfg.reduced_motion).unwrap_or(false),
    }
}

/// The configured root, or the current directory. With neither, paths
/// display in full.
fn workspace_root(config: Option<&TriageConfig>) -> PathBuf {
    config
        .and_then(|cfg| cfg.app.as_ref())
        .and_then(|app| app.root.as_deref())
        .map(|root| PathBuf::from(expand_env_vars(root)))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_default()
}
