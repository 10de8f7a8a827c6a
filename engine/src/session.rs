//! The panel session: a live view over one diagnostic feed.
//!
//! A session owns the current tree, the cursor, and a change
//! subscription. Every refresh pulls the whole feed and rebuilds the
//! tree from scratch; expansion state is carried across by snapshot
//! and replay, never by patching rows in place.

use std::sync::Arc;

use triage_feed::{ChangeListener, DiagnosticFeed};

use crate::normalize::{NormalizeContext, normalize};
use crate::tree::{DiagnosticNode, ExpansionSnapshot, Tree};

/// Most change notices drained per frame before a refresh.
pub const CHANGE_BUDGET: usize = 32;

/// Health of the last pull, surfaced in the footer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Ok,
    Failed(String),
}

/// Address of one visible row in the flattened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Group { group: usize },
    Leaf { group: usize, child: usize },
}

impl RowRef {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// A live diagnostics panel bound to a feed.
pub struct PanelSession {
    feed: Arc<dyn DiagnosticFeed>,
    ctx: NormalizeContext,
    listener: Option<ChangeListener>,
    tree: Tree,
    selected: usize,
    feed_status: FeedStatus,
    rejected: usize,
}

impl PanelSession {
    /// Opens a session: subscribes, then builds the first tree.
    ///
    /// Subscribing before the first pull means a change landing in
    /// between still surfaces on the next poll rather than being lost.
    #[must_use]
    pub fn open(feed: Arc<dyn DiagnosticFeed>, ctx: NormalizeContext) -> Self {
        let listener = feed.subscribe();
        let mut session = Self {
            feed,
            ctx,
            listener: Some(listener),
            tree: Tree::default(),
            selected: 0,
            feed_status: FeedStatus::default(),
            rejected: 0,
        };
        session.rebuild(&ExpansionSnapshot::empty());
        session
    }

    /// Closes the session, discarding the tree and expansion state.
    /// Closing an already-closed session does nothing.
    pub fn close(&mut self) {
        self.listener = None;
        self.tree = Tree::default();
        self.selected = 0;
        self.feed_status = FeedStatus::Ok;
        self.rejected = 0;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.listener.is_some()
    }

    /// Pulls the feed and rebuilds the tree, carrying expansion state
    /// across by group identity. No-op while closed.
    pub fn refresh(&mut self) {
        if !self.is_open() {
            return;
        }
        let snapshot = self.tree.expansion_snapshot();
        self.rebuild(&snapshot);
    }

    fn rebuild(&mut self, snapshot: &ExpansionSnapshot) {
        match self.feed.pull() {
            Ok(records) => {
                let (normalized, rejected) = normalize(&records, &self.ctx).into_parts();
                let mut tree = Tree::build(normalized);
                tree.reconcile(snapshot);
                // The replacement tree is complete before it becomes
                // visible; a mid-rebuild state never renders.
                self.tree = tree;
                self.rejected = rejected.len();
                self.feed_status = FeedStatus::Ok;
                self.clamp_selection();
            }
            Err(err) => {
                tracing::error!("diagnostic refresh failed: {err}");
                self.feed_status = FeedStatus::Failed(err.to_string());
            }
        }
    }

    /// Drains pending change notices (up to `budget`) and refreshes
    /// once if any arrived. Returns whether a refresh happened.
    pub fn poll_changes(&mut self, budget: usize) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        let mut seen = 0;
        while seen < budget && listener.try_next().is_some() {
            seen += 1;
        }
        if seen == 0 {
            return false;
        }
        self.refresh();
        true
    }

    /// Asks the feed to rescan now instead of waiting for its timer.
    pub fn request_rescan(&self) {
        self.feed.rescan();
    }

    /// Flattens the tree into its visible rows: every group, plus the
    /// children of expanded groups.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<RowRef> {
        let mut rows = Vec::new();
        for (group_index, group) in self.tree.groups().iter().enumerate() {
            rows.push(RowRef::Group { group: group_index });
            if group.is_expanded() {
                for child_index in 0..group.children().len() {
                    rows.push(RowRef::Leaf {
                        group: group_index,
                        child: child_index,
                    });
                }
            }
        }
        rows
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<RowRef> {
        self.visible_rows().get(self.selected).copied()
    }

    /// The diagnostic under the cursor, when a leaf is selected.
    #[must_use]
    pub fn selected_leaf(&self) -> Option<&DiagnosticNode> {
        match self.selected_row()? {
            RowRef::Group { .. } => None,
            RowRef::Leaf { group, child } => self.tree.groups().get(group)?.children().get(child),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_rows().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_rows().len().saturating_sub(1);
    }

    /// Toggles the selected group's expansion. Returns false when the
    /// cursor is on a leaf (or nothing), so the caller can treat the
    /// key as a jump instead.
    pub fn toggle_selected(&mut self) -> bool {
        let Some(RowRef::Group { group }) = self.selected_row() else {
            return false;
        };
        self.tree.toggle_group(group);
        self.clamp_selection();
        true
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[must_use]
    pub fn feed_status(&self) -> &FeedStatus {
        &self.feed_status
    }

    /// Records dropped by the last successful refresh.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }
}
