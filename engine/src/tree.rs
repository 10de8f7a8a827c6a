//! The two-level diagnostic tree: file groups over position-ordered leaves.

use std::collections::{HashMap, HashSet};

use triage_types::Severity;

use crate::normalize::{GroupKey, NodeKey, NormalizedDiagnostic};

/// A leaf: one diagnostic under its file group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticNode {
    diagnostic: NormalizedDiagnostic,
}

impl DiagnosticNode {
    #[must_use]
    pub fn diagnostic(&self) -> &NormalizedDiagnostic {
        &self.diagnostic
    }

    #[must_use]
    pub fn node_key(&self) -> NodeKey {
        self.diagnostic.node_key()
    }
}

/// A file group and its diagnostics, ordered by position.
#[derive(Debug, Clone)]
pub struct GroupNode {
    group_key: GroupKey,
    display_path: String,
    expanded: bool,
    children: Vec<DiagnosticNode>,
}

impl GroupNode {
    fn new(group_key: GroupKey, display_path: String) -> Self {
        Self {
            group_key,
            display_path,
            expanded: false,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn group_key(&self) -> &GroupKey {
        &self.group_key
    }

    #[must_use]
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    #[must_use]
    pub fn children(&self) -> &[DiagnosticNode] {
        &self.children
    }

    /// Appends a leaf. Children arrive position-sorted, so a colliding
    /// node key is always the previous slot; the later record wins.
    fn push_leaf(&mut self, node: DiagnosticNode) {
        if let Some(last) = self.children.last_mut()
            && last.node_key() == node.node_key()
        {
            *last = node;
            return;
        }
        self.children.push(node);
    }
}

/// Snapshot of which groups were expanded, keyed by group identity.
///
/// Captured before a rebuild and replayed after it, so expansion state
/// follows the file rather than the row it happened to occupy.
#[derive(Debug, Clone, Default)]
pub struct ExpansionSnapshot {
    expanded: HashSet<GroupKey>,
}

impl ExpansionSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &GroupKey) -> bool {
        self.expanded.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// The full diagnostic tree for one feed batch.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    groups: Vec<GroupNode>,
}

impl Tree {
    /// Builds a tree from normalized records.
    ///
    /// One stable sort yields both orders at once: groups come out in
    /// display-path order and leaves in position order. Ties keep feed
    /// order, so a later record at a colliding position replaces the
    /// earlier one. All groups start closed; apply a snapshot via
    /// [`Tree::reconcile`] to restore expansion.
    #[must_use]
    pub fn build(mut records: Vec<NormalizedDiagnostic>) -> Self {
        records.sort_by(|a, b| {
            a.display_path()
                .cmp(b.display_path())
                .then_with(|| a.line().cmp(&b.line()))
                .then_with(|| a.col().cmp(&b.col()))
        });

        let mut groups: Vec<GroupNode> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();

        for record in records {
            let slot = match index.get(record.group_key()) {
                Some(&slot) => slot,
                None => {
                    index.insert(record.group_key().clone(), groups.len());
                    groups.push(GroupNode::new(
                        record.group_key().clone(),
                        record.display_path().to_string(),
                    ));
                    groups.len() - 1
                }
            };
            groups[slot].push_leaf(DiagnosticNode { diagnostic: record });
        }

        Self { groups }
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupNode] {
        &self.groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Captures the expanded group keys for replay after a rebuild.
    #[must_use]
    pub fn expansion_snapshot(&self) -> ExpansionSnapshot {
        ExpansionSnapshot {
            expanded: self
                .groups
                .iter()
                .filter(|group| group.is_expanded())
                .map(|group| group.group_key().clone())
                .collect(),
        }
    }

    /// Replays a snapshot onto this tree by group identity.
    ///
    /// Groups named in the snapshot open, everything else closes; keys
    /// with no surviving group are dropped without complaint.
    pub fn reconcile(&mut self, snapshot: &ExpansionSnapshot) {
        for group in &mut self.groups {
            group.expanded = snapshot.contains(&group.group_key);
        }
    }

    /// Flips one group's expansion, returning the new state.
    pub(crate) fn toggle_group(&mut self, index: usize) -> Option<bool> {
        let group = self.groups.get_mut(index)?;
        group.expanded = !group.expanded;
        Some(group.expanded)
    }

    fn count_by_severity(&self, severity: Severity) -> usize {
        self.groups
            .iter()
            .flat_map(GroupNode::children)
            .filter(|node| node.diagnostic().severity() == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(Severity::Warn)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count_by_severity(Severity::Info)
    }

    #[must_use]
    pub fn hint_count(&self) -> usize {
        self.count_by_severity(Severity::Hint)
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|group| group.children.len()).sum()
    }

    /// Compact tally for a status line, `E:{errors} W:{warnings}`.
    /// Empty string when the tree has no diagnostics.
    #[must_use]
    pub fn status_string(&self) -> String {
        if self.total_count() == 0 {
            return String::new();
        }
        format!("E:{} W:{}", self.error_count(), self.warning_count())
    }
}
