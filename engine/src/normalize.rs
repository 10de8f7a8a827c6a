//! Normalization of raw feed records into tree-ready diagnostics.
//!
//! Every pass over the feed recomputes keys from scratch; nothing here
//! is cached between refreshes.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use triage_types::{RawDiagnostic, Severity};

use crate::error::MalformedDiagnostic;

/// Identity of a file group: the lexically normalized path string.
///
/// Records that spell the same file differently (`./src/a.rs`,
/// `src/b/../a.rs`) collapse into one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of a leaf within its group: the source position.
///
/// Two records at the same position are the same node; the later one
/// in feed order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    line: u32,
    col: u32,
}

impl NodeKey {
    #[must_use]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }
}

/// Style class attached to a rendered sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignStyle {
    Error,
    Warn,
    Info,
    Hint,
    /// Fallback styling for severities with no registered sign.
    Default,
}

/// A severity marker ready to render in front of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sign {
    glyph: String,
    style: SignStyle,
}

impl Sign {
    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    #[must_use]
    pub fn style(&self) -> SignStyle {
        self.style
    }
}

/// Registered sign glyphs, keyed by severity.
///
/// Severities without a registered glyph fall back to a letter marker
/// (`E: `, `W: `, ...) in the default style.
#[derive(Debug, Clone, Default)]
pub struct SignTable {
    registered: HashMap<Severity, String>,
}

impl SignTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a glyph for a severity, padded to one trailing space.
    pub fn register(&mut self, severity: Severity, glyph: &str) {
        let trimmed = glyph.trim_end();
        self.registered.insert(severity, format!("{trimmed} "));
    }

    /// Looks up the sign for a severity, falling back to `X: `.
    #[must_use]
    pub fn resolve(&self, severity: Severity) -> Sign {
        match self.registered.get(&severity) {
            Some(glyph) => Sign {
                glyph: glyph.clone(),
                style: style_for(severity),
            },
            None => Sign {
                glyph: format!("{}: ", severity.letter()),
                style: SignStyle::Default,
            },
        }
    }
}

fn style_for(severity: Severity) -> SignStyle {
    match severity {
        Severity::Error => SignStyle::Error,
        Severity::Warn => SignStyle::Warn,
        Severity::Info => SignStyle::Info,
        Severity::Hint => SignStyle::Hint,
    }
}

/// Shared inputs for a normalization pass.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    root: PathBuf,
    signs: SignTable,
}

impl NormalizeContext {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, signs: SignTable) -> Self {
        Self {
            root: normalize_path(&root.into()),
            signs,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn signs(&self) -> &SignTable {
        &self.signs
    }
}

/// A feed record with its identity and presentation derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDiagnostic {
    group_key: GroupKey,
    node_key: NodeKey,
    severity: Severity,
    message: String,
    display_path: String,
    sign: Sign,
}

impl NormalizedDiagnostic {
    #[must_use]
    pub fn group_key(&self) -> &GroupKey {
        &self.group_key
    }

    #[must_use]
    pub fn node_key(&self) -> NodeKey {
        self.node_key
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Path relative to the normalization root, or the full path when
    /// the record lives outside the root.
    #[must_use]
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    #[must_use]
    pub fn sign(&self) -> &Sign {
        &self.sign
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.node_key.line
    }

    #[must_use]
    pub fn col(&self) -> u32 {
        self.node_key.col
    }

    /// Editor-style jump target, 1-indexed: `path:line:col`.
    #[must_use]
    pub fn jump_target(&self) -> String {
        format!(
            "{}:{}:{}",
            self.display_path,
            self.node_key.line + 1,
            self.node_key.col + 1
        )
    }
}

/// Result of one normalization pass over a feed batch.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    normalized: Vec<NormalizedDiagnostic>,
    rejected: Vec<MalformedDiagnostic>,
}

impl NormalizeOutcome {
    #[must_use]
    pub fn normalized(&self) -> &[NormalizedDiagnostic] {
        &self.normalized
    }

    #[must_use]
    pub fn rejected(&self) -> &[MalformedDiagnostic] {
        &self.rejected
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<NormalizedDiagnostic>, Vec<MalformedDiagnostic>) {
        (self.normalized, self.rejected)
    }
}

/// Normalizes a feed batch, preserving input order among survivors.
///
/// Malformed records are dropped from the batch and reported in the
/// outcome; one bad record never sinks the rest.
pub fn normalize(records: &[RawDiagnostic], ctx: &NormalizeContext) -> NormalizeOutcome {
    let mut normalized = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        let Some(severity) = Severity::from_code(record.severity()) else {
            let rejection = MalformedDiagnostic::SeverityOutOfRange {
                code: record.severity(),
                path: record.path().display().to_string(),
                line: record.line(),
                col: record.col(),
            };
            tracing::warn!("rejecting diagnostic: {rejection}");
            rejected.push(rejection);
            continue;
        };

        let full = normalize_path(record.path());
        let display_path = display_path(&full, ctx.root());
        let sign = ctx.signs().resolve(severity);

        normalized.push(NormalizedDiagnostic {
            group_key: GroupKey(full.display().to_string()),
            node_key: NodeKey::new(record.line(), record.col()),
            severity,
            message: record.message().to_string(),
            display_path,
            sign,
        });
    }

    NormalizeOutcome {
        normalized,
        rejected,
    }
}

/// Lexically normalizes a path: drops `.`, resolves `..` against the
/// prefix. No filesystem access, so symlinks are left alone.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn display_path(full: &Path, root: &Path) -> String {
    match full.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => full.display().to_string(),
    }
}
