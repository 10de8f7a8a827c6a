//! Projection of tree nodes into styled display lines.
//!
//! The projector is presentation-only: it never reorders, renumbers,
//! or filters. Positions render 0-based exactly as stored.

use std::path::Path;

use crate::normalize::SignStyle;
use crate::tree::{DiagnosticNode, GroupNode};

/// Filename stems that name a directory's entry file and carry no
/// information on their own, so the parent directory is pulled into
/// the label.
const INDEX_STEMS: &[&str] = &["init", "mod", "index"];

/// Semantic class of a span, mapped to a concrete style by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanClass {
    Toggle,
    GroupPath,
    Sign(SignStyle),
    Message,
    Position,
}

/// One styled fragment of a display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySpan {
    text: String,
    class: SpanClass,
}

impl DisplaySpan {
    fn new(text: String, class: SpanClass) -> Self {
        Self { text, class }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn class(&self) -> SpanClass {
        self.class
    }
}

/// One row of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    depth: usize,
    spans: Vec<DisplaySpan>,
}

impl DisplayLine {
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn spans(&self) -> &[DisplaySpan] {
        &self.spans
    }

    /// Concatenated span text, without styling or indentation.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(DisplaySpan::text).collect()
    }
}

/// Projects a group row: toggle glyph plus shortened path.
///
/// The caller picks the glyph matching the group's expansion state.
#[must_use]
pub fn project_group(group: &GroupNode, toggle: &str) -> DisplayLine {
    DisplayLine {
        depth: 0,
        spans: vec![
            DisplaySpan::new(format!("{toggle} "), SpanClass::Toggle),
            DisplaySpan::new(shorten_path(group.display_path()), SpanClass::GroupPath),
        ],
    }
}

/// Projects a leaf row: sign, message, then the 0-based position.
#[must_use]
pub fn project_leaf(node: &DiagnosticNode) -> DisplayLine {
    let diagnostic = node.diagnostic();
    let sign = diagnostic.sign();
    DisplayLine {
        depth: 1,
        spans: vec![
            DisplaySpan::new(sign.glyph().to_string(), SpanClass::Sign(sign.style())),
            DisplaySpan::new(diagnostic.message().to_string(), SpanClass::Message),
            DisplaySpan::new(
                format!(" [{}, {}]", diagnostic.line(), diagnostic.col()),
                SpanClass::Position,
            ),
        ],
    }
}

/// Shortens a display path to `filename - parent/dir`.
///
/// Entry files (`init.lua`, `mod.rs`, `index.ts`) fold their parent
/// directory into the label and show the grandparent instead, so the
/// row reads `app/init.lua - src` rather than a bare `init.lua`.
fn shorten_path(display_path: &str) -> String {
    let path = Path::new(display_path);
    let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().into_owned())
    else {
        return display_path.to_string();
    };

    let folds_parent = path
        .file_stem()
        .is_some_and(|stem| INDEX_STEMS.contains(&stem.to_string_lossy().as_ref()));

    let (label, dir) = if folds_parent
        && let Some(parent_name) = path.parent().and_then(Path::file_name)
    {
        (
            format!("{}/{file_name}", parent_name.to_string_lossy()),
            path.parent().and_then(Path::parent),
        )
    } else {
        (file_name, path.parent())
    };

    match dir {
        Some(dir) if !dir.as_os_str().is_empty() && dir != Path::new(".") => {
            format!("{label} - {}", dir.display())
        }
        _ => label,
    }
}
