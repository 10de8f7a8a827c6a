//! Core domain types for triage.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application: the feed produces [`RawDiagnostic`]s, the engine normalizes
//! them, and the UI reads [`UiOptions`].

mod text;

pub use text::{truncate_to_fit, truncate_with_ellipsis};

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Severity
// ============================================================================

/// Severity level for a diagnostic, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error = 1,
    Warn = 2,
    Info = 3,
    Hint = 4,
}

impl Severity {
    /// Convert from a raw numeric code (1=Error, 2=Warn, 3=Info, 4=Hint).
    ///
    /// Returns `None` for values outside the defined range.
    /// Callers (boundary code) decide the fallback policy.
    #[must_use]
    pub fn from_code(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Error),
            2 => Some(Self::Warn),
            3 => Some(Self::Info),
            4 => Some(Self::Hint),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warning",
            Self::Info => "info",
            Self::Hint => "hint",
        }
    }

    /// Single-letter form used by the default sign fallback ("E: ").
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Error => 'E',
            Self::Warn => 'W',
            Self::Info => 'I',
            Self::Hint => 'H',
        }
    }

    /// All severities, most severe first.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self::Error, Self::Warn, Self::Info, Self::Hint]
    }
}

// ============================================================================
// RawDiagnostic
// ============================================================================

/// A single diagnostic record as reported by a feed, before normalization.
///
/// The severity is carried as the raw numeric code; out-of-range codes are
/// representable here and rejected by the normalizer, never silently mapped.
/// Fields are private; external consumers read via accessors. `Hash` covers
/// every field, so a hash over a record set fingerprints the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct RawDiagnostic {
    /// File the diagnostic belongs to, as the feed reported it.
    #[serde(alias = "file")]
    path: PathBuf,
    /// 0-indexed line number.
    line: u32,
    /// 0-indexed column.
    #[serde(alias = "column")]
    col: u32,
    /// Raw severity code. A missing field deserializes to 0 (invalid).
    #[serde(default)]
    severity: u8,
    message: String,
    /// Tool that produced the diagnostic (e.g. "clippy"). Resolved to a
    /// concrete string at the boundary.
    #[serde(default)]
    source: String,
}

impl RawDiagnostic {
    /// Construct a raw record with all fields. This is the single
    /// construction path; the private fields prevent mutation afterward.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        line: u32,
        col: u32,
        severity: u8,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            col,
            severity,
            message: message.into(),
            source: source.into(),
        }
    }

    /// File the diagnostic belongs to, exactly as the feed reported it.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 0-indexed line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Raw severity code; validated by [`Severity::from_code`] downstream.
    #[must_use]
    pub fn severity(&self) -> u8 {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tool that produced the diagnostic, or `""` when unreported.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

// ============================================================================
// UiOptions
// ============================================================================

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}
