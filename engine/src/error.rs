//! Errors produced while normalizing feed records.

/// A feed record that cannot become a tree leaf.
///
/// Malformed records are rejected individually; the rest of the batch
/// still builds. Callers log these and move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedDiagnostic {
    /// The severity code is outside the recognized range.
    #[error("severity code {code} out of range for {path}:{line}:{col}")]
    SeverityOutOfRange {
        code: u8,
        path: String,
        line: u32,
        col: u32,
    },
}
