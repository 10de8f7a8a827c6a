//! Feed error taxonomy.

use thiserror::Error;

/// Errors a feed surfaces through its pull interface.
///
/// A failed pull never clears anything downstream; the consumer keeps the
/// last set it built and reports the failure.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The configured feed command does not exist on PATH.
    #[error("feed command `{0}` not found in PATH")]
    CommandNotFound(String),

    /// The feed could not produce a current diagnostic set.
    #[error("diagnostic feed unavailable: {0}")]
    Unavailable(String),
}
