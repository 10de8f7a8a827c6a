//! Diagnostic feed adapters for triage.
//!
//! A feed owns the current set of raw diagnostics. The engine never stores
//! that set; it pulls a fresh copy on every rebuild and listens for a
//! zero-argument "something changed" notice in between. Two adapters are
//! provided: [`CommandFeed`] runs a configured lint command and watches its
//! output, [`MemoryFeed`] holds an explicit set for tests and demos.

pub mod change;

mod command;
mod error;
mod memory;

pub use change::{ChangeListener, ChangeNotice};
pub use command::CommandFeed;
pub use error::FeedError;
pub use memory::MemoryFeed;

use triage_types::RawDiagnostic;

/// Pull interface plus change subscription, the whole surface the engine
/// sees of a diagnostic source.
pub trait DiagnosticFeed: Send + Sync {
    /// Current diagnostic set, unordered. Errors when the feed cannot
    /// produce a current set; the caller keeps whatever it last built.
    fn pull(&self) -> Result<Vec<RawDiagnostic>, FeedError>;

    /// Register for change notices. Dropping the listener unsubscribes.
    fn subscribe(&self) -> ChangeListener;

    /// Ask the feed to re-query its underlying source ahead of schedule.
    /// Adapters whose set is authoritative in memory ignore this.
    fn rescan(&self) {}
}
