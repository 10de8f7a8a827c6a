//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use triage_engine::{NormalizeContext, PanelSession, SignTable};
use triage_feed::MemoryFeed;
use triage_types::RawDiagnostic;

/// Workspace root used by fixtures so display paths are deterministic.
pub const ROOT: &str = "/workspace";

/// A raw record inside the fixture workspace. `path` is relative to
/// [`ROOT`], `severity` is the wire code (1=error .. 4=hint).
pub fn record(path: &str, line: u32, col: u32, severity: u8, message: &str) -> RawDiagnostic {
    RawDiagnostic::new(
        format!("{ROOT}/{path}"),
        line,
        col,
        severity,
        message,
        "test-lint",
    )
}

/// A small multi-file workspace: two files, mixed severities, deliberately
/// out of source order.
pub fn sample_records() -> Vec<RawDiagnostic> {
    vec![
        record("src/view.rs", 40, 2, 2, "shadowed binding"),
        record("src/app.rs", 3, 1, 1, "undefined variable `ctx`"),
        record("src/view.rs", 12, 4, 1, "unused variable `frame`"),
        record("src/app.rs", 3, 9, 3, "consider renaming"),
    ]
}

/// Feed context pinned to [`ROOT`] with letter-fallback signs.
pub fn context() -> NormalizeContext {
    NormalizeContext::new(ROOT, SignTable::default())
}

/// An open session over an in-memory feed seeded with `records`. Returns
/// both so tests can mutate the feed afterwards.
pub fn open_session(records: Vec<RawDiagnostic>) -> (Arc<MemoryFeed>, PanelSession) {
    let feed = Arc::new(MemoryFeed::with_records(records));
    let session = PanelSession::open(feed.clone(), context());
    (feed, session)
}
