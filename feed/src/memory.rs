//! In-memory diagnostic feed for tests and demos.

use std::sync::{Mutex, MutexGuard, PoisonError};

use triage_types::RawDiagnostic;

use crate::DiagnosticFeed;
use crate::change::{ChangeListener, Subscribers};
use crate::error::FeedError;

/// A feed whose set is mutated explicitly by its owner.
///
/// Every mutation counts as a change and notifies subscribers; the owner
/// decides when the set actually changed.
#[derive(Debug, Default)]
pub struct MemoryFeed {
    state: Mutex<MemoryState>,
    subscribers: Subscribers,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<RawDiagnostic>,
    /// When set, pulls fail with this reason until the next `set_records`.
    failure: Option<String>,
}

impl MemoryFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: Vec<RawDiagnostic>) -> Self {
        let feed = Self::new();
        feed.lock().records = records;
        feed
    }

    /// Replace the whole set, clear any injected failure, notify.
    pub fn set_records(&self, records: Vec<RawDiagnostic>) {
        {
            let mut state = self.lock();
            state.records = records;
            state.failure = None;
        }
        self.subscribers.notify();
    }

    /// Make every following pull fail, and notify so consumers try one.
    pub fn fail_with(&self, reason: &str) {
        self.lock().failure = Some(reason.to_string());
        self.subscribers.notify();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticFeed for MemoryFeed {
    fn pull(&self) -> Result<Vec<RawDiagnostic>, FeedError> {
        let state = self.lock();
        match &state.failure {
            Some(reason) => Err(FeedError::Unavailable(reason.clone())),
            None => Ok(state.records.clone()),
        }
    }

    fn subscribe(&self) -> ChangeListener {
        self.subscribers.subscribe()
    }
}
