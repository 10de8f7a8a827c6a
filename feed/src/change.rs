//! Change-notice plumbing between a feed and its subscribers.
//!
//! Notices carry no payload. A subscriber that sees one (or several) pulls
//! the feed once and rebuilds; coalescing happens on the receiving side, so
//! the channel can stay small.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

/// Capacity of each subscriber's notice channel.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Zero-size "something changed" notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice;

/// Receiving end of a feed subscription. Dropping the listener unsubscribes.
#[derive(Debug)]
pub struct ChangeListener {
    rx: mpsc::Receiver<ChangeNotice>,
}

impl ChangeListener {
    pub(crate) fn new(rx: mpsc::Receiver<ChangeNotice>) -> Self {
        Self { rx }
    }

    /// Non-blocking poll for a pending notice.
    ///
    /// Returns `None` when nothing is pending or the feed side is gone; a
    /// dead feed surfaces through `pull`, not here.
    pub fn try_next(&mut self) -> Option<ChangeNotice> {
        match self.rx.try_recv() {
            Ok(notice) => Some(notice),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// Sender side, shared between a feed front and its watcher task.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<mpsc::Sender<ChangeNotice>>>,
}

impl Subscribers {
    pub fn subscribe(&self) -> ChangeListener {
        let (tx, rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        self.lock().push(tx);
        ChangeListener::new(rx)
    }

    /// Send one notice to every live subscriber.
    ///
    /// A full buffer already guarantees a pending notice, so `Full` keeps
    /// the subscriber; only a closed channel drops it.
    pub fn notify(&self) {
        self.lock().retain(|tx| match tx.try_send(ChangeNotice) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Closed(_)) => false,
        });
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<mpsc::Sender<ChangeNotice>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
