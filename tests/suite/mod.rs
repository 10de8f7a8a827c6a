//! Integration test modules.

mod config;
#[cfg(unix)]
mod feed;
mod ordering;
mod reconcile;
mod session;
