//! Core engine for triage - normalization, grouping, and tree reconciliation.
//!
//! Raw records from a [`triage_feed::DiagnosticFeed`] flow through
//! [`normalize`] into a [`Tree`] of file groups, which a [`PanelSession`]
//! keeps synchronized with the feed while preserving expansion state
//! across refreshes. [`project_group`] and [`project_leaf`] turn tree
//! nodes into styled display lines for the UI layer.

mod app;
mod config;
mod error;
mod normalize;
mod project;
mod session;
mod tree;

pub use app::App;
pub use config::{
    AppConfig, ConfigError, FeedConfig, SignsConfig, TriageConfig, config_path, expand_env_vars,
};
pub use error::MalformedDiagnostic;
pub use normalize::{
    GroupKey, NodeKey, NormalizeContext, NormalizeOutcome, NormalizedDiagnostic, Sign, SignStyle,
    SignTable, normalize,
};
pub use project::{DisplayLine, DisplaySpan, SpanClass, project_group, project_leaf};
pub use session::{CHANGE_BUDGET, FeedStatus, PanelSession, RowRef};
pub use tree::{DiagnosticNode, ExpansionSnapshot, GroupNode, Tree};
