use serde::Deserialize;
use std::time::Duration;
use std::{env, path::PathBuf};

use triage_types::Severity;

use crate::normalize::SignTable;

const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Default, Deserialize)]
pub struct TriageConfig {
    pub app: Option<AppConfig>,
    pub feed: Option<FeedConfig>,
    pub signs: Option<SignsConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for toggles and signs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable the animated refresh indicator.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Workspace root for shortening paths. Defaults to the current
    /// directory. Supports `${VAR}` expansion.
    pub root: Option<String>,
}

/// Diagnostic feed configuration.
///
/// ```toml
/// [feed]
/// command = "luacheck"
/// args = ["--formatter", "json_lines", "."]
/// poll_interval_ms = 2000
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FeedConfig {
    /// Program emitting one JSON diagnostic per stdout line.
    /// Supports `${VAR}` expansion.
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Milliseconds between scans. Default: 2000.
    pub poll_interval_ms: Option<u64>,
}

impl FeedConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }
}

/// Sign glyph overrides per severity.
///
/// ```toml
/// [signs]
/// error = "✖"
/// warn = "▲"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SignsConfig {
    pub error: Option<String>,
    pub warn: Option<String>,
    pub info: Option<String>,
    pub hint: Option<String>,
}

impl SignsConfig {
    /// Builds a sign table from the configured glyphs. Severities left
    /// unset keep the letter fallback.
    #[must_use]
    pub fn sign_table(&self) -> SignTable {
        let mut table = SignTable::new();
        let overrides = [
            (Severity::Error, self.error.as_deref()),
            (Severity::Warn, self.warn.as_deref()),
            (Severity::Info, self.info.as_deref()),
            (Severity::Hint, self.hint.as_deref()),
        ];
        for (severity, glyph) in overrides {
            if let Some(glyph) = glyph {
                table.register(severity, glyph);
            }
        }
        table
    }
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < value.len() {
        if value[i..].starts_with("${") {
            let start = i + 2;
            if let Some(end_rel) = value[start..].find('}') {
                let end = start + end_rel;
                let var = &value[start..end];
                if !var.is_empty() {
                    let replacement = env::var(var).unwrap_or_default();
                    out.push_str(&replacement);
                }
                i = end + 1;
                continue;
            }
        }

        let ch = value[i..].chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

impl TriageConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".triage").join("config.toml"))
}
