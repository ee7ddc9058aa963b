//! Configuration
//!
//! Settings are read from a JSON file; a missing file means defaults.
//! Environment variables override individual fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

pub const DB_PATH_ENV: &str = "WRITING_DESK_DB";
pub const LOG_LEVEL_ENV: &str = "WRITING_DESK_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("writing_desk.db"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load settings from `path`; returns defaults if the file is missing
    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map_err(|e| DomainError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Defaults overridden by `WRITING_DESK_DB` / `WRITING_DESK_LOG`
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }

    /// Save settings, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> DomainResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
