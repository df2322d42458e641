//! Store configuration.
//!
//! Read from `{repo}/config.json`. Every field has a default, so a missing
//! file or a partial file is fine:
//!
//! ```json
//! { "db_file": "strategy.db", "busy_timeout_ms": 5000, "lock_timeout_ms": 10000 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

/// Name of the configuration file inside a repo directory.
pub const CONFIG_FILE: &str = "config.json";

/// Special `db_file` value selecting an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Settings for opening a [`StrategyStore`](crate::storage::StrategyStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file, relative to the repo directory (or absolute).
    pub db_file: String,
    /// How long SQLite waits on a file locked by another process.
    pub busy_timeout_ms: u64,
    /// How long an operation waits for the store's connection before failing.
    pub lock_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_file: "strategy.db".to_string(),
            busy_timeout_ms: 5_000,
            lock_timeout_ms: 10_000,
        }
    }
}

impl StoreConfig {
    /// Configuration for an in-memory store (tests, dry runs).
    pub fn in_memory() -> Self {
        Self {
            db_file: IN_MEMORY.to_string(),
            ..Self::default()
        }
    }

    /// Load `{repo_dir}/config.json`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StrategyError::Serialization` for a malformed file, or
    /// `StrategyError::StorageFailure` if it cannot be read.
    pub fn load(repo_dir: &Path) -> Result<Self> {
        let path = repo_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            StrategyError::Serialization(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Write this configuration to `{repo_dir}/config.json`.
    pub fn save(&self, repo_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(repo_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(repo_dir.join(CONFIG_FILE), json.as_bytes())?;
        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_file == IN_MEMORY
    }

    /// Absolute database path for a repo directory.
    pub fn db_path(&self, repo_dir: &Path) -> PathBuf {
        repo_dir.join(&self.db_file)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
