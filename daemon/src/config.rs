//! Configuration for embedding hosts.

use std::env;
use std::path::PathBuf;

/// Daemon configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the lock flag and snapshot are persisted
    pub storage_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        let storage_path = env::var("MARKLOCK_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("marklock.json"));

        Self { storage_path }
    }
}
