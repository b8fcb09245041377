//! Unified error handling for the daemon.

use thiserror::Error;

/// All possible errors from the Marklock daemon.
#[derive(Debug, Error)]
pub enum Error {
    /// A live-tree operation failed (read, create, move or remove).
    #[error("provider operation failed: {0}")]
    Provider(String),

    /// Persisting or reading the lock flag or snapshot failed. Never
    /// silently defaulted; callers see the failure.
    #[error("storage operation failed: {0}")]
    Storage(String),

    /// The stored snapshot blob could not be decoded.
    #[error(transparent)]
    Snapshot(#[from] marklock_engine::Error),
}

impl Error {
    /// Provider failure with a message.
    pub fn provider(message: impl Into<String>) -> Self {
        Error::Provider(message.into())
    }

    /// Storage failure with a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage(message.into())
    }
}

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, Error>;
