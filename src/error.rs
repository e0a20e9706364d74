//! Error types for skybot.
//!
//! A missing fact or an empty model is a normal result, not an error. The
//! variants here cover configuration mistakes (raised once, at startup) and
//! collaborator I/O, which callers can recover from.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// An append-only store could not be written
    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Prior conversation history could not be read
    #[error("failed to read history from {}: {source}", .path.display())]
    History {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fact snapshot is not valid JSON
    #[error("fact snapshot error: {0}")]
    Facts(#[from] serde_json::Error),
}

impl Error {
    /// Whether the session can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Persistence { .. } | Error::Facts(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
