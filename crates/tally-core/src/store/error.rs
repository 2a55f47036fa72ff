//! Error types for state persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact exists but does not parse.
    #[error("corrupt {artifact}: {message}")]
    Corrupt {
        artifact: &'static str,
        message: String,
    },

    #[error("cannot serialize {artifact}: {message}")]
    Serialize {
        artifact: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Corrupt state is recoverable: callers treat it as absent.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
