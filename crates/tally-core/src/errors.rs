//! Error types for snapshot input, configuration and the updater.
//!
//! A gate rejection is not an error: it is one of the normal
//! [`UpdateOutcome`](crate::updater::UpdateOutcome)s.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while obtaining the candidate snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("metrics snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read metrics snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics snapshot {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl SnapshotError {
    /// True when there is no snapshot to evaluate at all.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Read { .. })
    }
}

/// Errors raised while loading `tally.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Fatal failures of a baseline update run.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// No candidate snapshot could be obtained.
    #[error("no metrics available: {0}")]
    MissingInput(#[source] SnapshotError),

    /// The snapshot exists but cannot be used.
    #[error("unusable metrics snapshot: {0}")]
    InvalidInput(#[source] SnapshotError),

    /// Writing state failed. Nothing is retried; a CI re-run is the retry.
    #[error("failed to persist {artifact}: {source}")]
    Persistence {
        artifact: &'static str,
        #[source]
        source: StoreError,
    },

    /// Reading state failed for a reason other than corruption.
    #[error("failed to load {artifact}: {source}")]
    Load {
        artifact: &'static str,
        #[source]
        source: StoreError,
    },
}

impl From<SnapshotError> for UpdateError {
    fn from(e: SnapshotError) -> Self {
        if e.is_missing() {
            UpdateError::MissingInput(e)
        } else {
            UpdateError::InvalidInput(e)
        }
    }
}

impl UpdateError {
    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingInput(_) | Self::InvalidInput(_) => 2,
            Self::Persistence { .. } | Self::Load { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_errors_classify_into_update_errors() {
        let missing: UpdateError = SnapshotError::NotFound {
            path: PathBuf::from("metrics.json"),
        }
        .into();
        assert!(matches!(missing, UpdateError::MissingInput(_)));
        assert_eq!(missing.exit_code(), 2);

        let invalid: UpdateError = SnapshotError::Parse {
            path: PathBuf::from("metrics.json"),
            message: "expected value".into(),
        }
        .into();
        assert!(matches!(invalid, UpdateError::InvalidInput(_)));
        assert!(invalid.to_string().contains("metrics.json"));
    }

    #[test]
    fn test_persistence_failure_exit_code() {
        let err = UpdateError::Persistence {
            artifact: "baseline",
            source: StoreError::Io {
                path: PathBuf::from(".tally/baseline.json"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("failed to persist baseline"));
    }
}
