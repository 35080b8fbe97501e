//! Error types for the store and provisioning.
//!
//! A missing game is `Ok(None)`, not an error.

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to open database '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{0}")]
    Query(#[from] rusqlite::Error),

    #[error("storage worker failed: {0}")]
    Worker(String),
}

/// Failure during `init-db`
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to prepare '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("could not parse seed file '{}': {source}", path.display())]
    Seed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<rusqlite::Error> for ProvisionError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Query(e))
    }
}
