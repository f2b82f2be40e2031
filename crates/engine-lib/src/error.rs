//! Error taxonomy for the engine
//!
//! Every model and registry operation either succeeds or fails with exactly
//! one of these variants. Callers render them; the engine never retries.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the predictive model wrapper
#[derive(Debug, Error)]
pub enum ModelError {
    /// Prediction or save attempted before train/load
    #[error("model is not trained")]
    NotTrained,

    #[error("feature vector has {actual} values, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("training failed: {0}")]
    Training(String),

    #[error("invalid feature vector: {0}")]
    InvalidFeature(String),

    #[error("failed to persist model: {0}")]
    Persistence(String),

    #[error("model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("model artifact {} is corrupt: {reason}", path.display())]
    CorruptArtifact { path: PathBuf, reason: String },
}

/// Failures raised by the directory entry registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("file already exists: {}", .0.display())]
    FileAlreadyExists(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted registry state could not be read or written
    #[error("registry state file {}: {reason}", path.display())]
    StateFile { path: PathBuf, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl RegistryError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Top-level error for the engine context
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to set up metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}
