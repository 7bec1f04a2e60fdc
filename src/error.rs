//! Error types for searchlog
//!
//! Errors name the missing resource or the offending value so a failed run
//! can be diagnosed from the message alone.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// searchlog error types
#[derive(Error, Debug)]
pub enum Error {
    /// The history log for an experiment does not exist
    #[error("History file not found: {}\nRun a fresh search with history saving enabled first", path.display())]
    HistoryNotFound {
        /// Expected location of the log file
        path: PathBuf,
    },

    /// A model artifact version does not exist
    #[error("Model version {version} not found: {}", path.display())]
    ModelNotFound {
        /// Requested artifact version (1-based)
        version: usize,
        /// Expected location of the artifact
        path: PathBuf,
    },

    /// History index outside `[-1, len)`
    #[error("History index {index} out of range: the log contains {len} entries")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Number of entries in the log
        len: usize,
    },

    /// Random search requires an explicit iteration count
    #[error("Random search requires an iteration count")]
    MissingIterations,

    /// Malformed parameter space
    #[error("Invalid parameter space: {0}")]
    InvalidParamSpace(String),

    /// Dataset or split is unusable
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Failure reported by the estimator capability
    #[error("Estimator error: {0}")]
    Estimator(String),

    /// Log entries and model artifacts could not be kept in lockstep
    #[error("Inconsistent history: {0}")]
    InconsistentHistory(String),

    /// Worker pool for parallel candidate evaluation could not be built
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// History log (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model artifact (de)serialization error
    #[error("Artifact error: {0}")]
    Artifact(#[from] bincode::Error),
}

impl Error {
    /// True for the not-found family (missing log or missing artifact).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::HistoryNotFound { .. } | Self::ModelNotFound { .. })
    }
}
