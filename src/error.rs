use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building, training or persisting a network.
#[derive(Debug, Error)]
pub enum NetError {
    /// A network dimension was zero at construction.
    #[error("invalid dimension: {name} must be positive, got {value}")]
    InvalidDimension { name: &'static str, value: usize },

    /// An input or target vector disagrees with the configured network shape.
    #[error("{what} size mismatch: expected {expected}, received {received}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        received: usize,
    },

    /// The dataset file is missing, too short, or holds a malformed row.
    #[error("failed to load dataset {}: {reason}", path.display())]
    DatasetLoad { path: PathBuf, reason: String },

    /// The run configuration holds a value training cannot use.
    #[error("invalid config: {0}")]
    Config(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    pub(crate) fn mismatch(what: &'static str, expected: usize, received: usize) -> Self {
        NetError::DimensionMismatch { what, expected, received }
    }

    pub(crate) fn dataset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        NetError::DatasetLoad { path: path.into(), reason: reason.into() }
    }
}
