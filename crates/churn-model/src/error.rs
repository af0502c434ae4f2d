//! Error types for model loading and inference

use thiserror::Error;

/// Artifact load failure. Disables prediction for the process lifetime.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Artifact file missing or unreadable
    #[error("cannot read model artifact {path}: {source}")]
    Io {
        /// Artifact path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for the format
    #[error("corrupt model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact written by a newer exporter
    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u32),

    /// Artifact columns differ from the model row schema
    #[error("artifact schema mismatch: {0}")]
    Schema(String),

    /// Artifact parameters are inconsistent
    #[error("invalid artifact: {0}")]
    Invalid(String),
}

impl LoadError {
    /// True when the artifact file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Inference failure. Indicates a row/artifact schema mismatch, not a
/// condition to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// Row has a different number of columns than the artifact
    #[error("row has {actual} columns, artifact expects {expected}")]
    RowWidth {
        /// Artifact column count
        expected: usize,
        /// Row column count
        actual: usize,
    },

    /// Category not seen in training and the encoder rejects unknowns
    #[error("unknown category {value:?} for column {column}")]
    UnknownCategory {
        /// Column name
        column: String,
        /// Offending value
        value: String,
    },

    /// Categorical value in a numeric column
    #[error("column {0} expects a number")]
    ExpectedNumber(String),

    /// Numeric value in a categorical column
    #[error("column {0} expects a category")]
    ExpectedCategory(String),

    /// NaN or infinite input or output
    #[error("non-finite value in {0}")]
    NonFinite(String),

    /// Finite probability outside [0, 1]
    #[error("probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    /// Artifact returned no output for the row
    #[error("artifact returned no prediction")]
    EmptyOutput,
}

/// Result type for inference
pub type InferenceResult<T> = Result<T, InferenceError>;
