//! Error types for the distill library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for distillation operations.
#[derive(Debug, Error)]
pub enum DistillError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error reading from or writing to a stream.
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// No annotation format is registered under the requested tag.
    #[error("Annotation format not found: {0}")]
    FormatNotFound(String),

    /// A tag was registered again with different attributes.
    #[error("Annotation format '{0}' is already registered with different attributes")]
    DuplicateFormat(String),

    /// Annotation content could not be decoded with the format's charset.
    #[error("Encoding error for format '{format}': {message}")]
    Encoding { format: String, message: String },

    /// Malformed graph or ruleset resource.
    #[error("Syntax error in '{resource}' at line {line}: {message}")]
    Syntax {
        resource: String,
        line: usize,
        message: String,
    },

    /// A rule that cannot be evaluated safely.
    #[error("Invalid rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },

    /// The inference capability failed or broke its contract.
    #[error("Inference failure: {0}")]
    Inference(String),

    /// Evaluation was stopped before reaching a fixpoint.
    #[error(
        "Inference budget exceeded ({limit}) after {iterations} iterations and {statements} statements"
    )]
    BudgetExceeded {
        limit: String,
        iterations: usize,
        statements: usize,
    },

    /// Evaluation was cancelled by the caller.
    #[error("Inference cancelled")]
    Cancelled,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DistillError {
    /// Whether this error originates from rule evaluation.
    ///
    /// Callers processing documents in bulk use this to tell a bad
    /// document/ruleset combination apart from an I/O or setup problem.
    pub fn is_inference_failure(&self) -> bool {
        matches!(
            self,
            DistillError::InvalidRule { .. }
                | DistillError::Inference(_)
                | DistillError::BudgetExceeded { .. }
                | DistillError::Cancelled
        )
    }
}

/// Result type alias for distillation operations.
pub type Result<T> = std::result::Result<T, DistillError>;
