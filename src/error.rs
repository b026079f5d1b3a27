//! Error types for the quality assessment engine.
//!
//! The engine recovers locally where the contract allows it: a failure
//! profiling one column skips that column, and an empty dataset
//! short-circuits to a degenerate report instead of surfacing an error.
//! Anything else is fatal to the invocation: the engine never returns a
//! partially populated report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for quality analysis.
#[derive(Error, Debug)]
pub enum QualityError {
    /// Dataset has zero rows or zero columns. Callers of the engine never
    /// see this: the orchestrator converts it into a degenerate report.
    #[error("Dataset is empty (zero rows or zero columns)")]
    EmptyDataset,

    /// Profiling a single column failed. Recovered locally; the column is
    /// omitted and processing continues.
    #[error("Failed to profile column '{column}': {reason}")]
    ColumnProfiling { column: String, reason: String },

    /// Invalid analysis options or detector configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QualityError {
    /// Stable error code for API consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::ColumnProfiling { .. } => "COLUMN_PROFILING_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Json(_) => "JSON_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Whether the engine recovers from this error without failing the
    /// whole invocation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyDataset | Self::ColumnProfiling { .. })
    }
}

/// Errors serialize as a `code` + `message` pair.
impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality analysis operations.
pub type Result<T> = std::result::Result<T, QualityError>;
