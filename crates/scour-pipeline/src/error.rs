//! Custom error types for the profiling and cleaning pipeline.
//!
//! This module provides the crate-wide error hierarchy using `thiserror`.
//! Errors serialize as `{code, message}` structs so they can be rendered
//! as structured output alongside analysis results.
//!
//! Note that generation-service failures are deliberately *not* represented
//! here: the generation boundary folds every failure into a user-readable
//! string (see [`crate::ai::GenerationFailure`]), so a misbehaving backend
//! can never abort an analysis.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input file could not be read or parsed as a dataset.
    #[error("Failed to load dataset from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// The dataset has no columns, so there is nothing to profile or clean.
    #[error("Dataset has no columns")]
    EmptyDataset,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset profiling failed.
    #[error("Failed to profile dataset: {0}")]
    ProfilingFailed(String),

    /// Row sampling failed.
    #[error("Failed to sample dataset: {0}")]
    SamplingFailed(String),

    /// The baseline null/duplicate scan failed.
    #[error("Failed to run baseline checks: {0}")]
    BaselineCheckFailed(String),

    /// Data cleaning failed.
    #[error("Failed to clean data: {0}")]
    CleaningFailed(String),

    /// The cleaned artifact could not be written.
    #[error("Failed to write cleaned artifact: {0}")]
    ArtifactWrite(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable code identifying the error class.
    ///
    /// Callers consuming structured output can dispatch on these codes
    /// instead of parsing the human-readable message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ProfilingFailed(_) => "PROFILING_FAILED",
            Self::SamplingFailed(_) => "SAMPLING_FAILED",
            Self::BaselineCheckFailed(_) => "BASELINE_CHECK_FAILED",
            Self::CleaningFailed(_) => "CLEANING_FAILED",
            Self::ArtifactWrite(_) => "ARTIFACT_WRITE_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is recoverable by the caller (bad input or
    /// configuration rather than a fundamental failure).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LoadFailed { .. } | Self::EmptyDataset | Self::InvalidConfig(_)
        )
    }
}

/// Errors are serialized as a struct with `code` and `message` fields,
/// making them easy to handle for consumers of `--json-output`.
impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}
