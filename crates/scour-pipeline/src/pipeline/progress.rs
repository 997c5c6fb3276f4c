//! Progress reporting for the analysis pipeline.
//!
//! This module provides types for observing pipeline progress from another
//! thread (e.g., a status line or UI progress bar).
//!
//! # Example
//!
//! ```rust,ignore
//! use scour_pipeline::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze(&df);
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the pipeline.
///
/// The analysis stages (`Profiling` through `Generating`) partition one
/// analysis run; their weights sum to 1.0. `Cleaning` belongs to the
/// standalone cleaning operation and spans the full progress bar on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Profiling the dataset and drawing the row sample
    Profiling,
    /// Scanning for baseline quality issues (nulls, duplicate rows)
    BaselineCheck,
    /// Waiting on the generation backend for cleaning suggestions
    Generating,
    /// Cleaning the dataset (trim, retype, dedupe)
    Cleaning,
    /// Operation completed successfully
    Complete,
    /// Operation failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Profiling => "Profiling Dataset",
            Self::BaselineCheck => "Scanning Baseline Quality",
            Self::Generating => "Generating Suggestions",
            Self::Cleaning => "Cleaning Data",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the weight of this stage within its operation (0.0 - 1.0).
    ///
    /// Generation dominates the analysis run because the model call is where
    /// nearly all wall-clock time goes.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Profiling => 0.15,
            Self::BaselineCheck => 0.10,
            Self::Generating => 0.75,
            Self::Cleaning => 1.0,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Profiling => 0.0,
            Self::BaselineCheck => 0.15,
            Self::Generating => 0.25,
            Self::Cleaning => 0.0,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update emitted by the pipeline.
///
/// Carries the current stage, overall and stage-local progress, an optional
/// sub-stage label (e.g., "Model: gemma:2b"), and a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,

    /// Optional sub-stage description (e.g., "Model: gemma:2b")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress within the running operation (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without sub-stage info.
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a new progress update with sub-stage information.
    pub fn with_sub_stage(
        stage: PipelineStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: Some(sub_stage.into()),
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            sub_stage: None,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            sub_stage: None,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` to allow cross-thread usage:
/// the pipeline typically runs on a background thread while updates are
/// rendered elsewhere.
pub trait ProgressReporter: Send + Sync {
    /// Called when progress is made during an operation.
    ///
    /// Implementations should be efficient and non-blocking; a slow reporter
    /// stalls the pipeline.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
///
/// # Example
///
/// ```rust,ignore
/// use scour_pipeline::Pipeline;
///
/// Pipeline::builder()
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .analyze(&df);
/// ```
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

// Static assertions for thread safety - updates cross the boundary between
// the pipeline thread and whatever renders them
static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
