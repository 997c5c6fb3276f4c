//! Pipeline module.
//!
//! This module provides the main analysis pipeline and related components.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder, OFFLINE_SUGGESTIONS_NOTICE};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
