//! LLM-Assisted CSV Cleaning Pipeline
//!
//! A Polars-based library that profiles tabular datasets, scans them for
//! baseline quality issues, asks a locally hosted LLM for cleaning
//! suggestions, and applies a deterministic cleanup pass.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Data Profiling**: Per-column digests (dtype, null/unique counts, ranges, examples)
//! - **Row Sampling**: Seeded, reproducible samples for prompt context
//! - **Baseline Checks**: Fast null and duplicate-row scans independent of the model
//! - **LLM Suggestions**: One-shot advice from a local ollama model, with every
//!   failure folded into readable `"ERROR: ..."` text instead of aborting
//! - **Deterministic Cleaning**: Whitespace trimming, conservative numeric and
//!   datetime reinterpretation, duplicate removal, CSV artifact output
//! - **Synthetic Data**: A seeded noisy-CSV generator for exercising the pipeline
//! - **Progress Reporting**: Stage-by-stage updates for UIs and status lines
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scour_pipeline::{Pipeline, PipelineConfig};
//! use polars::prelude::*;
//!
//! // Load data
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! // Option 1: Full analysis with progress reporting
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze(&df)?;
//!
//! println!("{}", result.text);
//!
//! // Option 2: Offline (no model call)
//! let config = PipelineConfig::builder()
//!     .enable_generation(false)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .build()?
//!     .analyze(&df)?;
//!
//! // Clean and persist an artifact
//! let outcome = Pipeline::builder()
//!     .build()?
//!     .clean(Some(&df), Some("data.csv"))?;
//! println!("Cleaned file: {:?}", outcome.path());
//! ```
//!
//! # Generation Backends
//!
//! The library reaches the model through the [`ai::GenerationProvider`]
//! trait. Currently implemented backends:
//!
//! - [`ai::OllamaCliProvider`] - shells out to the local `ollama` binary
//! - [`ai::OllamaHttpProvider`] - calls a running ollama server over REST
//!   (requires the `http` feature)
//!
//! To implement your own backend, see the [`ai`] module documentation.
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to customize pipeline behavior:
//!
//! ```rust,ignore
//! use scour_pipeline::config::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .model("gemma:2b")          // ollama model id
//!     .timeout_seconds(120)       // hard cap on the generation call
//!     .sample_size(50)            // rows quoted in the prompt
//!     .sample_seed(0)             // reproducible sampling
//!     .enable_generation(true)
//!     .build()?;
//! ```
//!
//! # Progress Reporting
//!
//! The pipeline reports each stage as it runs:
//!
//! ```rust,ignore
//! use scour_pipeline::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .analyze(&df);
//!
//! match result {
//!     Ok(result) => println!("{}", result.text),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

// Core modules
pub mod ai;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod profiler;
pub mod prompt;
pub mod quality;
pub mod sampler;
pub mod synth;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::DataCleaner;
pub use config::{
    ConfigValidationError, DEFAULT_MODEL, DEFAULT_SAMPLE_SEED, DEFAULT_SAMPLE_SIZE,
    DEFAULT_TIMEOUT_SECONDS, PipelineConfig, PipelineConfigBuilder,
};
pub use error::{PipelineError, Result as PipelineResult, ResultExt};
pub use pipeline::{
    ClosureProgressReporter, OFFLINE_SUGGESTIONS_NOTICE, Pipeline, PipelineBuilder, PipelineStage,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use prompt::PromptAssembler;
pub use quality::BaselineChecker;
pub use sampler::RowSampler;
pub use synth::{NoisyDataGenerator, NoisyRow};
pub use types::{
    AnalysisResult, BaselineReport, CleanOutcome, CleanedArtifact, ColumnDigest, DatasetDigest,
};
pub use utils::{clean_numeric_string, parse_datetime_string, stringify_cell};
