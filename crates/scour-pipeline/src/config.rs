//! Configuration types for the analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemma:2b";

/// Default hard timeout for one generation call, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Default maximum number of rows included in the prompt sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Default seed for the row sampler.
pub const DEFAULT_SAMPLE_SEED: u64 = 0;

/// Configuration for the analysis pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use scour_pipeline::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .model("llama3:8b")
///     .timeout_seconds(60)
///     .sample_size(25)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model identifier passed to the generation backend.
    /// Default: "gemma:2b"
    pub model: String,

    /// Hard timeout for one generation call, in seconds.
    /// Default: 120
    pub timeout_seconds: u64,

    /// Maximum number of rows drawn into the prompt sample.
    /// Smaller datasets are included whole.
    /// Default: 50
    pub sample_size: usize,

    /// Seed for the row sampler. The same dataset and seed always produce
    /// the same sample.
    /// Default: 0
    pub sample_seed: u64,

    /// Whether to call the generation backend during analysis.
    /// When false, the suggestions section carries a fixed offline notice
    /// instead of model output.
    /// Default: true
    pub enable_generation: bool,

    /// Directory for cleaned CSV artifacts.
    /// If None, artifacts are written to the system temp directory.
    /// Default: None
    pub artifact_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_seed: DEFAULT_SAMPLE_SEED,
            enable_generation: true,
            artifact_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Generation timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModel);
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(self.timeout_seconds));
        }

        if self.sample_size == 0 {
            return Err(ConfigValidationError::InvalidSampleSize(self.sample_size));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Model name must not be empty")]
    EmptyModel,

    #[error("Invalid timeout: {0}s (must be at least 1 second)")]
    InvalidTimeout(u64),

    #[error("Invalid sample size: {0} (must be at least 1)")]
    InvalidSampleSize(usize),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    model: Option<String>,
    timeout_seconds: Option<u64>,
    sample_size: Option<usize>,
    sample_seed: Option<u64>,
    enable_generation: Option<bool>,
    artifact_dir: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    /// Set the model identifier passed to the generation backend.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the hard timeout for one generation call, in seconds.
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the maximum number of rows drawn into the prompt sample.
    ///
    /// Datasets with fewer rows are included whole.
    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Set the seed for the row sampler.
    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Enable or disable the generation call during analysis.
    ///
    /// When disabled, the suggestions section carries a fixed offline
    /// notice instead of model output.
    pub fn enable_generation(mut self, enable: bool) -> Self {
        self.enable_generation = Some(enable);
        self
    }

    /// Set the directory for cleaned CSV artifacts.
    ///
    /// If not set, artifacts land in the system temp directory.
    pub fn artifact_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_seconds: self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            sample_size: self.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            sample_seed: self.sample_seed.unwrap_or(DEFAULT_SAMPLE_SEED),
            enable_generation: self.enable_generation.unwrap_or(true),
            artifact_dir: self.artifact_dir,
        };

        config.validate()?;
        Ok(config)
    }
}
