//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the profile, baseline scan, generation, and cleaning
//! workflow.

use crate::ai::{GenerationClient, GenerationProvider, OllamaCliProvider};
use crate::cleaner::DataCleaner;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::prompt::PromptAssembler;
use crate::quality::BaselineChecker;
use crate::sampler::RowSampler;
use crate::types::{AnalysisResult, CleanOutcome, CleanedArtifact};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Stand-in suggestions text when the generation call is disabled.
pub const OFFLINE_SUGGESTIONS_NOTICE: &str = "Generation disabled; no suggestions requested.";

/// The main analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// use scour_pipeline::{Pipeline, PipelineConfig};
/// use scour_pipeline::ai::OllamaCliProvider;
/// use std::sync::Arc;
///
/// // With an explicit provider and progress reporting
/// let provider = Arc::new(OllamaCliProvider::new());
///
/// let result = Pipeline::builder()
///     .provider(provider)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .config(PipelineConfig::default())
///     .build()?
///     .analyze(&dataframe)?;
///
/// // Without the model call (offline)
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().enable_generation(false).build()?)
///     .build()?
///     .analyze(&dataframe)?;
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    provider: Arc<dyn GenerationProvider>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure Pipeline is Send (can be moved to another thread)
// This matters when the analysis runs in a background task under a UI
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Analyze a DataFrame: profile, baseline scan, then (unless disabled)
    /// one generation call for cleaning suggestions.
    ///
    /// Generation failures never abort the run: they appear as `"ERROR: ..."`
    /// text in the suggestions section of the result.
    ///
    /// # Errors
    ///
    /// Returns an error when the dataset has no columns or when a local
    /// stage (profiling, sampling, baseline scan) fails.
    pub fn analyze(&self, df: &DataFrame) -> Result<AnalysisResult> {
        match self.analyze_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Analysis complete"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Analysis error: {}", e);
                Err(e)
            }
        }
    }

    /// Assemble the exact prompt an analysis run would send, without
    /// calling the generation backend.
    pub fn build_prompt(&self, df: &DataFrame) -> Result<String> {
        if df.width() == 0 {
            return Err(PipelineError::EmptyDataset);
        }
        let digest = DataProfiler::profile_dataset(df)
            .map_err(|e| PipelineError::ProfilingFailed(e.to_string()))?;
        let sample = RowSampler::sample(df, self.config.sample_size, self.config.sample_seed)
            .map_err(|e| PipelineError::SamplingFailed(e.to_string()))?;
        Ok(PromptAssembler::assemble(
            &digest,
            &sample,
            self.config.sample_size,
        ))
    }

    /// Clean a dataset and persist the result as a CSV artifact.
    ///
    /// `dataset` is optional on purpose: a caller that has not loaded
    /// anything yet passes `None` and gets [`CleanOutcome::NothingToClean`]
    /// back instead of an error.
    pub fn clean(
        &self,
        dataset: Option<&DataFrame>,
        source_name: Option<&str>,
    ) -> Result<CleanOutcome> {
        let Some(df) = dataset else {
            info!("Nothing to clean yet; no dataset supplied");
            return Ok(CleanOutcome::NothingToClean);
        };

        match self.clean_internal(df, source_name) {
            Ok(artifact) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaned dataset written to {}",
                    artifact.path.display()
                )));
                Ok(CleanOutcome::Cleaned(artifact))
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Cleaning error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn analyze_internal(&self, df: &DataFrame) -> Result<AnalysisResult> {
        let start_time = Instant::now();

        if df.width() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        info!(
            rows = df.height(),
            columns = df.width(),
            "Starting analysis..."
        );

        // Step 1: Profile the dataset and draw the prompt sample
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Profiling,
            0.0,
            "Profiling dataset...",
        ));
        info!("Step 1: Profiling dataset...");

        let digest = DataProfiler::profile_dataset(df)
            .map_err(|e| PipelineError::ProfilingFailed(e.to_string()))?;
        debug!("Digest:\n{}", digest.render());

        let sample = RowSampler::sample(df, self.config.sample_size, self.config.sample_seed)
            .map_err(|e| PipelineError::SamplingFailed(e.to_string()))?;
        debug!(sample_rows = sample.height(), "Sample drawn");

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Profiling,
            1.0,
            "Profiling complete",
        ));

        // Step 2: Baseline quality scan
        self.report_progress(ProgressUpdate::new(
            PipelineStage::BaselineCheck,
            0.0,
            "Scanning for baseline issues...",
        ));
        info!("Step 2: Scanning for baseline issues...");

        let baseline = BaselineChecker::scan(df)
            .map_err(|e| PipelineError::BaselineCheckFailed(e.to_string()))?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::BaselineCheck,
            1.0,
            baseline.render(),
        ));

        // Step 3: One generation call for cleaning suggestions
        let prompt = PromptAssembler::assemble(&digest, &sample, self.config.sample_size);
        let suggestions = if self.config.enable_generation {
            self.report_progress(ProgressUpdate::with_sub_stage(
                PipelineStage::Generating,
                format!("Model: {}", self.config.model),
                0.0,
                "Requesting cleaning suggestions...",
            ));
            info!(
                model = %self.config.model,
                provider = self.provider.name(),
                "Step 3: Requesting cleaning suggestions..."
            );

            let text = GenerationClient::generate_text(
                self.provider.as_ref(),
                &prompt,
                &self.config.model,
                self.config.timeout(),
            );

            self.report_progress(ProgressUpdate::new(
                PipelineStage::Generating,
                1.0,
                "Suggestions received",
            ));
            text
        } else {
            info!("Step 3: Generation disabled; skipping model call");
            OFFLINE_SUGGESTIONS_NOTICE.to_string()
        };

        let elapsed = start_time.elapsed().as_secs_f64();
        info!(elapsed_seconds = elapsed, "Analysis finished");

        Ok(AnalysisResult::new(digest, baseline, suggestions, elapsed))
    }

    fn clean_internal(&self, df: &DataFrame, source_name: Option<&str>) -> Result<CleanedArtifact> {
        if df.width() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.0,
            "Cleaning dataset...",
        ));
        info!("Cleaning dataset...");

        let rows_before = df.height();
        let (mut cleaned, actions) =
            DataCleaner::clean(df).map_err(|e| PipelineError::CleaningFailed(e.to_string()))?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.9,
            "Writing cleaned artifact...",
        ));

        let path = DataCleaner::write_artifact(
            &mut cleaned,
            source_name,
            self.config.artifact_dir.as_deref(),
        )
        .map_err(|e| PipelineError::ArtifactWrite(e.to_string()))?;

        info!(
            path = %path.display(),
            rows_before,
            rows_after = cleaned.height(),
            "Cleaned artifact written"
        );

        Ok(CleanedArtifact {
            path,
            rows_before,
            rows_after: cleaned.height(),
            columns: cleaned.width(),
            actions,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
///
/// # Example
///
/// ```rust,ignore
/// use scour_pipeline::{Pipeline, PipelineConfig};
///
/// let pipeline = Pipeline::builder()
///     .config(PipelineConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    provider: Option<Arc<dyn GenerationProvider>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the generation provider.
    ///
    /// The provider must implement the [`GenerationProvider`] trait. Use
    /// `Arc` to allow the provider to be shared and reused across multiple
    /// pipeline runs. If not set, the pipeline shells out to the local
    /// `ollama` binary.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use scour_pipeline::ai::OllamaHttpProvider;
    /// use std::sync::Arc;
    ///
    /// let provider = Arc::new(OllamaHttpProvider::from_env()?);
    ///
    /// let pipeline = Pipeline::builder()
    ///     .provider(provider)
    ///     .build()?;
    /// ```
    pub fn provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// Use this when you need a custom reporter implementation, such as an
    /// event-emitting bridge to a UI.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use scour_pipeline::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling. For more
    /// complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            provider: self
                .provider
                .unwrap_or_else(|| Arc::new(OllamaCliProvider::new())),
            progress_reporter: self.progress_reporter,
        })
    }
}
