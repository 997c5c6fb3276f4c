//! CLI entry point for the CSV cleaning pipeline.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use scour_pipeline::ai::{GenerationProvider, OllamaCliProvider};
use scour_pipeline::{
    AnalysisResult, BaselineChecker, CleanOutcome, DataProfiler, Pipeline, PipelineConfig,
    PipelineError,
};

#[cfg(feature = "http")]
use scour_pipeline::ai::OllamaHttpProvider;
#[cfg(not(feature = "http"))]
use tracing::warn;

/// Generation backend selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Shell out to the `ollama` binary on PATH
    Cli,
    /// POST to a running ollama server (requires the "http" feature)
    Http,
}

#[derive(Parser, Debug)]
#[command(
    author = "Scour Team",
    version,
    about = "LLM-Assisted CSV Cleaning Pipeline",
    long_about = "Profile a CSV, scan it for baseline quality problems, and ask a local\n\
                  ollama model for cleaning suggestions. Optionally write a cleaned copy\n\
                  with whitespace trimmed, numeric and date columns coerced, and exact\n\
                  duplicate rows dropped.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OLLAMA_HOST    Base URL for the HTTP backend (default: http://localhost:11434)\n  \
                  RUST_LOG       Log filter override (e.g. scour_pipeline=debug)\n\n\
                  EXAMPLES:\n  \
                  # Analyze with the default local model\n  \
                  scour-pipeline data.csv\n\n  \
                  # Bigger model, longer timeout\n  \
                  scour-pipeline data.csv --model llama3:8b --timeout 300\n\n  \
                  # Skip the model call, keep the offline stages\n  \
                  scour-pipeline data.csv --offline\n\n  \
                  # Preview the digest and prompt without calling the model\n  \
                  scour-pipeline data.csv --dry-run\n\n  \
                  # Also write a cleaned copy into a chosen directory\n  \
                  scour-pipeline data.csv --clean --artifact-dir out/"
)]
struct Args {
    /// Path to the CSV file to analyze
    input: String,

    /// Ollama model to request suggestions from
    #[arg(short, long, default_value = scour_pipeline::DEFAULT_MODEL)]
    model: String,

    /// Generation timeout in seconds
    #[arg(short, long, default_value_t = scour_pipeline::DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,

    /// Maximum number of rows quoted verbatim in the prompt
    #[arg(long, default_value_t = scour_pipeline::DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Seed for the row sampler
    #[arg(long, default_value_t = scour_pipeline::DEFAULT_SAMPLE_SEED)]
    sample_seed: u64,

    /// Generation backend to use
    #[arg(short, long, value_enum, default_value = "cli")]
    backend: Backend,

    /// Skip the model call; the result still carries the baseline scan
    #[arg(long)]
    offline: bool,

    /// Show the digest, baseline scan and assembled prompt without calling the model
    #[arg(long)]
    dry_run: bool,

    /// Also write a cleaned copy of the dataset
    #[arg(short, long)]
    clean: bool,

    /// Directory for the cleaned artifact
    ///
    /// If not set, the artifact lands in the system temp directory.
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Logs move to stderr so stdout stays valid JSON:
    /// `... --json-output | jq .baseline`
    #[arg(long)]
    json_output: bool,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logs are routed to stderr so that stdout
/// carries nothing but the JSON payload.
fn init_logging(quiet: bool, verbose: bool, json_output: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json_output {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    init_logging(args.quiet, args.verbose, args.json_output);

    // Load environment variables from .env file (OLLAMA_HOST for the HTTP backend)
    dotenv().ok();

    // Validate input file exists
    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let mut config_builder = PipelineConfig::builder()
        .model(&args.model)
        .timeout_seconds(args.timeout)
        .sample_size(args.sample_size)
        .sample_seed(args.sample_seed)
        .enable_generation(!args.offline);

    if let Some(ref dir) = args.artifact_dir {
        config_builder = config_builder.artifact_dir(dir);
    }

    let config = config_builder.build()?;

    // Handle dry-run mode
    if args.dry_run {
        return run_dry_run(&args, &data, config);
    }

    let pipeline = build_pipeline(&args, config)?;
    run_analysis(pipeline, &args, data)
}

/// Build the pipeline for the selected backend.
fn build_pipeline(args: &Args, config: PipelineConfig) -> Result<Pipeline> {
    let provider = make_provider(args.backend)?;
    info!("Using generation backend: {}", provider.name());

    let mut builder = Pipeline::builder().config(config).provider(provider);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

#[cfg(feature = "http")]
fn make_provider(backend: Backend) -> Result<Arc<dyn GenerationProvider>> {
    match backend {
        Backend::Cli => Ok(Arc::new(OllamaCliProvider::new())),
        Backend::Http => Ok(Arc::new(OllamaHttpProvider::from_env()?)),
    }
}

/// Fallback when the "http" feature is not compiled in.
#[cfg(not(feature = "http"))]
fn make_provider(backend: Backend) -> Result<Arc<dyn GenerationProvider>> {
    if backend == Backend::Http {
        warn!("HTTP backend not compiled in. Falling back to the ollama CLI.");
        warn!("Compile with --features http to enable it.");
    }
    Ok(Arc::new(OllamaCliProvider::new()))
}

/// Run dry-run mode - show the digest and prompt without calling the model.
///
/// Note: This function uses `println!` intentionally for user-facing CLI
/// output. Unlike logging (`info!`, `debug!`), this output should always be
/// visible regardless of log level settings since it's the primary purpose
/// of --dry-run.
fn run_dry_run(args: &Args, data: &DataFrame, config: PipelineConfig) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Prompt preview, no model call");
    println!("{}\n", "=".repeat(80));

    // 1. Dataset overview
    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", data.height());
    println!("  Columns: {}", data.width());
    println!();

    // 2. Per-column digest
    println!("COLUMN DIGEST");
    println!("{}", "-".repeat(40));

    let digest = DataProfiler::profile_dataset(data)?;

    println!(
        "{:<20} {:<10} {:>8} {:>8}  {}",
        "Column", "Type", "Nulls", "Unique", "Examples"
    );
    println!("{}", "-".repeat(70));

    for col in &digest.column_digests {
        let unique = col
            .unique_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<20} {:<10} {:>8} {:>8}  {}",
            truncate_str(&col.name, 19),
            truncate_str(&col.dtype, 9),
            col.null_count,
            unique,
            truncate_str(&col.examples.join(", "), 40),
        );
    }
    println!();

    // 3. Baseline scan
    println!("BASELINE SCAN");
    println!("{}", "-".repeat(40));
    let baseline = BaselineChecker::scan(data)?;
    println!("  {}", baseline.render());
    println!();

    // 4. The prompt that would be sent
    let pipeline = Pipeline::builder().config(config).build()?;
    let prompt = pipeline.build_prompt(data)?;

    println!("ASSEMBLED PROMPT ({} chars)", prompt.len());
    println!("{}", "-".repeat(40));
    println!("{}", prompt);
    println!();

    println!("{}", "=".repeat(80));
    println!("To send this prompt to the model, run without --dry-run");
    if !args.clean {
        println!("Add --clean to also write a cleaned copy of the dataset");
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

/// Run the analysis (and optionally the cleaner) and print results.
fn run_analysis(pipeline: Pipeline, args: &Args, data: DataFrame) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting analysis pipeline...");
    info!("{}", "=".repeat(80));

    let result = match pipeline.analyze(&data) {
        Ok(result) => result,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    let outcome = if args.clean {
        match pipeline.clean(Some(&data), Some(&args.input)) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("Cleaning failed: {}", e);
                return Err(anyhow!("Cleaning failed: {}", e));
            }
        }
    } else {
        None
    };

    handle_output(&result, outcome.as_ref(), args, &data)
}

/// Print results based on CLI flags.
///
/// Output behavior:
/// - Default: human-readable summary on stdout
/// - `--json-output`: JSON on stdout only (logs were routed to stderr)
fn handle_output(
    result: &AnalysisResult,
    outcome: Option<&CleanOutcome>,
    args: &Args,
    data: &DataFrame,
) -> Result<()> {
    if args.json_output {
        let payload = match outcome {
            Some(outcome) => serde_json::json!({ "analysis": result, "clean": outcome }),
            None => serde_json::to_value(result)?,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_analysis_summary(result, args, data);
    if let Some(outcome) = outcome {
        print_clean_summary(outcome);
    }

    Ok(())
}

/// Print the human-readable analysis summary (default output mode).
fn print_analysis_summary(result: &AnalysisResult, args: &Args, data: &DataFrame) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input: {} ({} rows x {} columns)",
        args.input,
        data.height(),
        data.width()
    );
    println!();

    println!("{}", result.text);
    println!();

    println!("Use --json-output for machine-readable output");
    if !args.clean {
        println!("Add --clean to write a cleaned copy of the dataset");
    }
    println!("{}", "=".repeat(80));
}

/// Print the outcome of the cleaning stage.
fn print_clean_summary(outcome: &CleanOutcome) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    match outcome {
        CleanOutcome::NothingToClean => {
            println!("Nothing to clean; no dataset was supplied");
        }
        CleanOutcome::Cleaned(artifact) => {
            println!("Artifact: {}", artifact.path.display());
            println!(
                "Rows: {} -> {} ({} duplicates removed)",
                artifact.rows_before,
                artifact.rows_after,
                artifact.rows_before - artifact.rows_after
            );
            println!("Columns: {}", artifact.columns);
            if !artifact.actions.is_empty() {
                println!();
                println!("Actions Taken:");
                for action in &artifact.actions {
                    println!("  - {}", action);
                }
            }
        }
    }
    println!("{}", "=".repeat(80));
}

/// Load a CSV with progressively more tolerant reader settings.
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: standard loading with schema inference
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: read every column as plain text
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("All-text loading failed: {}", e);
        }
    }

    // Strategy 3: all text, skipping values the parser chokes on
    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_ignore_errors(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| {
            PipelineError::LoadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}
