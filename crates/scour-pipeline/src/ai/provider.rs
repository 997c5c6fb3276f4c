//! Generation provider trait and failure taxonomy.
//!
//! A provider is any backend satisfying "accepts prompt, model id, timeout;
//! returns text or a structured failure". The pipeline never sees a panic or
//! a raw transport error from a provider: every failure is one of the
//! [`GenerationFailure`] variants, each carrying a complete user-facing
//! message.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/` (e.g., `openai.rs`)
//! 2. Implement the [`GenerationProvider`] trait for your backend struct
//! 3. Export the provider in `src/ai/mod.rs`

use std::time::Duration;
use thiserror::Error;

/// Returned when a backend completes successfully but produces no text on
/// either output channel.
pub const NO_RESPONSE_FALLBACK: &str = "No response from model.";

/// Closed set of generation failures.
///
/// Each variant's `Display` form is the exact string shown to the user, so
/// callers can fold a failure into the result channel with `to_string()`
/// and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    /// The backend executable does not exist on PATH.
    #[error("ERROR: '{binary}' CLI not found. Install from https://ollama.com and ensure it is on PATH.")]
    BinaryMissing { binary: String },

    /// The call exceeded its hard timeout and was abandoned.
    #[error("ERROR: LLM call timed out after {seconds}s. Consider pulling the model first with 'ollama pull {model}'.")]
    TimedOut { seconds: u64, model: String },

    /// The backend ran but exited with a non-success status.
    #[error("ERROR: ollama run failed (code {code}). Details: {}", display_details(.details))]
    RunFailed { code: i32, details: String },

    /// The HTTP server could not be reached at all.
    #[cfg(feature = "http")]
    #[error("ERROR: ollama server unreachable at {url}. Start it with 'ollama serve' or set OLLAMA_HOST.")]
    ServerUnreachable { url: String },

    /// The HTTP server answered with a non-success status or a bad body.
    #[cfg(feature = "http")]
    #[error("ERROR: ollama request failed (status {status}). Details: {}", display_details(.details))]
    RequestFailed { status: u16, details: String },
}

fn display_details(details: &str) -> &str {
    if details.is_empty() {
        "No error details"
    } else {
        details
    }
}

/// Trait for text-generation backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage across threads.
///
/// # Contract
///
/// On success the returned text is trimmed and non-empty (providers fall
/// back to [`NO_RESPONSE_FALLBACK`] for empty output). The timeout is a hard
/// bound: `generate` must return within it, killing or abandoning the
/// underlying call if necessary. Exactly one invocation per call, no
/// internal retry.
pub trait GenerationProvider: Send + Sync {
    /// Run one generation request against the backend.
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationFailure>;

    /// Backend name for logging and diagnostics.
    fn name(&self) -> &str;
}
