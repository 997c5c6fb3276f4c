//! Generation backends for LLM-assisted cleaning advice.
//!
//! This module provides a trait-based abstraction over text-generation
//! backends, allowing the analysis pipeline to request cleaning suggestions
//! without caring how they are produced.
//!
//! # Feature Flag
//!
//! The [`GenerationProvider`] trait and the CLI backend are always
//! available. The HTTP backend requires the `http` feature:
//!
//! ```toml
//! # CLI backend only
//! scour_pipeline = { version = "0.1", default-features = false }
//!
//! # CLI + HTTP backends (default)
//! scour_pipeline = { version = "0.1" }
//! ```
//!
//! # Architecture
//!
//! Concrete implementations are provided for the two ways of reaching a
//! local ollama installation:
//!
//! - [`OllamaCliProvider`] - shells out to the `ollama` binary
//! - [`OllamaHttpProvider`] - calls a running ollama server over REST
//!   (requires `http` feature)
//!
//! Providers return `Result<String, GenerationFailure>`. The
//! [`GenerationClient`] facade folds failures into their display text, so
//! the rest of the pipeline only ever handles strings: a failed generation
//! shows up in the final report as an `"ERROR: ..."` line instead of
//! aborting the analysis.
//!
//! # Adding a New Provider
//!
//! To add support for a new backend:
//!
//! 1. Create a new file (e.g., `src/ai/openai.rs`)
//! 2. Implement the [`GenerationProvider`] trait
//! 3. Export the new provider in this module
//!
//! # Example
//!
//! ```rust,ignore
//! use scour_pipeline::ai::{GenerationClient, OllamaCliProvider};
//! use std::time::Duration;
//!
//! let provider = OllamaCliProvider::new();
//! let advice = GenerationClient::generate_text(
//!     &provider,
//!     "Suggest cleaning steps for this table...",
//!     "gemma:2b",
//!     Duration::from_secs(120),
//! );
//! println!("{advice}");
//! ```

// Provider trait is always available (for custom implementations)
mod provider;
pub use provider::{GenerationFailure, GenerationProvider, NO_RESPONSE_FALLBACK};

mod ollama_cli;
pub use ollama_cli::OllamaCliProvider;

// The HTTP backend requires the "http" feature
#[cfg(feature = "http")]
mod ollama_http;
#[cfg(feature = "http")]
pub use ollama_http::{OllamaHttpProvider, DEFAULT_BASE_URL};

use std::time::Duration;

use tracing::warn;

/// Facade over a provider that never fails.
///
/// Generation problems are part of the analysis output, not exceptions:
/// whatever goes wrong, the caller gets text it can render.
pub struct GenerationClient;

impl GenerationClient {
    /// Run one generation call and always return displayable text.
    pub fn generate_text(
        provider: &dyn GenerationProvider,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> String {
        match provider.generate(prompt, model, timeout) {
            Ok(text) => text,
            Err(failure) => {
                warn!(provider = provider.name(), %failure, "Generation failed");
                failure.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider {
        response: Result<String, GenerationFailure>,
    }

    impl GenerationProvider for MockProvider {
        fn generate(
            &self,
            _prompt: &str,
            _model: &str,
            _timeout: Duration,
        ) -> Result<String, GenerationFailure> {
            self.response.clone()
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[test]
    fn test_successful_generation_passes_through() {
        let provider = MockProvider {
            response: Ok("Drop the empty rows.".to_string()),
        };
        let text = GenerationClient::generate_text(
            &provider,
            "prompt",
            "gemma:2b",
            Duration::from_secs(5),
        );
        assert_eq!(text, "Drop the empty rows.");
    }

    #[test]
    fn test_failure_is_folded_into_text() {
        let provider = MockProvider {
            response: Err(GenerationFailure::TimedOut {
                seconds: 120,
                model: "gemma:2b".to_string(),
            }),
        };
        let text = GenerationClient::generate_text(
            &provider,
            "prompt",
            "gemma:2b",
            Duration::from_secs(5),
        );
        assert_eq!(
            text,
            "ERROR: LLM call timed out after 120s. Consider pulling the model first with 'ollama pull gemma:2b'."
        );
    }

    #[test]
    fn test_folded_failures_keep_error_prefix() {
        let provider = MockProvider {
            response: Err(GenerationFailure::RunFailed {
                code: 1,
                details: String::new(),
            }),
        };
        let text = GenerationClient::generate_text(
            &provider,
            "prompt",
            "gemma:2b",
            Duration::from_secs(5),
        );
        assert!(text.starts_with("ERROR: "));
    }
}
