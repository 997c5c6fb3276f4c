//! Ollama HTTP provider.
//!
//! Talks to a running ollama server over its REST API (`POST /api/generate`
//! with `stream: false`). The base URL defaults to the standard local
//! address and can be overridden explicitly or through the `OLLAMA_HOST`
//! environment variable, matching how the ollama tooling itself is
//! configured.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{GenerationFailure, GenerationProvider, NO_RESPONSE_FALLBACK};

/// Standard address of a locally running ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Generation backend that calls the ollama REST API.
pub struct OllamaHttpProvider {
    base_url: String,
    client: Client,
}

// Ensure the provider can be shared across threads behind Arc<dyn GenerationProvider>
static_assertions::assert_impl_all!(OllamaHttpProvider: Send, Sync);

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: Option<String>,
}

/// `OLLAMA_HOST` is commonly set to a bare `host:port`; give it a scheme.
fn normalize_base_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}

impl OllamaHttpProvider {
    /// Create a provider pointed at [`DEFAULT_BASE_URL`].
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider pointed at an explicit server address.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Create a provider from the `OLLAMA_HOST` environment variable,
    /// falling back to the default local address.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("OLLAMA_HOST")
            .map(|raw| normalize_base_url(raw.trim()))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }
}

impl GenerationProvider for OllamaHttpProvider {
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationFailure> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        debug!(url = %url, model = %model, timeout_secs = timeout.as_secs(), "Calling ollama HTTP API");

        let request = OllamaRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&request)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationFailure::TimedOut {
                        seconds: timeout.as_secs(),
                        model: model.to_string(),
                    }
                } else {
                    GenerationFailure::ServerUnreachable {
                        url: self.base_url.clone(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let details = response.text().unwrap_or_default().trim().to_string();
            return Err(GenerationFailure::RequestFailed { status, details });
        }

        let body: OllamaResponse =
            response
                .json()
                .map_err(|err| GenerationFailure::RequestFailed {
                    status,
                    details: err.to_string(),
                })?;

        let text = body
            .response
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            Ok(NO_RESPONSE_FALLBACK.to_string())
        } else {
            Ok(text)
        }
    }

    fn name(&self) -> &str {
        "ollama-http"
    }
}
