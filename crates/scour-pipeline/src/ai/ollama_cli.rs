//! Ollama CLI provider.
//!
//! Shells out to the local `ollama` binary (`ollama run <model>` with the
//! prompt on stdin) and enforces a hard wall-clock timeout by polling the
//! child process and killing it once the deadline passes. Output handling
//! mirrors the CLI's behavior of sometimes writing the answer to stderr:
//! stdout wins, stderr is the fallback, and an empty pair maps to
//! [`NO_RESPONSE_FALLBACK`].

use std::io::{ErrorKind, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use super::provider::{GenerationFailure, GenerationProvider, NO_RESPONSE_FALLBACK};

/// How often the child process is polled for exit while the deadline runs.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Generation backend that drives the `ollama` command-line tool.
pub struct OllamaCliProvider {
    binary: String,
}

// Ensure the provider can be shared across threads behind Arc<dyn GenerationProvider>
static_assertions::assert_impl_all!(OllamaCliProvider: Send, Sync);

impl OllamaCliProvider {
    /// Create a provider that invokes `ollama` from PATH.
    pub fn new() -> Self {
        Self {
            binary: "ollama".to_string(),
        }
    }

    /// Create a provider that invokes a specific binary (path or name).
    ///
    /// Mostly useful for tests and for setups where `ollama` lives outside
    /// PATH.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for OllamaCliProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain a child pipe on a dedicated thread so the child never blocks on a
/// full pipe buffer while we poll for exit.
fn read_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

impl GenerationProvider for OllamaCliProvider {
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationFailure> {
        debug!(binary = %self.binary, model = %model, timeout_secs = timeout.as_secs(), "Invoking ollama CLI");

        let mut child = Command::new(&self.binary)
            .arg("run")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    GenerationFailure::BinaryMissing {
                        binary: self.binary.clone(),
                    }
                } else {
                    GenerationFailure::RunFailed {
                        code: -1,
                        details: err.to_string(),
                    }
                }
            })?;

        // Write the prompt and close stdin so the CLI knows input is done.
        // Write errors are ignored here; a child that died early surfaces
        // through its exit status below.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(prompt.as_bytes());
        }

        let stdout_reader = child.stdout.take().map(read_pipe);
        let stderr_reader = child.stderr.take().map(read_pipe);

        let deadline = Instant::now() + timeout;
        let status = loop {
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                // Reader threads are abandoned: once the child is dead their
                // pipes hit EOF and they exit on their own. No partial
                // output from the timed-out call is kept.
                return Err(GenerationFailure::TimedOut {
                    seconds: timeout.as_secs(),
                    model: model.to_string(),
                });
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GenerationFailure::RunFailed {
                        code: -1,
                        details: err.to_string(),
                    });
                }
            }
        };

        let stdout_bytes = stdout_reader
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();
        let stderr_bytes = stderr_reader
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();
        let stdout = String::from_utf8_lossy(&stdout_bytes).trim().to_string();
        let stderr = String::from_utf8_lossy(&stderr_bytes).trim().to_string();

        if !status.success() {
            return Err(GenerationFailure::RunFailed {
                code: status.code().unwrap_or(-1),
                details: stderr,
            });
        }

        if !stdout.is_empty() {
            Ok(stdout)
        } else if !stderr.is_empty() {
            // Some ollama builds print the response on stderr.
            Ok(stderr)
        } else {
            Ok(NO_RESPONSE_FALLBACK.to_string())
        }
    }

    fn name(&self) -> &str {
        "ollama-cli"
    }
}
