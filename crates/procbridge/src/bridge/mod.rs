//! The request-to-subprocess bridge.
//!
//! Per request:
//! 1. Drain the inbound body into memory
//! 2. Spawn a fresh child with three pipes
//! 3. Write the body to stdin, close it
//! 4. Drain stdout and stderr concurrently
//! 5. Reap the child
//! 6. Map the exit code to a response
//!
//! Nothing is shared between requests. Each gets exactly one process attempt.

pub mod process;
mod response;

use std::path::PathBuf;
use std::time::Duration;

use axum::body::{Body, Bytes};
use tracing::{debug, info, warn};

pub use process::{Captured, ExitOutcome, PipeError};
pub use response::BridgeResponse;

use crate::executable::Executable;

/// Per-request lifecycle stage, recorded on log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Draining,
    Spawning,
    Writing,
    Collecting,
    Terminated,
    Responded,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Draining => "draining",
            Stage::Spawning => "spawning",
            Stage::Writing => "writing",
            Stage::Collecting => "collecting",
            Stage::Terminated => "terminated",
            Stage::Responded => "responded",
        };
        f.write_str(s)
    }
}

/// Infra-level faults. Each becomes a `BridgeResponse::InfraError`.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to read request body: {0}")]
    Drain(String),
    #[error("failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("{program} timed out after {}ms", after.as_millis())]
    Timeout { program: String, after: Duration },
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub executable: Executable,
    /// Kill the child if it has not exited by then. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl BridgeConfig {
    pub fn new(executable: Executable) -> Self {
        Self {
            executable,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Translates one request into one child process invocation and back.
///
/// Holds only immutable configuration, so a single instance is shared across
/// concurrent requests behind an `Arc`.
#[derive(Debug)]
pub struct Bridge {
    executable: Executable,
    program: String,
    timeout: Option<Duration>,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        let program = config.executable.name();
        Self {
            executable: config.executable,
            program,
            timeout: config.timeout,
        }
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drain `body` fully, then run the child on it.
    pub async fn handle(&self, body: Body) -> BridgeResponse {
        debug!(stage = %Stage::Draining, "Reading request body");
        let input = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(input) => input,
            Err(e) => return self.respond(Err(BridgeError::Drain(e.to_string()))),
        };
        self.run(input).await
    }

    /// Run the child on an already-buffered payload.
    pub async fn run(&self, input: Bytes) -> BridgeResponse {
        let result = self.invoke(&input).await;
        self.respond(result)
    }

    async fn invoke(&self, input: &[u8]) -> Result<ExitOutcome, BridgeError> {
        let path = self.executable.path();
        debug!(
            stage = %Stage::Spawning,
            executable = %path.display(),
            input_bytes = input.len(),
            "Spawning child"
        );

        let mut child = process::spawn(path).map_err(|source| BridgeError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;
        let pid = child.id();

        let Some(deadline) = self.timeout else {
            return process::communicate(&mut child, input)
                .await
                .map_err(BridgeError::Wait);
        };

        let result = tokio::time::timeout(deadline, process::communicate(&mut child, input)).await;
        match result {
            Ok(outcome) => outcome.map_err(BridgeError::Wait),
            Err(_) => {
                warn!(?pid, timeout = ?deadline, "Child timed out, killing");
                // kill() also reaps
                if let Err(e) = child.kill().await {
                    warn!(?pid, error = %e, "Failed to kill timed out child");
                }
                Err(BridgeError::Timeout {
                    program: self.program.clone(),
                    after: deadline,
                })
            }
        }
    }

    fn respond(&self, result: Result<ExitOutcome, BridgeError>) -> BridgeResponse {
        let response = match result {
            Ok(outcome) => {
                if !outcome.is_success() {
                    info!(
                        program = %self.program,
                        code = ?outcome.code,
                        stderr_bytes = outcome.captured.stderr.len(),
                        "Child reported failure"
                    );
                }
                BridgeResponse::from_outcome(self.program.as_str(), outcome)
            }
            Err(e) => {
                warn!(error = %e, "Bridge infra error");
                BridgeResponse::infra_error(&e)
            }
        };
        debug!(stage = %Stage::Responded, kind = response.kind(), "Request complete");
        response
    }
}
