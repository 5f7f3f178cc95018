//! Process-backed sandbox: one temporary file and one child interpreter per run.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ExecutionResult, Sandbox};

/// Interpreter used when none is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// Internal faults raised before the harness boundary converts them to data.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Spawn failed: {0}")]
    Spawn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs snippets with a real Python interpreter in a child process.
///
/// Each call writes the snippet to a uniquely named temporary `.py` file,
/// spawns `<python> <file>` with piped output, and waits for completion or
/// the timeout. The temp file lives only for the duration of the call and
/// nothing is shared between calls, so concurrent runs are independent.
pub struct ProcessSandbox {
    /// Interpreter binary to invoke.
    python: String,
}

impl ProcessSandbox {
    /// Creates a sandbox that invokes the given interpreter binary.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// The interpreter binary this sandbox invokes.
    pub fn interpreter(&self) -> &str {
        &self.python
    }

    async fn try_run(
        &self,
        source: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, SandboxError> {
        let mut file = tempfile::Builder::new()
            .prefix("pymend-")
            .suffix(".py")
            .tempfile()
            .map_err(|e| SandboxError::Setup(format!("Failed to create source file: {}", e)))?;
        file.write_all(source.as_bytes())
            .map_err(|e| SandboxError::Setup(format!("Failed to write source file: {}", e)))?;
        file.flush()
            .map_err(|e| SandboxError::Setup(format!("Failed to flush source file: {}", e)))?;

        debug!("Spawning {} {}", self.python, file.path().display());

        // kill_on_drop so a timed-out child is reaped when the output
        // future is dropped.
        let child = Command::new(&self.python)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::Spawn(format!("Failed to spawn '{}': {}", self.python, e)))?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ExecutionResult::completed(
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
                output.status.code(),
            )),
            Ok(Err(e)) => Err(SandboxError::Io(e)),
            Err(_) => {
                debug!("Execution timed out after {:?}", timeout);
                Ok(ExecutionResult::timeout(timeout))
            }
        }
        // temp file is removed when `file` drops, on every path
    }
}

impl Default for ProcessSandbox {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON)
    }
}

#[async_trait]
impl Sandbox for ProcessSandbox {
    async fn run(&self, source: &str, timeout: Duration) -> ExecutionResult {
        match self.try_run(source, timeout).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Sandbox launch failed: {}", err);
                ExecutionResult::launch_failure(err.to_string())
            }
        }
    }
}
