//! Structured results captured from a sandboxed execution.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Everything captured from one sandboxed run of a snippet.
///
/// Produced fresh by each harness call and consumed once by the repair loop.
/// Timeouts and launch failures are reported through synthetic `stderr` text
/// rather than an error type, so callers handle exactly one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error, or a synthetic message for timeouts and
    /// launch failures.
    pub stderr: String,
    /// Exit status of the child process; absent on timeout or launch failure.
    pub exit_code: Option<i32>,
    /// Whether the run was terminated by the timeout.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Result of a process that ran to completion, cleanly or not.
    ///
    /// `exit_code` is `None` when the child was killed by a signal.
    pub fn completed(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            timed_out: false,
        }
    }

    /// Synthetic result for a run that hit the wall-clock timeout.
    ///
    /// Output captured before the kill is discarded. The stderr text is one
    /// no interpreter produces, so it never matches an error category.
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!(
                "Sandbox: program timed out after {:.1}s (possible infinite loop or long execution)",
                timeout.as_secs_f64()
            ),
            exit_code: None,
            timed_out: true,
        }
    }

    /// Synthetic result for a process that could not be launched at all.
    pub fn launch_failure(reason: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Sandbox: failed to execute program: {}", reason.into()),
            exit_code: None,
            timed_out: false,
        }
    }

    /// Whether the run produced no error output at all.
    ///
    /// Whitespace-only stderr counts as clean; this is the success signal
    /// that terminates the repair loop.
    pub fn is_clean(&self) -> bool {
        self.stderr.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_result_is_clean_when_stderr_empty() {
        let result = ExecutionResult::completed("hello\n", "", Some(0));
        assert!(result.is_clean());
        assert_eq!(result.exit_code, Some(0));
        assert!(!result.timed_out);
    }

    #[test]
    fn test_whitespace_only_stderr_counts_as_clean() {
        let result = ExecutionResult::completed("", "  \n\t", Some(0));
        assert!(result.is_clean());
    }

    #[test]
    fn test_timeout_result_shape() {
        let result = ExecutionResult::timeout(Duration::from_secs(2));
        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.contains("timed out after 2.0s"));
        assert!(!result.is_clean());
    }

    #[test]
    fn test_launch_failure_result_shape() {
        let result = ExecutionResult::launch_failure("no such interpreter");
        assert!(!result.timed_out);
        assert_eq!(result.exit_code, None);
        assert!(result.stderr.contains("no such interpreter"));
        assert!(!result.is_clean());
    }

    #[test]
    fn test_serde_roundtrip() {
        let result = ExecutionResult::completed("out", "err", Some(1));
        let json = serde_json::to_string(&result).unwrap();
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
