//! Configuration for repair sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sandbox::DEFAULT_PYTHON;

/// Configuration for a repair session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Maximum execute-classify-patch iterations before giving up.
    pub max_iterations: u32,
    /// Wall-clock timeout for each sandboxed execution.
    pub timeout: Duration,
    /// Interpreter binary for the process sandbox.
    pub python: String,
}

impl RepairConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self {
            max_iterations: 3,
            timeout: Duration::from_secs(2),
            python: DEFAULT_PYTHON.to_string(),
        }
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the per-execution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the interpreter binary.
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepairConfig::default();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.python, DEFAULT_PYTHON);
    }

    #[test]
    fn test_builder() {
        let config = RepairConfig::new()
            .with_max_iterations(5)
            .with_timeout(Duration::from_secs(10))
            .with_python("python3.12");

        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.python, "python3.12");
    }
}
