//! Sandboxed execution of untrusted Python snippets.
//!
//! This module is the only part of the crate that touches the operating
//! system: each run writes the snippet to a fresh temporary file, spawns a
//! child interpreter on it, and enforces a wall-clock timeout.
//!
//! # Architecture
//!
//! ```text
//! source string → temp .py file → child interpreter → ExecutionResult
//! ```
//!
//! Every fault inside the harness (timeout, spawn failure, IO failure) is
//! converted into a synthetic [`ExecutionResult`] at this boundary; `run`
//! never returns an error. The repair loop is written against the [`Sandbox`]
//! trait so tests can drive it with a scripted fake that spawns nothing.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use pymend::sandbox::{ProcessSandbox, Sandbox};
//!
//! let sandbox = ProcessSandbox::default();
//! let result = sandbox.run("print('hello')", Duration::from_secs(2)).await;
//! assert!(result.is_clean());
//! ```

mod process;
mod result;

pub use process::{ProcessSandbox, SandboxError, DEFAULT_PYTHON};
pub use result::ExecutionResult;

use std::time::Duration;

use async_trait::async_trait;

/// Executes one source snippet per call and always reports a structured result.
///
/// Implementations own their side effects completely: one isolated execution
/// per call, no state shared between calls, and every internal fault folded
/// into the returned [`ExecutionResult`] rather than propagated.
#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Runs `source` with a wall-clock `timeout` and captures its output.
    async fn run(&self, source: &str, timeout: Duration) -> ExecutionResult;
}
