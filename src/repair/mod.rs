//! The repair loop: execute, classify, patch, repeat.
//!
//! # Architecture
//!
//! ```text
//! source → Sandbox → stderr → classifier → PatchResult → new source → ...
//! ```
//!
//! Each iteration runs the current source in the sandbox. Clean stderr ends
//! the loop with [`RepairStatus::Clean`]; an unclassifiable error (or a
//! strategy that declines) ends it with [`RepairStatus::NoFix`]; otherwise
//! the patched source replaces the current one and the loop continues, up to
//! the configured iteration budget ([`RepairStatus::Exhausted`]).
//!
//! The loop has no cycle detection: a strategy that never resolves its error
//! (the indentation rewrite is the usual case) re-fires every iteration until
//! the budget runs out. The budget is the only brake.
//!
//! # Example
//!
//! ```ignore
//! use pymend::repair::{RepairConfig, RepairEngine};
//!
//! let engine = RepairEngine::with_process_sandbox(RepairConfig::default());
//! let report = engine.repair("x = 10/0\nprint(x)").await;
//! println!("{}", report.final_source);
//! ```

mod config;
mod engine;
mod report;

pub use config::RepairConfig;
pub use engine::RepairEngine;
pub use report::{IterationRecord, RepairReport, RepairStatus};
