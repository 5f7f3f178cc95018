//! Reports and audit trails for repair sessions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::ErrorCategory;
use crate::sandbox::ExecutionResult;

/// Terminal state of a repair session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    /// The source ran without error output.
    Clean,
    /// The last error matched no category, or its strategy declined.
    NoFix,
    /// The iteration budget ran out with the error still unresolved.
    Exhausted,
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepairStatus::Clean => "clean",
            RepairStatus::NoFix => "no_fix",
            RepairStatus::Exhausted => "exhausted",
        };
        write!(f, "{}", name)
    }
}

/// One execute-classify-patch iteration.
///
/// `category`, `rationale` and `diff` are absent on the clean final
/// iteration; `rationale` and `diff` are also absent when classification
/// found a category but its strategy declined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub attempt: u32,
    /// What the sandbox captured for this iteration's source.
    pub execution: ExecutionResult,
    /// Category the error classified into, if any.
    pub category: Option<ErrorCategory>,
    /// Rationale of the applied patch, if one was produced.
    pub rationale: Option<String>,
    /// Unified diff of the applied patch, if one was produced.
    pub diff: Option<String>,
}

/// Complete result of a repair session.
///
/// Always produced — a session that fixes nothing still reports its final
/// (unchanged) source and the trail of what was tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairReport {
    /// Unique identifier for this session.
    pub session_id: String,
    /// Terminal state the session reached.
    pub status: RepairStatus,
    /// Timestamp when the session started.
    pub started_at: DateTime<Utc>,
    /// Timestamp when the session completed.
    pub completed_at: DateTime<Utc>,
    /// Audit trail, one record per sandbox execution.
    pub iterations: Vec<IterationRecord>,
    /// The last source version, repaired or not.
    pub final_source: String,
}

impl RepairReport {
    /// Number of sandbox executions the session performed.
    pub fn executions(&self) -> usize {
        self.iterations.len()
    }

    /// Whether the final source ran cleanly.
    pub fn succeeded(&self) -> bool {
        self.status == RepairStatus::Clean
    }
}
