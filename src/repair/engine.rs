//! Repair engine: the bounded execute-classify-patch loop.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analyzer::{classify, PatchResult};
use crate::sandbox::{ProcessSandbox, Sandbox};

use super::config::RepairConfig;
use super::report::{IterationRecord, RepairReport, RepairStatus};

/// Drives repair sessions against an injected sandbox.
pub struct RepairEngine {
    sandbox: Arc<dyn Sandbox>,
    config: RepairConfig,
}

impl RepairEngine {
    /// Creates an engine around an existing sandbox.
    pub fn new(sandbox: Arc<dyn Sandbox>, config: RepairConfig) -> Self {
        Self { sandbox, config }
    }

    /// Creates an engine backed by a real interpreter process sandbox.
    pub fn with_process_sandbox(config: RepairConfig) -> Self {
        let sandbox = Arc::new(ProcessSandbox::new(config.python.clone()));
        Self::new(sandbox, config)
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Runs the repair loop on `source` and reports the outcome.
    ///
    /// Infallible: sandbox faults arrive as synthetic error output and an
    /// unresolvable error just ends the session, so the caller always gets
    /// the last known source plus the audit trail.
    pub async fn repair(&self, source: &str) -> RepairReport {
        let session_id = format!("repair-{}", Uuid::new_v4());
        let started_at = Utc::now();

        info!(
            "Starting repair session {} (budget: {} iterations)",
            session_id, self.config.max_iterations
        );

        let mut current = source.to_string();
        let mut iterations = Vec::new();
        let mut status = RepairStatus::Exhausted;

        for attempt in 1..=self.config.max_iterations {
            debug!("Iteration {}/{}", attempt, self.config.max_iterations);

            let execution = self.sandbox.run(&current, self.config.timeout).await;

            if execution.is_clean() {
                info!("Source ran cleanly on iteration {}", attempt);
                iterations.push(IterationRecord {
                    attempt,
                    execution,
                    category: None,
                    rationale: None,
                    diff: None,
                });
                status = RepairStatus::Clean;
                break;
            }

            let category = classify(&execution.stderr);
            let patch = category.and_then(|c| c.apply(&execution.stderr, &current));

            match patch {
                Some(PatchResult {
                    rationale,
                    diff,
                    repaired_source,
                }) => {
                    info!("Iteration {}: {}", attempt, rationale);
                    debug!("Patch:\n{}", diff);
                    iterations.push(IterationRecord {
                        attempt,
                        execution,
                        category,
                        rationale: Some(rationale),
                        diff: Some(diff),
                    });
                    current = repaired_source;
                }
                None => {
                    info!("Iteration {}: no fix available, stopping", attempt);
                    iterations.push(IterationRecord {
                        attempt,
                        execution,
                        category,
                        rationale: None,
                        diff: None,
                    });
                    status = RepairStatus::NoFix;
                    break;
                }
            }
        }

        let report = RepairReport {
            session_id,
            status,
            started_at,
            completed_at: Utc::now(),
            iterations,
            final_source: current,
        };

        info!(
            "Repair session {} finished: {} after {} execution(s)",
            report.session_id,
            report.status,
            report.executions()
        );

        report
    }
}
