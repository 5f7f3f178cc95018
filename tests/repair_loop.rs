//! Integration tests for the repair loop.
//!
//! Most tests drive the engine with a scripted fake sandbox so they touch no
//! interpreter or filesystem. Tests against a real python3 are `#[ignore]`d;
//! run with: cargo test --test repair_loop -- --ignored

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pymend::repair::{RepairConfig, RepairEngine, RepairStatus};
use pymend::sandbox::{ExecutionResult, ProcessSandbox, Sandbox};
use pymend::ErrorCategory;

/// Fake sandbox replaying a scripted sequence of results, counting calls.
struct ScriptedSandbox {
    results: Mutex<Vec<ExecutionResult>>,
    calls: AtomicUsize,
}

impl ScriptedSandbox {
    fn new(results: Vec<ExecutionResult>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sandbox for ScriptedSandbox {
    async fn run(&self, _source: &str, _timeout: Duration) -> ExecutionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            ExecutionResult::completed("", "", Some(0))
        } else {
            results.remove(0)
        }
    }
}

fn failing(stderr: &str) -> ExecutionResult {
    ExecutionResult::completed("", stderr, Some(1))
}

fn clean(stdout: &str) -> ExecutionResult {
    ExecutionResult::completed(stdout, "", Some(0))
}

fn engine(sandbox: Arc<ScriptedSandbox>, budget: u32) -> RepairEngine {
    RepairEngine::new(sandbox, RepairConfig::new().with_max_iterations(budget))
}

#[tokio::test]
async fn clean_source_is_returned_unchanged_after_one_execution() {
    let sandbox = ScriptedSandbox::new(vec![clean("fine\n")]);
    let report = engine(sandbox.clone(), 3).repair("print('fine')").await;

    assert_eq!(sandbox.calls(), 1);
    assert_eq!(report.status, RepairStatus::Clean);
    assert!(report.succeeded());
    assert_eq!(report.final_source, "print('fine')");
    assert_eq!(report.executions(), 1);
}

#[tokio::test]
async fn missing_colon_is_repaired_then_runs_clean() {
    let stderr = "  File \"snippet.py\", line 2\n    def greet(name)\n                  ^\nSyntaxError: invalid syntax";
    let sandbox = ScriptedSandbox::new(vec![failing(stderr), clean("Hello Amrutha\n")]);

    let source = "\ndef greet(name)\n    print(\"Hello\", name)\n\ngreet(\"Amrutha\")";
    let report = engine(sandbox.clone(), 3).repair(source).await;

    assert_eq!(sandbox.calls(), 2);
    assert_eq!(report.status, RepairStatus::Clean);
    assert!(report.final_source.contains("def greet(name):"));

    let first = &report.iterations[0];
    assert_eq!(first.category, Some(ErrorCategory::MissingColon));
    assert!(first.diff.as_deref().unwrap().contains("+def greet(name):"));
    assert!(first.diff.as_deref().unwrap().contains("-def greet(name)"));
}

#[tokio::test]
async fn undefined_name_gets_declared_before_existing_source() {
    let sandbox = ScriptedSandbox::new(vec![
        failing("NameError: name 'x' is not defined"),
        clean("0\n"),
    ]);

    let report = engine(sandbox.clone(), 3).repair("print(x)").await;

    assert_eq!(report.status, RepairStatus::Clean);
    assert_eq!(report.final_source, "x = 0\nprint(x)");
}

#[tokio::test]
async fn unrecognized_error_stops_the_loop_immediately() {
    let sandbox = ScriptedSandbox::new(vec![failing("KeyboardInterrupt")]);
    let report = engine(sandbox.clone(), 3).repair("input()").await;

    assert_eq!(sandbox.calls(), 1);
    assert_eq!(report.status, RepairStatus::NoFix);
    assert_eq!(report.final_source, "input()");
}

#[tokio::test]
async fn timeout_result_is_unrecognized_and_stops_the_loop() {
    // The synthetic timeout stderr matches no category marker.
    let sandbox = ScriptedSandbox::new(vec![ExecutionResult::timeout(Duration::from_secs(2))]);
    let report = engine(sandbox.clone(), 3).repair("while True: pass").await;

    assert_eq!(sandbox.calls(), 1);
    assert_eq!(report.status, RepairStatus::NoFix);
    assert!(report.iterations[0].execution.timed_out);
    assert_eq!(report.iterations[0].category, None);
}

#[tokio::test]
async fn launch_failure_is_unrecognized_and_stops_the_loop() {
    let sandbox = ScriptedSandbox::new(vec![ExecutionResult::launch_failure("spawn refused")]);
    let report = engine(sandbox.clone(), 3).repair("print('x')").await;

    assert_eq!(report.status, RepairStatus::NoFix);
    assert_eq!(report.final_source, "print('x')");
}

#[tokio::test]
async fn persistent_error_runs_exactly_budget_executions() {
    let stderr = "IndentationError: expected an indented block";
    let sandbox = ScriptedSandbox::new(vec![
        failing(stderr),
        failing(stderr),
        failing(stderr),
        failing(stderr),
        failing(stderr),
    ]);

    let report = engine(sandbox.clone(), 5).repair("a\n\nb").await;

    assert_eq!(sandbox.calls(), 5);
    assert_eq!(report.status, RepairStatus::Exhausted);
    assert_eq!(report.executions(), 5);
    // Five indentation passes, blank line untouched throughout.
    assert_eq!(
        report.final_source,
        format!("{}a\n\n{}b", " ".repeat(20), " ".repeat(20))
    );
}

#[tokio::test]
async fn recognized_category_with_declining_strategy_stops_as_no_fix() {
    // SyntaxError without a line number: classified, but the strategy declines.
    let sandbox = ScriptedSandbox::new(vec![failing("SyntaxError: unexpected EOF while parsing")]);
    let report = engine(sandbox.clone(), 3).repair("def f()").await;

    assert_eq!(report.status, RepairStatus::NoFix);
    assert_eq!(report.iterations[0].category, Some(ErrorCategory::MissingColon));
    assert!(report.iterations[0].rationale.is_none());
}

#[tokio::test]
async fn report_round_trips_through_json() {
    let sandbox = ScriptedSandbox::new(vec![
        failing("ZeroDivisionError: division by zero"),
        clean(""),
    ]);
    let report = engine(sandbox, 3).repair("x = 1/0").await;

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: pymend::RepairReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.status, RepairStatus::Clean);
    assert_eq!(back.final_source, "x = 1/1");
    assert_eq!(back.executions(), 2);
}

#[tokio::test]
#[ignore] // Requires python3 on PATH: cargo test --test repair_loop -- --ignored
async fn real_interpreter_repairs_the_missing_colon_demo() {
    let config = RepairConfig::new().with_max_iterations(3);
    let engine = RepairEngine::with_process_sandbox(config);

    let source = "\ndef greet(name)\n    print(\"Hello\", name)\n\ngreet(\"Amrutha\")\n";
    let report = engine.repair(source).await;

    assert_eq!(report.status, RepairStatus::Clean, "report: {:#?}", report);
    assert!(report.final_source.contains("def greet(name):"));
    assert!(report
        .iterations
        .last()
        .unwrap()
        .execution
        .stdout
        .contains("Hello Amrutha"));
}

#[tokio::test]
#[ignore] // Requires python3 on PATH: cargo test --test repair_loop -- --ignored
async fn real_interpreter_repairs_division_by_zero() {
    let config = RepairConfig::new().with_max_iterations(3);
    let engine = RepairEngine::with_process_sandbox(config);

    let report = engine.repair("x = 10/0\nprint(x)").await;

    assert_eq!(report.status, RepairStatus::Clean, "report: {:#?}", report);
    assert_eq!(report.final_source, "x = 10/1\nprint(x)");
}

#[tokio::test]
#[ignore] // Requires python3 on PATH: cargo test --test repair_loop -- --ignored
async fn real_interpreter_times_out_on_infinite_loop() {
    let sandbox: Arc<dyn Sandbox> = Arc::new(ProcessSandbox::default());
    let config = RepairConfig::new()
        .with_max_iterations(2)
        .with_timeout(Duration::from_millis(300));
    let engine = RepairEngine::new(sandbox, config);

    let report = engine.repair("while True:\n    pass").await;

    // Timeout stderr matches no category, so the loop stops after one run.
    assert_eq!(report.status, RepairStatus::NoFix);
    assert!(report.iterations[0].execution.timed_out);
}
