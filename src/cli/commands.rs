//! CLI command definitions for pymend.
//!
//! Two thin consumers of the repair loop: a canned demo and a file repair
//! command. All actual behavior lives in the library modules.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::repair::{RepairConfig, RepairEngine, RepairReport, RepairStatus};
use crate::sandbox::DEFAULT_PYTHON;

/// The classic broken snippet: block header missing its colon.
const DEMO_SOURCE: &str = r#"
def greet(name)
    print("Hello", name)

greet("Amrutha")
"#;

/// Heuristic repair loop for broken Python snippets.
#[derive(Parser)]
#[command(name = "pymend")]
#[command(about = "Run broken Python snippets through a heuristic repair loop")]
#[command(version)]
#[command(
    long_about = "pymend executes a Python snippet in a sandboxed interpreter process, classifies \
the error output with substring heuristics, applies a mechanical text fix, and re-executes \
until the snippet runs cleanly or the iteration budget is exhausted.\n\nExample usage:\n  \
pymend fix broken.py --max-iterations 3\n  pymend demo"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run the built-in broken snippet through the repair loop.
    Demo(DemoArgs),

    /// Repair a Python source file.
    #[command(alias = "repair")]
    Fix(FixArgs),
}

/// Arguments for `pymend demo`.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Maximum repair iterations.
    #[arg(short = 'n', long, default_value = "3")]
    pub max_iterations: u32,

    /// Per-execution timeout in seconds.
    #[arg(long, default_value = "2")]
    pub timeout_secs: u64,

    /// Python interpreter to execute snippets with.
    #[arg(long, default_value = DEFAULT_PYTHON, env = "PYMEND_PYTHON")]
    pub python: String,
}

/// Arguments for `pymend fix`.
#[derive(Parser, Debug)]
pub struct FixArgs {
    /// Python file to repair ("-" reads from stdin).
    pub file: PathBuf,

    /// Maximum repair iterations.
    #[arg(short = 'n', long, default_value = "3")]
    pub max_iterations: u32,

    /// Per-execution timeout in seconds.
    #[arg(long, default_value = "2")]
    pub timeout_secs: u64,

    /// Python interpreter to execute snippets with.
    #[arg(long, default_value = DEFAULT_PYTHON, env = "PYMEND_PYTHON")]
    pub python: String,

    /// Emit the full repair report as JSON instead of progress text.
    #[arg(long)]
    pub json: bool,

    /// Write the final source to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses CLI arguments and runs the selected command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Runs the selected command with pre-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Demo(args) => run_demo(args).await,
        Commands::Fix(args) => run_fix(args).await,
    }
}

async fn run_demo(args: DemoArgs) -> anyhow::Result<()> {
    let config = RepairConfig::new()
        .with_max_iterations(args.max_iterations)
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_python(args.python);

    let engine = RepairEngine::with_process_sandbox(config);
    let report = engine.repair(DEMO_SOURCE).await;

    print_report(&report);
    Ok(())
}

async fn run_fix(args: FixArgs) -> anyhow::Result<()> {
    let source = read_source(&args.file)?;

    let config = RepairConfig::new()
        .with_max_iterations(args.max_iterations)
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_python(args.python);

    let engine = RepairEngine::with_process_sandbox(config);
    let report = engine.repair(&source).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(path) = &args.output {
        fs::write(path, &report.final_source)
            .with_context(|| format!("Failed to write repaired source to {}", path.display()))?;
        info!("Wrote repaired source to {}", path.display());
    }

    Ok(())
}

/// Reads the source to repair from a file, or from stdin for "-".
fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read source from stdin")?;
        Ok(source)
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read source from {}", path.display()))
    }
}

/// Prints iteration-by-iteration progress and the final code.
fn print_report(report: &RepairReport) {
    for record in &report.iterations {
        println!("=== Iteration {} ===", record.attempt);

        if !record.execution.stdout.is_empty() {
            println!("--- Program output ---");
            println!("{}", record.execution.stdout.trim_end());
        }
        if !record.execution.stderr.trim().is_empty() {
            println!("--- Program errors ---");
            println!("{}", record.execution.stderr.trim_end());
        }

        if let (Some(rationale), Some(diff)) = (&record.rationale, &record.diff) {
            println!("--- Patch applied ---");
            println!("{}", rationale);
            println!("{}", diff.trim_end());
        }
        println!();
    }

    match report.status {
        RepairStatus::Clean => println!("Code executed successfully."),
        RepairStatus::NoFix => println!("No fix could be generated."),
        RepairStatus::Exhausted => println!("Reached max repair iterations."),
    }

    println!();
    println!("=== Final code ===");
    println!("{}", report.final_source);
}
