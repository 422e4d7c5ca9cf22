//! Benchmark comparison CLI
//!
//! Reads a current results CSV (and optionally a baseline CSV) and prints the
//! per-instruction comparison table to stdout.

use anyhow::{Context, Result};
use bench_diff::{MeasurementTable, ReportGenerator, Source, TableLoader};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Usage: bench-diff-cli <current.csv|-> [baseline.csv]";

/// Exit status for the no-argument usage path
const USAGE_EXIT_CODE: u8 = 1;

/// Bench Diff - Compare pin and native measurements per instruction
///
/// Every argument is positional; values starting with `-` are file names.
#[derive(Parser, Debug)]
#[command(name = "bench-diff-cli")]
#[command(about = "Compare pin and native benchmark measurements", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Current results CSV, or `-` to read from stdin
    #[arg(value_name = "CURRENT", allow_hyphen_values = true)]
    current: Option<String>,

    /// Baseline results CSV
    #[arg(value_name = "BASELINE", allow_hyphen_values = true)]
    baseline: Option<PathBuf>,

    /// Further arguments are ignored
    #[arg(hide = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging();

    log::info!("Bench Diff CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using bench-diff library v{}", bench_diff::VERSION);

    let stdout = io::stdout();
    let code = execute(&args, &mut stdout.lock())?;
    Ok(ExitCode::from(code))
}

/// Run the command for parsed arguments, writing to `out`; returns the exit status
fn execute<W: Write>(args: &Args, out: &mut W) -> Result<u8> {
    let Some(current) = args.current.as_deref() else {
        writeln!(out, "{}", USAGE)?;
        return Ok(USAGE_EXIT_CODE);
    };

    run(out, Source::from_arg(current), args.baseline.clone())?;
    Ok(0)
}

/// Load both inputs and print the report
fn run<W: Write>(out: &mut W, current: Source, baseline: Option<PathBuf>) -> Result<()> {
    let loader = TableLoader::new();

    let current_table = loader
        .load(&current)
        .with_context(|| format!("Failed to load current results: {}", current))?;

    let baseline_table = match baseline {
        // `-` is not special here; the baseline is always a path.
        Some(path) => {
            let baseline = Source::Path(path);
            loader
                .load(&baseline)
                .with_context(|| format!("Failed to load baseline results: {}", baseline))?
        }
        None => MeasurementTable::new(),
    };

    ReportGenerator::new()
        .write_report(out, &current_table, &baseline_table)
        .context("Failed to write report")?;

    Ok(())
}

/// Initialize logging from `RUST_LOG`, defaulting to warnings only
fn init_logging() {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
