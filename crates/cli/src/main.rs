//! gem5 statistics summary CLI.
//!
//! Reads a gem5 `stats.txt` and prints, for the requested number of cores:
//! 1. **Run summary:** total simulated execution time.
//! 2. **Per-core metrics:** cycles, committed instructions, IPC, CPI, and SIMD float instruction counts.
//!
//! Argument, missing-file, and config errors print one line and exit normally;
//! a malformed counter value exits with status 1. Nothing is printed to stdout
//! unless the whole report was produced.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use m5stats_core::config::DEFAULT_STATS_PATH;
use m5stats_core::{
    CounterParser, ParserConfig, ReportLayout, Result, parse_entity_count, render_json,
    render_with,
};

#[derive(Parser, Debug)]
#[command(
    name = "m5stats",
    author,
    version,
    about = "Summarize per-core gem5 performance counters",
    long_about = "Summarize per-core gem5 performance counters.\n\nReads m5out/stats.txt by default and reports execution time plus, for each of the first NUMBER_OF_CPUS cores, cycles, committed instructions, IPC, CPI, and SIMD float instruction counts.\n\nExamples:\n  m5stats 2\n  m5stats 4 --stats runs/daxpy/stats.txt\n  m5stats 1 --format json",
    allow_negative_numbers = true
)]
struct Cli {
    /// Number of CPUs to report (at least 1).
    number_of_cpus: String,

    /// gem5 stats file to read.
    #[arg(short, long, default_value = DEFAULT_STATS_PATH)]
    stats: PathBuf,

    /// JSON file overriding the recognized counters (namespace, global, entity).
    #[arg(short, long)]
    metrics: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Pretty-printed JSON.
    Json,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage problems are reported, not signaled through the exit status.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

/// Installs a stderr `fmt` subscriber whose level comes only from `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validates arguments, parses the stats file, and renders the full report.
///
/// The report is returned rather than printed so a failure never leaves
/// partial output behind.
fn run(cli: &Cli) -> Result<String> {
    let entity_count = parse_entity_count(&cli.number_of_cpus)?;
    let config = match &cli.metrics {
        Some(path) => ParserConfig::from_json_file(path)?,
        None => ParserConfig::default(),
    };
    tracing::debug!(entity_count, stats = %cli.stats.display(), "starting extraction");

    let parser = CounterParser::new(&config, entity_count)?;
    let (global, entities) = parser.parse_file(&cli.stats)?;

    let layout = ReportLayout::default();
    Ok(match cli.format {
        OutputFormat::Text => render_with(&layout, &global, &entities),
        OutputFormat::Json => render_json(&layout, &global, &entities),
    })
}
