//! `u-cpusim` command-line front end.
//!
//! ```text
//! u-cpusim -i <input.csv> -a <fcfs|rr|sjf|srtf|prio> [-q N] [-cs N] [-o DIR] [--json]
//! u-cpusim compare -i <input.csv> [-q N] [-cs N] [-o DIR]
//! ```
//!
//! Bare flags select the `run` subcommand, and `-cs` is accepted as an
//! alias for `--cs`.

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use serde::Serialize;

use u_cpusim::compare::compare_algorithms;
use u_cpusim::io::{
    format_summary, load_processes_file, write_metrics_csv, CsvTimelineWriter, LoadError,
};
use u_cpusim::models::{
    Algorithm, SimConfig, Time, Timeline, UnknownAlgorithm, DEFAULT_QUANTUM,
};
use u_cpusim::scheduler::{AggregateMetrics, ProcessMetrics, SimSummary, Simulator, Tee};
use u_cpusim::validation::{audit, validate_processes};

/// Single-CPU scheduling simulator.
#[derive(Debug, Parser)]
#[command(name = "u-cpusim", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate one policy and write timeline.csv and metrics.csv.
    Run(RunArgs),
    /// Simulate every policy and write summary.csv and report.md.
    Compare(CommonArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Process list CSV (`pid,arrival,burst[,priority]` after a header line).
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Round-robin quantum; non-positive values fall back to the default.
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUANTUM, allow_negative_numbers = true)]
    quantum: Time,

    /// Context-switch cost in ticks.
    #[arg(long = "cs", default_value_t = 0, allow_negative_numbers = true)]
    context_switch_cost: Time,

    /// Output directory, created if missing.
    #[arg(short = 'o', long = "outdir", default_value = "out")]
    outdir: PathBuf,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Policy: fcfs, rr, sjf, srtf or prio.
    #[arg(short = 'a', long = "algo")]
    algorithm: String,

    /// Print the summary and metrics as JSON.
    #[arg(long)]
    json: bool,
}

/// Rewrites `-cs` to `--cs` and inserts `run` when no subcommand is named.
fn normalize_args<I: IntoIterator<Item = String>>(raw: I) -> Vec<String> {
    let mut args: Vec<String> = raw
        .into_iter()
        .map(|a| if a == "-cs" { "--cs".to_string() } else { a })
        .collect();
    let bare_flags = args.get(1).is_some_and(|a| {
        a.starts_with('-') && !matches!(a.as_str(), "-h" | "--help" | "-V" | "--version")
    });
    if bare_flags {
        args.insert(1, "run".to_string());
    }
    args
}

#[derive(Debug)]
enum CliError {
    Usage(clap::Error),
    Load(LoadError),
    Output(PathBuf, std::io::Error),
    UnknownAlgorithm(UnknownAlgorithm),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 1,
            CliError::Load(_) => 2,
            CliError::Output(..) => 3,
            CliError::UnknownAlgorithm(_) => 4,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(e) => write!(f, "{e}"),
            CliError::Load(e) => write!(f, "Failed to load processes: {e}"),
            CliError::Output(path, e) => write!(f, "Failed to write {}: {e}", path.display()),
            CliError::UnknownAlgorithm(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        CliError::Usage(e)
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::Load(e)
    }
}

impl From<UnknownAlgorithm> for CliError {
    fn from(e: UnknownAlgorithm) -> Self {
        CliError::UnknownAlgorithm(e)
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| CliError::Output(path.to_path_buf(), e))
}

fn write_text(path: &Path, text: &str) -> Result<(), CliError> {
    fs::write(path, text).map_err(|e| CliError::Output(path.to_path_buf(), e))
}

fn create_outdir(outdir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(outdir).map_err(|e| CliError::Output(outdir.to_path_buf(), e))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a SimSummary,
    averages: AggregateMetrics,
    metrics: &'a [ProcessMetrics],
}

fn simulate(args: &RunArgs) -> Result<(), CliError> {
    let common = &args.common;
    // load failures take precedence over a bad policy name
    let mut processes = load_processes_file(&common.input)?;
    let algorithm: Algorithm = args.algorithm.parse()?;

    if let Err(errors) = validate_processes(&processes) {
        for e in &errors {
            warn!("{e}");
        }
    }
    if algorithm == Algorithm::Rr && common.quantum <= 0 {
        warn!("non-positive quantum {}, using {DEFAULT_QUANTUM}", common.quantum);
    }
    let config = SimConfig::new(algorithm)
        .with_context_switch_cost(common.context_switch_cost)
        .with_quantum(common.quantum);

    create_outdir(&common.outdir)?;
    let timeline_path = common.outdir.join("timeline.csv");
    let metrics_path = common.outdir.join("metrics.csv");

    let mut sink = Tee {
        first: Timeline::new(),
        second: CsvTimelineWriter::new(create_file(&timeline_path)?),
    };
    let summary = Simulator::new(config.clone()).run_with_sink(&mut processes, &mut sink);
    let Tee {
        first: timeline,
        second: writer,
    } = sink;
    writer
        .finish()
        .map_err(|e| CliError::Output(timeline_path.clone(), e))?;

    let metrics = ProcessMetrics::collect(&processes);
    write_metrics_csv(create_file(&metrics_path)?, &metrics)
        .map_err(|e| CliError::Output(metrics_path.clone(), e))?;

    match audit(&processes, &timeline, &metrics, Some(config.context_switch_cost)) {
        Ok(report) => info!("audit passed: makespan {}", report.makespan),
        Err(e) => warn!("audit failed: {e}"),
    }

    if args.json {
        let report = JsonReport {
            summary: &summary,
            averages: AggregateMetrics::calculate(&metrics),
            metrics: &metrics,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => warn!("cannot render JSON summary: {e}"),
        }
    } else {
        print!("{}", format_summary(&summary));
        println!("Wrote {}, {}", timeline_path.display(), metrics_path.display());
    }
    Ok(())
}

fn compare(args: &CommonArgs) -> Result<(), CliError> {
    let processes = load_processes_file(&args.input)?;
    let report = compare_algorithms(&processes, args.context_switch_cost, args.quantum);

    create_outdir(&args.outdir)?;
    let csv_path = args.outdir.join("summary.csv");
    let md_path = args.outdir.join("report.md");
    write_text(&csv_path, &report.to_csv())?;
    let markdown = report.to_markdown();
    write_text(&md_path, &markdown)?;

    print!("{markdown}");
    println!("\nWrote {}, {}", csv_path.display(), md_path.display());
    Ok(())
}

fn run(argv: Vec<String>) -> Result<(), CliError> {
    let cli = Cli::try_parse_from(normalize_args(argv))?;
    match cli.command {
        Command::Run(args) => simulate(&args),
        Command::Compare(args) => compare(&args),
    }
}

fn main() -> ExitCode {
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    match run(std::env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        // --help and --version
        Err(CliError::Usage(e)) if !e.use_stderr() => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
