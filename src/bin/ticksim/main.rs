//! ticksim: run a scheduling policy over a process descriptor file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ticksim::{load_workload, Algorithm, SimConfig, SimFormat, Simulator, TraceStats};

/// Simulate FCFS, STCF, MLFQ or dynamic-quantum scheduling of a process list
/// and write the per-tick execution trace.
#[derive(Parser)]
#[command(name = "ticksim", version)]
struct Cli {
    /// Process descriptor file (first line: count; then name,burst,arrival,io).
    ///
    /// Relative paths are resolved under the configured input directory
    /// and dataset.
    input: PathBuf,

    /// JSON configuration file selecting dataset, algorithm and tunables.
    #[arg(short, long, env = "TICKSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Scheduling algorithm (fcfs, stcf, mlfq, dynamic_quantum).
    ///
    /// Overrides the configuration file.
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Ticks between priority boosts (mlfq, dynamic_quantum).
    #[arg(long, value_name = "TICKS")]
    boost_threshold: Option<u64>,

    /// Base quantum for dynamic_quantum.
    #[arg(long, value_name = "TICKS")]
    base_quantum: Option<u64>,

    /// Where to write the trace; "-" prints it to stdout.
    ///
    /// Defaults to <output_dir>/<dataset>/<algorithm>_out_<suffix>.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print trace events to stderr.
    #[arg(long)]
    dump_trace: bool,

    /// Print per-process statistics to stderr.
    #[arg(long)]
    summary: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };

    // Override config fields from CLI flags.
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if cli.boost_threshold.is_some() {
        config.boost_threshold = cli.boost_threshold;
    }
    if cli.base_quantum.is_some() {
        config.base_quantum = cli.base_quantum;
    }

    let input = config.input_path(&cli.input);
    let workload = load_workload(&input)
        .with_context(|| format!("failed to load processes from {}", input.display()))?;

    let policy = config
        .algorithm
        .build(config.tunables())
        .context("invalid scheduler tunables")?;
    let trace = Simulator::new(policy)
        .run(&workload)
        .context("simulation rejected the workload")?;

    if cli.dump_trace {
        trace.dump();
    }
    if cli.summary {
        eprintln!("{}", TraceStats::from_trace(&trace));
    }

    let rendered = trace.render();
    match cli.output.as_deref() {
        Some(path) if path == Path::new("-") => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}").context("failed to write trace to stdout")?;
        }
        Some(path) => write_trace(path, &rendered)?,
        None => write_trace(&config.output_path(&input), &rendered)?,
    }

    Ok(())
}

fn write_trace(path: &Path, rendered: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = rendered.len(), "wrote trace");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .event_format(SimFormat)
        .try_init();
}
