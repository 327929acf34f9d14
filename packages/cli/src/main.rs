//! fairsim: single-CPU completely-fair scheduling simulator.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

mod report;
mod workload;

use workload::Workload;

/// Completely-fair scheduling simulator.
#[derive(Parser)]
#[command(name = "fairsim")]
#[command(about = "Simulate CFS-style proportional scheduling over a workload file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a workload and print per-task completion metrics
    Run {
        /// Workload file path
        file: PathBuf,

        /// Emit the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse and validate a workload without running it
    Check {
        /// Workload file path
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, json } => run(&file, json),
        Commands::Check { file } => check(&file),
    }
}

fn load(path: &Path) -> Result<Workload> {
    let input =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let workload =
        workload::parse_str(&input).with_context(|| format!("parsing {}", path.display()))?;
    Ok(workload)
}

fn run(path: &Path, json: bool) -> Result<()> {
    let workload = load(path)?;
    info!(
        tasks = workload.tasks.len(),
        time_quantum_ns = workload.time_quantum_ns,
        min_granularity_ns = workload.min_granularity_ns,
        "workload loaded"
    );

    let mut sched = workload
        .to_builder()
        .build()
        .context("assembling the simulation")?;
    sched.run_all_tasks();
    info!(
        runtime_ns = sched.runtime_ns(),
        completed = sched.completed().len(),
        "simulation finished"
    );

    let rows = report::rows(&sched);
    if json {
        println!("{}", report::render_json(&rows)?);
    } else {
        print!("{}", report::render_table(&rows));
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let workload = load(path)?;
    println!(
        "ok: {} tasks, time_quantum {}ns, min_granularity {}ns",
        workload.tasks.len(),
        workload.time_quantum_ns,
        workload.min_granularity_ns
    );
    Ok(())
}
