use clap::Parser;
use demo_headless::options::ConfigArgs;
use demo_headless::report::RunSummary;
use demo_headless::{init_tracing, HostError};
use forest_fire_core::{Simulation, SimulationConfig};
use rayon::prelude::*;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::{error, info};

/// Independent runs of one configuration over consecutive seeds
#[derive(Parser, Debug)]
#[command(name = "batch-run")]
#[command(about = "Parallel forest fire runs, one summary row per seed", long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Number of runs
    #[arg(short, long, default_value_t = 10)]
    iterations: u64,

    /// Ticks per run
    #[arg(short = 'n', long, default_value_t = 100)]
    steps: u64,
}

fn run_one(base: &SimulationConfig, seed: u64, steps: u64) -> Result<RunSummary, HostError> {
    let config = SimulationConfig {
        seed,
        ..base.clone()
    };
    let mut sim = Simulation::new(&config)?;
    sim.run(steps);
    Ok(RunSummary::from_run(seed, &sim))
}

fn run(args: &Args) -> Result<(), HostError> {
    let base = args.config.load()?;
    info!(iterations = args.iterations, steps = args.steps, first_seed = base.seed, "batch started");

    // Output keeps seed order
    let summaries = (0..args.iterations)
        .into_par_iter()
        .map(|i| run_one(&base, base.seed.wrapping_add(i), args.steps))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "{}", RunSummary::HEADER)?;
    for summary in &summaries {
        summary.write_csv_row(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "batch failed");
            ExitCode::FAILURE
        }
    }
}
