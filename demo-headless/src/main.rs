use clap::{Parser, ValueEnum};
use demo_headless::options::ConfigArgs;
use demo_headless::report::{write_ticks_csv, write_ticks_json};
use demo_headless::{init_tracing, HostError};
use forest_fire_core::Simulation;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// Forest fire simulation, one run, per-tick report
#[derive(Parser, Debug)]
#[command(name = "demo-headless")]
#[command(about = "Grid forest fire simulation with regrowth and CO2 accounting", long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Ticks to run
    #[arg(short = 'n', long, default_value_t = 100)]
    steps: u64,

    /// Stop early once nothing is burning
    #[arg(long)]
    until_out: bool,

    /// Report file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

fn run(args: &Args) -> Result<(), HostError> {
    let config = args.config.load()?;
    let mut sim = Simulation::new(&config)?;

    let ran = if args.until_out {
        sim.run_until_fire_out(args.steps)
    } else {
        sim.run(args.steps);
        args.steps
    };

    let last = sim.snapshot();
    info!(
        ticks = ran,
        fine = last.counts.fine,
        burned = last.counts.burned,
        co2_balance = last.co2_balance,
        "run finished"
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    match args.format {
        Format::Csv => write_ticks_csv(&mut out, sim.history())?,
        Format::Json => write_ticks_json(&mut out, sim.history())?,
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
            error!(%err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}
