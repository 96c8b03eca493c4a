use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use thruway_tolls::{read_scans, FareSchedule, Simulation};

/// Replay a batch of EZ pass scans and print the trip reports
#[derive(Debug, Parser)]
#[command(name = "thruway-simulator", version)]
struct Args {
    /// Scan file: whitespace-separated "TAG EXIT" pairs
    data_file: PathBuf,

    /// JSON fare schedule (defaults to the built-in Thruway table)
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Report format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write billed trips as CSV to this path
    #[arg(long)]
    billing_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("thruway-simulator: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let schedule = match &args.schedule {
        Some(path) => FareSchedule::from_file(path)?,
        None => FareSchedule::thruway(),
    };

    // Any malformed record aborts the whole run
    let events = read_scans(&args.data_file)?;
    let mut sim = Simulation::new(schedule);
    let applied = sim.replay(events)?;
    info!("Processed {} scans from {:?}", applied, args.data_file);

    let output = match args.format {
        OutputFormat::Text => sim.render_text()?,
        OutputFormat::Json => sim.bundle()?.to_json()?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(output.as_bytes())
        .and_then(|_| out.flush())
        .context("Failed to write reports")?;

    if let Some(path) = &args.billing_csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create billing CSV: {:?}", path))?;
        sim.billing_report()?.write_csv(file)?;
        info!("Wrote billing CSV to {:?}", path);
    }

    Ok(())
}
