use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, error, debug, trace};
use std::path::PathBuf;
use std::time::Instant;

use trajectory_common::ScenarioConfig;
use trajectory_engine::output::{self, TraceFormat};
use trajectory_engine::scenario;

/// Command-line arguments for the trajectory engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario configuration file (.toml)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the number of steps from the configuration
    #[arg(long)]
    steps: Option<u64>,

    /// Run without writing trace files
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Trajectory Engine...");

    // --- Load Configuration ---
    let mut config = ScenarioConfig::load(&args.config)?;
    if let Some(steps) = args.steps {
        if steps == 0 {
            anyhow::bail!("--steps must be greater than 0.");
        }
        config.timing.total_steps = steps;
    }
    let params = config.run_params();
    debug!("Run Parameters: {:#?}", params);

    // --- Build and lock the universe ---
    let mut universe = scenario::build_universe(&config)?;
    if params.parallel_forces {
        info!("Using {} Rayon threads for the force phase.", rayon::current_num_threads());
    }
    universe.lock()?;
    let mut observers = scenario::observers(&config);

    // --- Simulation Loop ---
    info!(
        "Starting simulation loop for {} steps ({:.2} simulated days)...",
        params.total_steps,
        params.simulated_seconds / 86_400.0
    );
    let progress = ProgressBar::new(params.total_steps);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} steps ({eta})")?
            .progress_chars("#>-"),
    );

    let start_time = Instant::now();
    for time in 0..params.total_steps {
        let step_start_time = Instant::now();
        if let Err(e) = universe.advance(time) {
            progress.abandon();
            error!("Error during simulation step {}: {}", time, e);
            anyhow::bail!("Simulation step failed.");
        }
        for observer in observers.iter_mut() {
            observer.observe(time, &universe);
        }
        trace!(
            "Step [{}/{}] completed in {:.3} ms",
            time + 1,
            params.total_steps,
            step_start_time.elapsed().as_secs_f64() * 1000.0
        );
        progress.inc(1);
    }
    progress.finish();

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds.",
        total_duration.as_secs_f64()
    );
    for body in universe.bodies() {
        if body.pending_kicks() > 0 {
            warn!(
                "'{}' still has {} kick event(s) that never fired.",
                body.name(),
                body.pending_kicks()
            );
        }
    }

    // --- Save Recorded Traces ---
    if params.save_traces && !args.no_save {
        let format = TraceFormat::from_name(config.output.format.as_deref());
        let records = output::collect_traces(&universe, params.trace_stride);
        let path = output::trace_path(&config.output.base_filename, format);
        output::write_traces(&path, format, &records)?;
    } else {
        info!("Skipping saving traces.");
    }

    info!("Simulation Complete.");
    Ok(())
}
