use std::path::{Path, PathBuf};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use point_neuron_models::config::{
    run_experiments, run_experiments_sequential, ExperimentResult, SimulationConfig,
};


#[derive(Parser, Debug)]
#[command(
    name = "point_neuron_models",
    version,
    about = "Simulates Hodgkin Huxley and Izhikevich neurons driven by injected current",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a configuration file parses and every stimulus fits its run
    Validate {
        /// Path to the TOML configuration
        config_path: PathBuf,
    },
    /// Run every experiment of a configuration file and log a summary of each
    Run {
        /// Path to the TOML configuration
        config_path: PathBuf,
        /// Run experiments one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path)?,
        Commands::Run { config_path, sequential } => cmd_run(&config_path, sequential)?,
    }

    Ok(())
}

fn cmd_validate(config_path: &Path) -> anyhow::Result<()> {
    let config = SimulationConfig::from_file(config_path)?;

    info!(
        path = %config_path.display(), 
        experiments = config.experiments.len(), 
        "configuration is valid"
    );

    Ok(())
}

fn cmd_run(config_path: &Path, sequential: bool) -> anyhow::Result<()> {
    let config = SimulationConfig::from_file(config_path)?;

    let results = if sequential {
        run_experiments_sequential(&config.experiments)?
    } else {
        run_experiments(&config.experiments)?
    };

    for result in &results {
        log_summary(result);
    }

    Ok(())
}

fn log_summary(result: &ExperimentResult) {
    let (v_min, v_max) = result.voltage_range()
        .unwrap_or((f64::NAN, f64::NAN));

    info!(
        experiment = %result.name,
        steps = result.output.step_count(),
        spikes = result.output.spike_indices().len(),
        first_spike = ?result.output.spike_indices().first(),
        v_min,
        v_max,
        "summary"
    );

    if let Some(timestep) = result.output.first_non_finite() {
        warn!(experiment = %result.name, timestep, "state became non-finite");
    }
}
