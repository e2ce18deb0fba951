//! # tracklife
//!
//! CLI for estimating the battery life of LoRa tracking devices.
//!
//! Loads a usage scenario from YAML, runs the estimator, and prints the
//! expected lifetime with a consumption breakdown.

mod report;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracklife_model::{compute_battery_life, load_scenario, HardwareProfile, ModelError};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "tracklife")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate battery life from a YAML scenario file
    Run(RunConfig),
    /// List the built-in hardware tables (products, TX powers, BLE modes)
    Profiles,
}

/// Configuration for the run command
#[derive(Parser, Debug)]
struct RunConfig {
    /// Path to the scenario YAML file
    scenario: PathBuf,

    /// Optional YAML file with hardware profile overrides
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Report output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Machine-readable JSON
    Json,
}

// ============================================================================
// Error Type
// ============================================================================

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
enum RunnerError {
    /// Model error (scenario loading or estimation).
    #[error("{0}")]
    Model(#[from] ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Profile override parse error.
    #[error("Profile parse error: {0}")]
    Profile(#[from] serde_yaml::Error),
}

// ============================================================================
// Commands
// ============================================================================

fn run_command(config: RunConfig) -> Result<(), RunnerError> {
    let profile = match &config.profile {
        Some(path) => {
            let yaml = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&yaml)?
        }
        None => HardwareProfile::default(),
    };

    let scenario = load_scenario(&config.scenario)?;
    let estimate = compute_battery_life(&scenario, &profile)?;

    match config.format {
        OutputFormat::Text => print!("{}", report::format_text(&scenario, &estimate)),
        OutputFormat::Json => println!("{}", report::format_json(&estimate)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    // RUST_LOG controls verbosity; default to warnings only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(config) => run_command(config),
        Commands::Profiles => {
            print!("{}", report::format_profiles(&HardwareProfile::default()));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
