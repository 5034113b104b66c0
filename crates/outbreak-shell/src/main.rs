//! Outbreak Interactive Shell
//!
//! Text menu for setting up a building, advancing turns, blocking and
//! cleaning rooms, and saving or loading snapshots.
//!
//! Usage:
//!   cargo run -p outbreak-shell
//!   cargo run -p outbreak-shell -- --floors 3 --rooms 4 --seed 7
//!   cargo run -p outbreak-shell -- --config outbreak.json --verbose

mod menu;
mod shell;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use outbreak_core::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::shell::{RunSettings, Shell};

/// Interactive zombie outbreak simulation
#[derive(Parser, Debug)]
#[command(name = "outbreak")]
#[command(about = "Simulate an infection spreading room by room through a building")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Set up a building with this many floors before showing the menu
    #[arg(long, requires = "rooms")]
    floors: Option<usize>,

    /// Rooms per floor for the initial building
    #[arg(long, requires = "floors")]
    rooms: Option<usize>,

    /// Turn cap when running until fully infected
    #[arg(long)]
    max_turns: Option<u64>,

    /// Pause between turns when running until fully infected
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Log simulation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter, which is `warn` (or `debug`
/// with `--verbose`).
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.max_turns.is_some() {
        config.max_turns = args.max_turns;
    }
    if let Some(delay) = args.delay_ms {
        config.turn_delay_ms = delay;
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    log::debug!("Configuration: {:?}", config);

    let mut sim = match Simulation::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let (Some(floors), Some(rooms)) = (args.floors, args.rooms) {
        match sim.setup(floors, rooms) {
            Ok(seed) => println!(
                "Building set up with {} floors of {} rooms. Outbreak started at {}!",
                floors, rooms, seed
            ),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        }
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = Shell::new(sim, RunSettings::from(&config), stdin.lock(), stdout.lock());
    if let Err(e) = shell.run() {
        log::error!("Shell I/O failed: {}", e);
        process::exit(1);
    }
}
