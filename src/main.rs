//! Satscope - headless driver for the orbital-state engine
//!
//! Loads a tracked-object snapshot, applies the filter given on the command
//! line and prints orbits, orbital parameters, frame states or statistics.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{FramesArgs, InfoArgs, OrbitsArgs, ScanArgs, SceneArgs};

#[derive(Parser, Debug)]
#[command(name = "satscope", version, about = "Satellite orbit scene engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one-revolution orbit tracks for the visible objects
    Orbits(OrbitsArgs),
    /// Show the info panel for one object
    Info(InfoArgs),
    /// Dump animated marker states for a range of frames
    Frames(FramesArgs),
    /// Show object and category statistics
    Stats(SceneArgs),
    /// Request a collision scan from the data source
    Scan(ScanArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli.command);

    match cli.command {
        Command::Orbits(args) => commands::run_orbits(args),
        Command::Info(args) => commands::run_info(args),
        Command::Frames(args) => commands::run_frames(args),
        Command::Stats(args) => commands::run_stats(args),
        Command::Scan(args) => commands::run_scan(args),
    }
}
