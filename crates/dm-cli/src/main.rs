//! CLI frontend for the dungeon engine.

mod commands;
mod demo;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dm",
    about = "A tick-driven dungeon simulation engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demonstration dungeon and report what happened
    Simulate {
        /// Number of ticks to run (6 ticks per second)
        #[arg(short, long, default_value = "120")]
        ticks: u64,

        /// RNG seed for deterministic results
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Party moves, queued at once: F B L R steps, < > turns
        #[arg(short, long, default_value = demo::ROUTE)]
        route: String,

        /// Show every event, not just the notable ones
        #[arg(short, long)]
        verbose: bool,

        /// Print the event log as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Render the levels of the demonstration dungeon as ASCII
    Draw {
        /// Only draw this level
        #[arg(short, long)]
        level: Option<i32>,
    },

    /// Check the demonstration dungeon for structural errors
    Validate,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            ticks,
            seed,
            route,
            verbose,
            json,
        } => commands::simulate::run(ticks, seed, &route, verbose, json),
        Commands::Draw { level } => commands::draw::run(level),
        Commands::Validate => commands::validate::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
