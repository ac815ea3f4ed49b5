//! txscope CLI
//!
//! Runs transaction propagation demos against an in-memory store and
//! prints what the store received.
//!
//! # Commands
//!
//! - `scenario` - Run a propagation scenario and dump the store call log
//! - `version` - Show version information

mod commands;
mod demo;

use clap::{Parser, Subcommand};
use commands::scenario::Scenario;
use tracing_subscriber::EnvFilter;

/// txscope propagation demos.
#[derive(Parser)]
#[command(name = "txscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a propagation scenario and dump the store call log
    Scenario {
        /// Scenario to run
        #[arg(value_enum)]
        name: Scenario,

        /// Commit the enclosing transaction when a nested one fails
        #[arg(long)]
        commit_enclosing: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scenario {
            name,
            commit_enclosing,
            format,
        } => {
            commands::scenario::run(name, commit_enclosing, &format)?;
        }
        Commands::Version => {
            println!("txscope CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("txscope core v{}", txscope_core::VERSION);
        }
    }

    Ok(())
}
