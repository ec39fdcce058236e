mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pagetree::config::{Config, CONFIG_FILE};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "pagetree")]
#[command(version, about = "pagetree - route tables from a pages directory", long_about = None)]
struct Cli {
    /// Configuration file; the pages directory is resolved relative to it
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log every discovered route and skipped file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated route table
    Routes {
        /// Print route records as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Fail if any page was dropped because of a path conflict
    Check,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)?;

    // Execute command
    match cli.command {
        Commands::Routes { json } => {
            commands::routes::execute(&config, json)?;
        }
        Commands::Check => {
            commands::check::execute(&config)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so `routes --json` output stays parseable
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
