use anyhow::{Context, Result};
use assay::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::BufRead;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show how each description is parsed and valued
    Parse {
        /// Item descriptions, e.g. "403g sterling silver"
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Price item descriptions given as arguments or one per stdin line
    Quote {
        /// Item descriptions; reads stdin when omitted
        items: Vec<String>,
    },
    /// Start the interactive buy desk
    Desk,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => assay::cli::setup::setup(),
        Some(Commands::Parse { items }) => {
            assay::run_command(assay::AppCommand::Parse(items), config_path)
        }
        Some(Commands::Quote { items }) => read_items(items).and_then(|items| {
            assay::run_command(assay::AppCommand::Quote(items), config_path)
        }),
        Some(Commands::Desk) => assay::run_command(assay::AppCommand::Desk, config_path),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn read_items(items: Vec<String>) -> Result<Vec<String>> {
    if !items.is_empty() {
        return Ok(items);
    }
    std::io::stdin()
        .lock()
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to read items from stdin")
}
