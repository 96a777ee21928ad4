pub mod cli;
pub mod core;

use crate::cli::desk::{Desk, Outcome};
use crate::core::config::AppConfig;
use crate::core::session::{DEFAULT_SESSION_HOURS, SessionStore};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Show how each line is read and valued
    Parse(Vec<String>),
    /// Price a batch of lines as a single quote
    Quote(Vec<String>),
    /// Interactive buy desk
    Desk,
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Assay starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    let market = config.market_config();

    match command {
        AppCommand::Parse(lines) => {
            let items: Vec<_> = lines.iter().map(|line| crate::core::parse(line)).collect();
            println!(
                "{}",
                cli::quote::display_parsed(&items, &market, &config.currency)
            );
            Ok(())
        }
        AppCommand::Quote(lines) => cli::quote::run(&lines, &market, &config.currency),
        AppCommand::Desk => run_desk(&config),
    }
}

fn run_desk(config: &AppConfig) -> Result<()> {
    let session_hours = config
        .auth
        .as_ref()
        .map_or(DEFAULT_SESSION_HOURS, |auth| auth.session_hours);
    let store = SessionStore::new(
        config.data_path()?.join("session.json"),
        chrono::Duration::hours(session_hours),
    );

    let session = cli::login::ensure_signed_in(config.auth.as_ref(), &store)?;
    if let Some(session) = &session {
        println!("Signed in as {}", session.username);
    }

    let mut desk = Desk::new(config.market_config(), &config.currency);
    let stdin = std::io::stdin();
    let outcome = cli::desk::run(&mut desk, stdin.lock(), std::io::stdout())?;

    if outcome == Outcome::Logout {
        store.clear();
        println!("Signed out");
    }
    if !desk.ledger().is_empty() {
        cli::ui::print_separator();
        println!("{}", desk.display_quote());
    }
    Ok(())
}
