//! Entry point for the time-tracking terminal application.
//! Loads the configuration, opens the database and hands control to the shell.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use timetracking::infra::app_config::{config_path, load_or_init};
use timetracking::infra::db::Database;
use timetracking::shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "timetracking")]
#[command(version)]
#[command(about = "Track working time per project from the terminal", long_about = None)]
struct Args {
    /// Configuration file (default: $TIMETRACKING_CONFIG_PATH or ./app_config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file, overrides the configured one
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let path = config_path(args.config.as_deref());
    let mut config = load_or_init(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    if let Some(database) = args.database {
        config.database_file = database;
    }
    log::info!(
        "Using {} database {}",
        config.database_driver,
        config.resolved_database_file().display()
    );

    let db = Database::open(&config)?;
    let interactive = console::Term::stdout().is_term();
    let stdin = std::io::stdin();
    let mut shell = Shell::new(db.repository(), stdin.lock(), std::io::stdout(), interactive);
    shell.run()?;

    log::info!("Bye");
    Ok(())
}
