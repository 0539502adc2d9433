//! Binary entry point. Start-up resolves configuration, installs logging,
//! picks the record store once, and then either runs the interactive screen
//! or a single command.
use std::io;

use bmi_tracker::cli::{run_compute, run_history, Cli, Command};
use bmi_tracker::config::{data_dir, CONFIG_FILE_NAME, LOG_FILE_NAME};
use bmi_tracker::logging::init_logging;
use bmi_tracker::{open_store, run_app, App, Config, Tracker};
use clap::Parser;
use tracing::info;

/// Returning a `Result` bubbles fatal start-up problems (unreadable config,
/// unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = data_dir()?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));
    let mut config = Config::load(&config_path)?;
    cli.apply(&mut config)?;

    init_logging(config.log_filter()?, &data_dir.join(LOG_FILE_NAME))?;
    info!(config = %config_path.display(), "starting bmi-tracker");

    let store = open_store(config.resolved_database_path(&data_dir).as_deref())?;
    let tracker = Tracker::new(store, config.record_invalid);

    match cli.command {
        None => {
            let mut app = App::new(tracker);
            run_app(&mut app)
        }
        Some(Command::Compute { weight, height }) => {
            run_compute(&tracker, &weight, &height, &mut io::stdout().lock())
        }
        Some(Command::History) => run_history(&tracker, &mut io::stdout().lock()),
    }
}
