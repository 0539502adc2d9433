//! Command-line surface: flags that override `config.toml`, plus two
//! non-interactive commands for scripting.

use std::io::Write;
use std::path::{self, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{Config, StorageBackend};
use crate::tracker::Tracker;

#[derive(Parser, Debug)]
#[command(name = "bmi-tracker")]
#[command(version, about = "Body Mass Index calculator with a local history", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of the data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this SQLite file for the history
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Keep nothing: results are shown but never stored
    #[arg(long, global = true)]
    pub no_storage: bool,

    /// Also store results that are not a number
    #[arg(long, global = true)]
    pub record_invalid: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Compute one BMI value and record it, like pressing Enter on the screen
    Compute {
        /// Weight in pounds
        #[arg(allow_hyphen_values = true)]
        weight: String,
        /// Height in inches
        #[arg(allow_hyphen_values = true)]
        height: String,
    },
    /// Print the stored history, most recent first
    History,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(db) = &self.db {
            let absolute = path::absolute(db)
                .with_context(|| format!("failed to resolve database path {}", db.display()))?;
            config.database_path = Some(absolute);
        }
        if self.no_storage {
            config.storage = StorageBackend::Disabled;
        }
        if self.record_invalid {
            config.record_invalid = true;
        }
        Ok(())
    }
}

/// `compute`: print the display text and category label, one per line.
/// Empty inputs print nothing, mirroring the screen's silent no-op.
pub fn run_compute(
    tracker: &Tracker,
    weight: &str,
    height: &str,
    out: &mut impl Write,
) -> Result<()> {
    let Some(submission) = tracker.submit(weight, height)? else {
        return Ok(());
    };

    let outcome = &submission.outcome;
    writeln!(out, "{}", outcome.display_text()).context("failed to write result")?;
    writeln!(out, "{}", outcome.category_label()).context("failed to write result")?;
    Ok(())
}

/// `history`: one line per stored record.
pub fn run_history(tracker: &Tracker, out: &mut impl Write) -> Result<()> {
    for record in tracker.history()? {
        writeln!(out, "{}", record.history_line()).context("failed to write history")?;
    }
    Ok(())
}
