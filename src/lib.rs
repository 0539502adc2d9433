//! Core library surface for the BMI tracker.
//!
//! The binary is a thin shell around these modules: the calculator does the
//! arithmetic, the persistence layer keeps the history, and the UI ties both
//! to a terminal screen.
pub mod calculator;
pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod tracker;
pub mod ui;

/// Persistence entry points used by `main.rs` and the tests.
pub use db::{open_store, NullStore, RecordStore};
#[cfg(not(target_family = "wasm"))]
pub use db::SqliteStore;

/// Domain types passed between layers.
pub use models::{BmiRecord, Category, Outcome};

pub use calculator::compute;
pub use config::{Config, ConfigError};
pub use tracker::{Submission, Tracker};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
