//! Ratatui front-end: one screen with the weight/height form, the latest
//! result, and the stored history underneath.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
