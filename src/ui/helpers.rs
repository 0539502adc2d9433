use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::ListItem;

use crate::models::BmiRecord;

/// Split the screen into title, form, result, history, and footer bands.
pub(crate) fn screen_bands(area: Rect, footer_height: u16) -> [Rect; 5] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(footer_height),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
}

/// One list row per record, in the order given.
pub(crate) fn history_items(records: &[BmiRecord]) -> Vec<ListItem<'static>> {
    records
        .iter()
        .map(|record| ListItem::new(record.history_line()))
        .collect()
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
