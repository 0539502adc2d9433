use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::models::{BmiRecord, Outcome};
use crate::tracker::Tracker;

use super::forms::{BmiField, BmiForm};
use super::helpers::{history_items, screen_bands, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in the history list.
const HISTORY_PAGE: isize = 5;
/// Title bar background.
const TOOLBAR_COLOR: Color = Color::Rgb(0xf4, 0x51, 0x1e);

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// State of the single calculator screen.
pub struct App {
    tracker: Tracker,
    form: BmiForm,
    outcome: Option<Outcome>,
    history: Vec<BmiRecord>,
    /// Highlighted history row; the list scrolls to keep it visible.
    history_selected: usize,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the screen and perform the initial history load. A failing load
    /// is reported in the footer rather than aborting start-up.
    pub fn new(tracker: Tracker) -> Self {
        let mut app = Self {
            tracker,
            form: BmiForm::default(),
            outcome: None,
            history: Vec::new(),
            history_selected: 0,
            status: None,
        };
        app.reload_history();
        app
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.form.toggle_field();
            }
            KeyCode::Enter => self.compute_bmi(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::PageUp => self.move_history_selection(-HISTORY_PAGE),
            KeyCode::PageDown => self.move_history_selection(HISTORY_PAGE),
            KeyCode::Home => self.history_selected = 0,
            KeyCode::End => self.history_selected = self.history.len().saturating_sub(1),
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
        false
    }

    fn move_history_selection(&mut self, offset: isize) {
        if self.history.is_empty() {
            return;
        }
        let last = self.history.len() - 1;
        self.history_selected = self.history_selected.saturating_add_signed(offset).min(last);
    }

    /// Ctrl+U wipes the focused field.
    pub(crate) fn handle_ctrl_u(&mut self) {
        self.form.clear_active();
    }

    /// Run the calculator on the current inputs, record the result, and
    /// refresh the history. Empty fields leave everything untouched.
    fn compute_bmi(&mut self) {
        let Some(outcome) = self.tracker.compute(&self.form.weight, &self.form.height) else {
            return;
        };

        let recorded = self
            .tracker
            .record(&outcome, &self.form.weight, &self.form.height);
        self.outcome = Some(outcome);

        match recorded {
            Ok(Some(record)) => {
                self.history_selected = 0;
                self.reload_history();
                if self.tracker.storage_enabled() {
                    if self.status.is_none() {
                        let text = format!(
                            "Recorded {} (W:{}, H:{}).",
                            record.bmi, record.weight, record.height
                        );
                        self.set_status(text, StatusKind::Info);
                    }
                } else {
                    self.set_status("Storage is disabled; result not saved.", StatusKind::Info);
                }
            }
            Ok(None) => {
                self.set_status("Result is not a number; nothing recorded.", StatusKind::Info);
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to record BMI result");
                self.set_status(
                    format!("Failed to save result: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn reload_history(&mut self) {
        self.clear_status();
        match self.tracker.history() {
            Ok(history) => {
                self.history = history;
                self.history_selected = self
                    .history_selected
                    .min(self.history.len().saturating_sub(1));
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to load BMI history");
                self.set_status(
                    format!("Failed to load history: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let [title_area, form_area, result_area, history_area, footer_area] =
            screen_bands(area, FOOTER_HEIGHT.min(area.height));

        self.draw_title(frame, title_area);
        self.draw_form(frame, form_area);
        self.draw_result(frame, result_area);
        self.draw_history(frame, history_area);
        self.draw_footer(frame, footer_area);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "BMI Calculator",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM))
        .style(Style::default().bg(TOOLBAR_COLOR));
        frame.render_widget(title, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Compute BMI").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let lines = vec![
            self.form.build_line(BmiField::Weight),
            self.form.build_line(BmiField::Height),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        let row = match self.form.active {
            BmiField::Weight => 0,
            BmiField::Height => 1,
        };
        if inner.height > row {
            let active = self.form.active;
            let typed = BmiForm::prefix(active).len() + self.form.value_len(active);
            let cursor_x = inner
                .x
                .saturating_add(u16::try_from(typed).unwrap_or(u16::MAX))
                .min(inner.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_result(&self, frame: &mut Frame, area: Rect) {
        let (text, label) = match &self.outcome {
            Some(outcome) => (outcome.display_text(), outcome.category_label()),
            None => (String::new(), String::new()),
        };
        let style = Style::default().add_modifier(Modifier::BOLD);
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(text, style)),
            Line::from(Span::styled(label, style)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_history(&self, frame: &mut Frame, area: Rect) {
        if !self.tracker.storage_enabled() {
            let notice = Paragraph::new("Storage is disabled on this platform")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(notice, area);
            return;
        }

        if self.history.is_empty() {
            return;
        }

        let list = List::new(history_items(&self.history))
            .block(Block::default().title("BMI History").borders(Borders::TOP))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(self.history_selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let instructions = Line::from(vec![
            Span::styled("[Tab]", key_style),
            Span::raw(" Field  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Compute  "),
            Span::styled("[Ctrl+U]", key_style),
            Span::raw(" Clear  "),
            Span::styled("[PgUp/PgDn]", key_style),
            Span::raw(" History  "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Quit"),
        ]);

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(all(test, not(target_family = "wasm")))]
mod tests {
    use super::*;
    use crate::db::{NullStore, RecordStore, SqliteStore};
    use anyhow::{anyhow, Result};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn sqlite_app() -> App {
        let store = SqliteStore::open_in_memory().unwrap();
        App::new(Tracker::new(Box::new(store), false))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    /// Store whose writes always fail, for exercising the error footer.
    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn append(&self, _bmi: &str, _weight: &str, _height: &str) -> Result<BmiRecord> {
            Err(anyhow!("database is locked"))
        }

        fn list_all(&self) -> Result<Vec<BmiRecord>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn enter_computes_and_records() {
        let mut app = sqlite_app();
        type_text(&mut app, "150");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "70");
        assert!(!app.handle_key(KeyCode::Enter));

        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.display_text(), "Body Mass Index is 21.5");
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].bmi, "21.5");
    }

    #[test]
    fn each_compute_adds_a_history_row() {
        let mut app = sqlite_app();
        type_text(&mut app, "150");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "70");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Tab);
        app.handle_ctrl_u();
        type_text(&mut app, "250");
        app.handle_key(KeyCode::Tab);
        app.handle_ctrl_u();
        type_text(&mut app, "68");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.history.len(), 2);
        let mut bmis: Vec<&str> = app.history.iter().map(|record| record.bmi.as_str()).collect();
        bmis.sort_unstable();
        assert_eq!(bmis, ["21.5", "38.0"]);
        assert_eq!(app.outcome.as_ref().unwrap().category_label(), "(Obese)");
    }

    #[test]
    fn history_scrolls_to_older_records() {
        let mut app = sqlite_app();
        for weight in 100..130 {
            app.form.weight = weight.to_string();
            app.form.height = "70".to_string();
            app.handle_key(KeyCode::Enter);
        }
        assert_eq!(app.history.len(), 30);

        let first = app.history.first().unwrap().history_line();
        let last = app.history.last().unwrap().history_line();
        let screen = render(&app);
        assert!(screen.contains(&first));
        assert!(!screen.contains(&last));

        app.handle_key(KeyCode::End);
        let screen = render(&app);
        assert!(screen.contains(&last));
        assert!(!screen.contains(&first));

        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.history_selected, 24);
        app.handle_key(KeyCode::Home);
        assert!(render(&app).contains(&first));

        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.history_selected, 5);
    }

    #[test]
    fn long_input_keeps_cursor_inside_the_form() {
        let mut app = sqlite_app();
        app.form.weight = "9".repeat(70_000);
        let screen = render(&app);
        assert!(screen.contains("Height in Inches"));
        assert!(screen.contains("[Esc] Quit"));
    }

    #[test]
    fn empty_field_changes_nothing() {
        let mut app = sqlite_app();
        type_text(&mut app, "150");
        app.handle_key(KeyCode::Enter);

        assert!(app.outcome.is_none());
        assert!(app.history.is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn escape_quits() {
        let mut app = sqlite_app();
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn storage_errors_are_shown_not_fatal() {
        let mut app = App::new(Tracker::new(Box::new(BrokenStore), false));
        type_text(&mut app, "150");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "70");
        app.handle_key(KeyCode::Enter);

        let status = app.status.as_ref().unwrap();
        assert!(matches!(status.kind, StatusKind::Error));
        assert!(status.text.contains("database is locked"));
        assert_eq!(
            app.outcome.as_ref().unwrap().display_text(),
            "Body Mass Index is 21.5"
        );
    }

    #[test]
    fn render_shows_result_and_history() {
        let mut app = sqlite_app();
        type_text(&mut app, "150");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "70");
        app.handle_key(KeyCode::Enter);

        let screen = render(&app);
        assert!(screen.contains("BMI Calculator"));
        assert!(screen.contains("Body Mass Index is 21.5"));
        assert!(screen.contains("(Healthy)"));
        assert!(screen.contains("BMI History"));
        assert!(screen.contains("21.5  (W:150, H:70)"));
    }

    #[test]
    fn render_hides_empty_history() {
        let app = sqlite_app();
        let screen = render(&app);
        assert!(screen.contains("Weight in Pounds"));
        assert!(screen.contains("Height in Inches"));
        assert!(!screen.contains("BMI History"));
    }

    #[test]
    fn render_notes_disabled_storage() {
        let mut app = App::new(Tracker::new(Box::new(NullStore), false));
        type_text(&mut app, "150");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "70");
        app.handle_key(KeyCode::Enter);

        let screen = render(&app);
        assert!(screen.contains("Storage is disabled on this platform"));
        assert!(app.history.is_empty());
    }
}
