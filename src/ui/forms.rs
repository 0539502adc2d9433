use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Input state for the weight/height form. Values are kept exactly as typed;
/// the calculator does its own lenient parsing.
#[derive(Default, Clone)]
pub(crate) struct BmiForm {
    pub(crate) weight: String,
    pub(crate) height: String,
    pub(crate) active: BmiField,
}

/// Fields available within the form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum BmiField {
    #[default]
    Weight,
    Height,
}

impl BmiField {
    /// Prompt rendered in front of the value.
    pub(crate) fn label(self) -> &'static str {
        match self {
            BmiField::Weight => "Weight",
            BmiField::Height => "Height",
        }
    }

    /// Hint shown while the field is empty.
    pub(crate) fn placeholder(self) -> &'static str {
        match self {
            BmiField::Weight => "Weight in Pounds",
            BmiField::Height => "Height in Inches",
        }
    }
}

impl BmiForm {
    /// Swap focus between weight and height.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BmiField::Weight => BmiField::Height,
            BmiField::Height => BmiField::Weight,
        };
    }

    /// Append a character to the active field. Control characters are
    /// rejected; everything else is accepted.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.active_value_mut().push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        self.active_value_mut().pop();
    }

    /// Empty the active field.
    pub(crate) fn clear_active(&mut self) {
        self.active_value_mut().clear();
    }

    pub(crate) fn value(&self, field: BmiField) -> &str {
        match field {
            BmiField::Weight => &self.weight,
            BmiField::Height => &self.height,
        }
    }

    fn active_value_mut(&mut self) -> &mut String {
        match self.active {
            BmiField::Weight => &mut self.weight,
            BmiField::Height => &mut self.height,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BmiField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let (display, style) = if value.is_empty() {
            (
                field.placeholder().to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else if is_active {
            (value.to_string(), Style::default().fg(Color::Yellow))
        } else {
            (value.to_string(), Style::default())
        };

        Line::from(vec![
            Span::raw(Self::prefix(field)),
            Span::styled(display, style),
        ])
    }

    /// `"Weight: "` and friends; also used to place the cursor.
    pub(crate) fn prefix(field: BmiField) -> String {
        format!("{}: ", field.label())
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: BmiField) -> usize {
        self.value(field).chars().count()
    }
}
