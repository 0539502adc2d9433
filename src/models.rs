//! Domain models shared by the calculator, the record store, and the TUI. The
//! types stay plain data holders so the persistence layer and the screen can
//! pass them around without dragging behavior along.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One historical BMI entry as stored in the `BMI` table.
pub struct BmiRecord {
    /// Store-assigned primary key. Never reused or rewritten.
    pub id: i64,
    /// Formatted index with one fractional digit, e.g. `"24.9"`. Kept as text
    /// because invalid computations may be recorded as `"NaN"`.
    pub bmi: String,
    /// Weight exactly as the user typed it (pounds).
    pub weight: String,
    /// Height exactly as the user typed it (inches).
    pub height: String,
    /// Insertion timestamp projected to `YYYY-MM-DD`. Empty for records that
    /// never reached durable storage.
    pub recorded_on: String,
}

impl BmiRecord {
    /// Render the row the way the history list shows it.
    pub fn history_line(&self) -> String {
        format!(
            "{}:  {}  (W:{}, H:{})",
            self.recorded_on, self.bmi, self.weight, self.height
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Qualitative bucket derived from the unrounded index.
pub enum Category {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl Category {
    /// Classify a raw index. The ranges are strict on both ends, so exact
    /// boundary values (18.5, 24.9, 29.9) and the whole `[24.9, 25]` band fall
    /// through to `None`, as do non-positive and NaN inputs.
    pub fn classify(bmi: f64) -> Option<Self> {
        if bmi > 0.0 && bmi < 18.5 {
            Some(Category::Underweight)
        } else if bmi > 18.5 && bmi < 24.9 {
            Some(Category::Healthy)
        } else if bmi > 25.0 && bmi < 29.9 {
            Some(Category::Overweight)
        } else if bmi > 29.9 {
            Some(Category::Obese)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Healthy => "Healthy",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }
}

impl fmt::Display for Category {
    /// Parenthesized label, ready for the result area.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Result of one compute action with non-empty inputs.
pub struct Outcome {
    /// Unrounded index. NaN when a field did not parse, infinite for a zero
    /// height.
    pub value: f64,
    /// Fixed-point rendering with one fractional digit.
    pub formatted: String,
    pub category: Option<Category>,
}

impl Outcome {
    /// Anything but NaN is reported, infinities included.
    pub fn is_valid(&self) -> bool {
        !self.value.is_nan()
    }

    /// `"Body Mass Index is 21.5"`, or an empty string for invalid results.
    pub fn display_text(&self) -> String {
        if self.is_valid() {
            format!("Body Mass Index is {}", self.formatted)
        } else {
            String::new()
        }
    }

    /// `"(Healthy)"` and friends, or an empty string when unclassified.
    pub fn category_label(&self) -> String {
        self.category
            .map(|category| category.to_string())
            .unwrap_or_default()
    }
}
