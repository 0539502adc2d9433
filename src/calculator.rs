//! Pure BMI arithmetic using the US customary formula (pounds and inches).
//! Nothing in here touches storage; callers decide what to persist.

use crate::models::{Category, Outcome};

/// Scale factor converting lb/in² into kg/m².
const IMPERIAL_FACTOR: f64 = 703.0;
/// Smallest magnitude printed in exponent form instead of fixed point.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Run one compute action on the raw field contents.
///
/// Returns `None` when either field is empty, which callers treat as a silent
/// no-op. Whitespace-only text is not empty; it parses as "not a number" and
/// yields an invalid outcome instead.
pub fn compute(weight_text: &str, height_text: &str) -> Option<Outcome> {
    if weight_text.is_empty() || height_text.is_empty() {
        return None;
    }

    let weight = parse_leading_int(weight_text).unwrap_or(f64::NAN);
    let height = parse_leading_int(height_text).unwrap_or(f64::NAN);
    Some(outcome_for(bmi_value(weight, height)))
}

/// `(weight / height²) * 703` without any rounding.
pub fn bmi_value(weight: f64, height: f64) -> f64 {
    (weight / (height * height)) * IMPERIAL_FACTOR
}

/// Wrap a raw index into an [`Outcome`], classifying the unrounded value.
/// A zero height yields an infinite index, which classifies like any other
/// value above 29.9.
pub fn outcome_for(value: f64) -> Outcome {
    Outcome {
        value,
        formatted: format_one_decimal(value),
        category: Category::classify(value),
    }
}

/// Whether an outcome should be appended to the history. Valid results are
/// always recorded; NaN ones only when `record_invalid` is set.
pub fn should_record(outcome: &Outcome, record_invalid: bool) -> bool {
    record_invalid || outcome.is_valid()
}

/// Lenient integer parse: skip leading whitespace, accept an optional sign and
/// an optional `0x` prefix, then consume the longest digit run. Anything after
/// the digits is ignored (`"12.7kg"` parses as `12`). Returns `None` when no
/// digit was found.
pub fn parse_leading_int(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let mut value = 0.0_f64;
    let mut seen_digit = false;
    for ch in digits.chars() {
        match ch.to_digit(radix) {
            Some(digit) => {
                value = value * f64::from(radix) + f64::from(digit);
                seen_digit = true;
            }
            None => break,
        }
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Fixed-point rendering with one fractional digit.
///
/// Exact halfway cases round away from zero. Non-finite values render as
/// `NaN`, `Infinity`, or `-Infinity`, and negative zero renders as `0.0`.
/// Magnitudes of `1e21` and above switch to exponent notation (`7.03e+25`).
pub fn format_one_decimal(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return format!("{value:e}").replacen('e', "e+", 1);
    }

    // A double sits exactly halfway between two tenths only when it ends in
    // .25 or .75, i.e. four times its magnitude is an odd integer.
    let quarters = value.abs() * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let tenths = (value.abs() * 10.0).ceil();
        return format!("{:.1}", tenths.copysign(value) / 10.0);
    }

    format!("{value:.1}")
}
