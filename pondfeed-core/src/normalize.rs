//! Locale-tolerant numeric parsing for values typed by field staff.
//!
//! A lone `,` is a thousands separator. When both `,` and `.` appear the one
//! that occurs last is the decimal separator.

use pondfeed_schemas::sample::FieldValue;

/// Parses a free-form numeric string. Never fails: anything unparseable is 0.0.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let canonical = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), _) => cleaned.replace(',', ""),
        (None, _) => cleaned,
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Normalizes an optional input field.
pub fn normalize(value: Option<&FieldValue>) -> f64 {
    match value {
        None => 0.0,
        Some(FieldValue::Number(n)) if n.is_finite() => *n,
        Some(FieldValue::Number(_)) => 0.0,
        Some(FieldValue::Text(text)) => parse_number(text),
    }
}

/// The analyzer's stricter reading of a rendered result value: thousands
/// separators are stripped and the rest must be a plain decimal.
pub fn parse_rendered(raw: &str) -> f64 {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}
