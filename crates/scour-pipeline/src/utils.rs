//! Shared utilities for the profiling and cleaning pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Numeric String Parsing
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped
/// before parsing.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
///
/// # Example
///
/// ```rust,ignore
/// use scour_pipeline::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// assert_eq!(clean_numeric_string("  42%  "), "42");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Check if a string value looks like a float (has decimal point or fractional part).
pub fn looks_like_float(s: &str) -> bool {
    let cleaned = clean_numeric_string(s);
    if let Ok(num) = cleaned.parse::<f64>() {
        cleaned.contains('.') || num.fract() != 0.0
    } else {
        false
    }
}

// =============================================================================
// Date/Time String Parsing
// =============================================================================

/// Date/time layouts accepted by whole-column date coercion, tried in order.
///
/// Year position and separator disambiguate the short layouts: slashed
/// year-last dates are day-first, dashed year-last dates are month-first.
pub const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m-%d-%Y",
];

// Date shape regexes, compiled once at startup. Cheap pre-filter so the
// format list is only tried on plausibly date-shaped values.
static DATE_SHAPE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}$").expect("Invalid regex: datetime"),
    ]
});

/// Check whether a trimmed string has the shape of a supported date layout.
pub fn looks_like_date(s: &str) -> bool {
    DATE_SHAPE_PATTERNS.iter().any(|re| re.is_match(s))
}

/// Try to parse a string as a date or datetime using [`DATETIME_FORMATS`].
///
/// Date-only layouts resolve to midnight. Returns `None` when no layout
/// accepts the value (including calendar-invalid components like month 13).
pub fn parse_datetime_string(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if !looks_like_date(trimmed) {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

// =============================================================================
// Value Rendering
// =============================================================================

/// Render a single cell value as plain text.
///
/// Strings render bare (no surrounding quotes), nulls render as "null",
/// everything else uses the polars display form.
pub fn stringify_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "null".to_string(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{}", other),
    }
}

/// Collect up to `max_examples` non-null values from a Series, in row order.
pub fn collect_example_values(series: &Series, max_examples: usize) -> Vec<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Vec::new();
    }

    let count = std::cmp::min(max_examples, non_null.len());
    let mut examples = Vec::with_capacity(count);

    for i in 0..count {
        if let Ok(val) = non_null.get(i) {
            examples.push(stringify_cell(&val));
        }
    }

    examples
}

// =============================================================================
// Tests
// =============================================================================
