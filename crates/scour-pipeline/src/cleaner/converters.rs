//! Per-column conversion functions for data cleaning.
//!
//! Numeric and datetime reinterpretation are all-or-nothing at the column
//! level: a single unparseable non-null value rejects the whole column and
//! the caller keeps the original. This rules out partially-typed columns.

use crate::utils::{clean_numeric_string, looks_like_float, parse_datetime_string};
use anyhow::Result;
use polars::prelude::*;

/// Strip leading/trailing whitespace from every value of a text column.
/// Nulls pass through untouched; a whitespace-only value becomes the empty
/// string, not null.
pub(crate) fn trim_text_series(series: &Series) -> Result<Series> {
    let str_series = series.str()?;
    let mut trimmed: Vec<Option<String>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        trimmed.push(opt_val.map(|val| val.trim().to_string()));
    }

    Ok(Series::new(series.name().clone(), trimmed))
}

/// Reinterpret a text column as numeric, or reject it unchanged.
///
/// Currency/grouping characters are stripped before parsing, so "$1,234.56"
/// counts as numeric. Placeholders like "NA" or the empty string are parse
/// failures, not nulls: a column carrying them stays text. The column lands
/// on `Int64` when every value is integral and `Float64` when any value
/// carries a fractional or exponent marker (or when integer parsing
/// overflows).
pub(crate) fn try_numeric_series(series: &Series) -> Option<Series> {
    let str_series = series.str().ok()?;

    let mut entries: Vec<Option<(String, f64)>> = Vec::with_capacity(str_series.len());
    let mut float_column = false;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let trimmed = val.trim();
                if trimmed.is_empty() {
                    return None;
                }

                let candidate = clean_numeric_string(trimmed);
                let Ok(parsed) = candidate.parse::<f64>() else {
                    return None;
                };

                if looks_like_float(&candidate) {
                    float_column = true;
                }
                entries.push(Some((candidate, parsed)));
            }
            None => entries.push(None),
        }
    }

    // No values at all: reinterpretation succeeds vacuously, but there is no
    // integer evidence, so the column lands on Float64.
    if entries.iter().all(|entry| entry.is_none()) {
        let values: Vec<Option<f64>> = vec![None; entries.len()];
        return Some(Series::new(series.name().clone(), values));
    }

    if !float_column
        && let Some(values) = parse_integer_column(&entries)
    {
        return Some(Series::new(series.name().clone(), values));
    }

    let values: Vec<Option<f64>> = entries
        .iter()
        .map(|entry| entry.as_ref().map(|(_, parsed)| *parsed))
        .collect();
    Some(Series::new(series.name().clone(), values))
}

/// Integer parse of the whole column; `None` when any value overflows i64.
fn parse_integer_column(entries: &[Option<(String, f64)>]) -> Option<Vec<Option<i64>>> {
    let mut values = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Some((candidate, _)) => values.push(Some(candidate.parse::<i64>().ok()?)),
            None => values.push(None),
        }
    }
    Some(values)
}

/// Reinterpret a text column as datetimes, or reject it unchanged.
///
/// Each value may use any of the recognized layouts independently, so a
/// column mixing "2024-03-17" and "17/03/2024" still converts. A single
/// unparseable value (including invalid calendar components like month 13)
/// rejects the column. An all-null column is rejected: there is nothing to
/// reinterpret.
pub(crate) fn try_datetime_series(series: &Series) -> Option<Series> {
    let str_series = series.str().ok()?;

    let mut timestamps: Vec<Option<i64>> = Vec::with_capacity(str_series.len());
    let mut saw_value = false;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let parsed = parse_datetime_string(val.trim())?;
                timestamps.push(Some(parsed.and_utc().timestamp_millis()));
                saw_value = true;
            }
            None => timestamps.push(None),
        }
    }

    if !saw_value {
        return None;
    }

    let timestamp_series = Series::new(series.name().clone(), timestamps);
    timestamp_series
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper function to check if a value at index is null
    fn is_null_at(series: &Series, idx: usize) -> bool {
        matches!(series.get(idx).unwrap(), AnyValue::Null)
    }

    // ========================================================================
    // trim_text_series() tests
    // ========================================================================

    #[test]
    fn test_trim_strips_both_ends() {
        let series = Series::new("v".into(), &["  Alice  ", "\tBob\n", "Cara"]);
        let result = trim_text_series(&series).unwrap();

        assert_eq!(result.str().unwrap().get(0), Some("Alice"));
        assert_eq!(result.str().unwrap().get(1), Some("Bob"));
        assert_eq!(result.str().unwrap().get(2), Some("Cara"));
    }

    #[test]
    fn test_trim_keeps_nulls_and_empties() {
        let series = Series::new("v".into(), &[Some("   "), None, Some("x")]);
        let result = trim_text_series(&series).unwrap();

        assert_eq!(result.str().unwrap().get(0), Some(""));
        assert!(is_null_at(&result, 1));
        assert_eq!(result.str().unwrap().get(2), Some("x"));
    }

    // ========================================================================
    // try_numeric_series() tests
    // ========================================================================

    #[test]
    fn test_numeric_pure_integers_become_int64() {
        let series = Series::new("v".into(), &["1", "2", "-3"]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Int64);
        assert_eq!(result.get(0).unwrap().try_extract::<i64>().unwrap(), 1);
        assert_eq!(result.get(2).unwrap().try_extract::<i64>().unwrap(), -3);
    }

    #[test]
    fn test_numeric_float_marker_forces_float64() {
        let series = Series::new("v".into(), &["1.5", "2"]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.get(0).unwrap().try_extract::<f64>().unwrap(), 1.5);
        assert_eq!(result.get(1).unwrap().try_extract::<f64>().unwrap(), 2.0);
    }

    #[test]
    fn test_numeric_currency_and_grouping() {
        let series = Series::new("amount".into(), &["$1,234.56", "€100.50", "£999.99"]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.get(0).unwrap().try_extract::<f64>().unwrap(), 1234.56);
        assert_eq!(result.get(1).unwrap().try_extract::<f64>().unwrap(), 100.50);
        assert_eq!(result.get(2).unwrap().try_extract::<f64>().unwrap(), 999.99);
    }

    #[test]
    fn test_numeric_scientific_notation_is_float() {
        let series = Series::new("v".into(), &["1e3", "2"]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.get(0).unwrap().try_extract::<f64>().unwrap(), 1000.0);
    }

    #[test]
    fn test_numeric_rejects_column_with_any_non_numeric_value() {
        let series = Series::new("v".into(), &["1", "2", "abc"]);
        assert!(try_numeric_series(&series).is_none());
    }

    #[test]
    fn test_numeric_rejects_placeholders() {
        for placeholder in ["NA", "null", ""] {
            let series = Series::new("v".into(), &["1", placeholder]);
            assert!(
                try_numeric_series(&series).is_none(),
                "column with {placeholder:?} must stay text"
            );
        }
    }

    #[test]
    fn test_numeric_preserves_null_positions() {
        let series = Series::new("v".into(), &[Some("1"), None, Some("2")]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Int64);
        assert!(is_null_at(&result, 1));
        assert_eq!(result.get(2).unwrap().try_extract::<i64>().unwrap(), 2);
    }

    #[test]
    fn test_numeric_all_null_column_converts_to_float() {
        let series = Series::new("v".into(), &[None::<&str>, None]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.null_count(), 2);
    }

    #[test]
    fn test_numeric_compact_date_digits_parse_as_integer() {
        let series = Series::new("v".into(), &["20240317", "20240318"]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Int64);
        assert_eq!(
            result.get(0).unwrap().try_extract::<i64>().unwrap(),
            20240317
        );
    }

    #[test]
    fn test_numeric_i64_overflow_falls_back_to_float() {
        let series = Series::new("v".into(), &["9223372036854775808", "1"]);
        let result = try_numeric_series(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
    }

    #[test]
    fn test_numeric_rejects_non_text_input() {
        let series = Series::new("v".into(), &[1i64, 2]);
        assert!(try_numeric_series(&series).is_none());
    }

    // ========================================================================
    // try_datetime_series() tests
    // ========================================================================

    #[test]
    fn test_datetime_single_format() {
        let series = Series::new("d".into(), &["2024-01-01", "2024-01-02"]);
        let result = try_datetime_series(&series).unwrap();

        assert_eq!(
            result.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        // 2024-01-01T00:00:00Z
        assert_eq!(
            result.get(0).unwrap().try_extract::<i64>().unwrap(),
            1_704_067_200_000
        );
    }

    #[test]
    fn test_datetime_mixed_formats_in_one_column() {
        let series = Series::new(
            "d".into(),
            &[
                "2024-03-17",
                "2024/03/18",
                "17/03/2024",
                "03-17-2024",
                "2024-03-17 10:30:00",
            ],
        );
        let result = try_datetime_series(&series).unwrap();

        assert_eq!(
            result.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(result.null_count(), 0);
    }

    #[test]
    fn test_datetime_rejects_invalid_calendar_component() {
        let series = Series::new("d".into(), &["2024-01-01", "2024-13-01"]);
        assert!(try_datetime_series(&series).is_none());
    }

    #[test]
    fn test_datetime_rejects_column_with_non_date_value() {
        let series = Series::new("d".into(), &["2024-01-01", "not a date"]);
        assert!(try_datetime_series(&series).is_none());
    }

    #[test]
    fn test_datetime_preserves_null_positions() {
        let series = Series::new("d".into(), &[Some("2024-01-01"), None]);
        let result = try_datetime_series(&series).unwrap();

        assert!(is_null_at(&result, 1));
        assert_eq!(result.null_count(), 1);
    }

    #[test]
    fn test_datetime_rejects_all_null_column() {
        let series = Series::new("d".into(), &[None::<&str>, None]);
        assert!(try_datetime_series(&series).is_none());
    }
}
