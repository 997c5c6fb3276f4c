//! Deterministic baseline scan.
//!
//! Runs independently of generation and reports the two structural issues
//! a dataset can carry regardless of content: missing cells and fully
//! duplicated rows. The scan never mutates the dataset.

use crate::types::BaselineReport;
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Checker producing the [`BaselineReport`] shown alongside generated
/// suggestions.
pub struct BaselineChecker;

impl BaselineChecker {
    /// Scan for missing cells and duplicate rows.
    pub fn scan(df: &DataFrame) -> Result<BaselineReport> {
        let missing_values = df
            .get_columns()
            .iter()
            .map(|col| col.null_count())
            .sum::<usize>();

        // A duplicate row matches another row on every column.
        let deduplicated = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let duplicate_rows = df.height() - deduplicated.height();

        debug!(missing_values, duplicate_rows, "Baseline scan complete");

        Ok(BaselineReport {
            missing_values: missing_values > 0,
            duplicate_rows: duplicate_rows > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_dataset_reports_no_issues() {
        let df = df!(
            "id" => &[1i64, 2, 3],
            "name" => &["a", "b", "c"],
        )
        .unwrap();
        let report = BaselineChecker::scan(&df).unwrap();
        assert_eq!(report.missing_values, 0);
        assert_eq!(report.duplicate_rows, 0);
        assert!(report.is_clean());
        assert_eq!(report.render(), "Baseline scan detected: No major issues");
    }

    #[test]
    fn test_missing_values_counted_across_columns() {
        let df = df!(
            "a" => &[Some(1i64), None, Some(3)],
            "b" => &[None::<&str>, None, Some("x")],
        )
        .unwrap();
        let report = BaselineChecker::scan(&df).unwrap();
        assert_eq!(report.missing_values, 3);
        assert!(report.render().contains("Missing values found"));
    }

    #[test]
    fn test_duplicate_rows_counted() {
        let df = df!(
            "id" => &[1i64, 2, 1, 1],
            "name" => &["a", "b", "a", "a"],
        )
        .unwrap();
        let report = BaselineChecker::scan(&df).unwrap();
        assert_eq!(report.duplicate_rows, 2);
        assert!(report.render().contains("Duplicate rows found"));
    }

    #[test]
    fn test_partial_row_match_is_not_a_duplicate() {
        let df = df!(
            "id" => &[1i64, 1],
            "name" => &["a", "b"],
        )
        .unwrap();
        let report = BaselineChecker::scan(&df).unwrap();
        assert_eq!(report.duplicate_rows, 0);
    }

    #[test]
    fn test_both_issues_reported_together() {
        let df = df!(
            "id" => &[Some(1i64), Some(1), None],
            "name" => &[Some("a"), Some("a"), None],
        )
        .unwrap();
        let report = BaselineChecker::scan(&df).unwrap();
        assert_eq!(report.missing_values, 2);
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(
            report.render(),
            "Baseline scan detected: Missing values found, Duplicate rows found"
        );
    }
}
