//! Deterministic dataset cleaning.
//!
//! Cleaning runs the same fixed passes in the same order on every dataset
//! and never consults generated suggestions, so a cleaned artifact is
//! auditable on its own:
//!
//! 1. Trim whitespace in text columns
//! 2. Numeric reinterpretation, all-or-nothing per column
//! 3. Datetime reinterpretation for columns still text, same policy
//! 4. Drop exact duplicate rows, keeping the first occurrence
//!
//! The input frame is never mutated; cleaning produces a new frame plus a
//! list of human-readable actions taken.

mod converters;

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fallback artifact base name when the source file name is unknown.
const DEFAULT_ARTIFACT_BASE: &str = "dataset";

/// Suffix appended to every cleaned artifact file name.
const ARTIFACT_SUFFIX: &str = "_cleaned.csv";

/// Cleaner applying the fixed deterministic passes.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a dataset, returning the new frame and the actions performed.
    pub fn clean(df: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut cleaned = df.clone();
        let mut actions = Vec::new();

        info!(
            rows = df.height(),
            columns = df.width(),
            "Cleaning dataset"
        );

        // 1. Trim whitespace in text columns
        let text_columns = Self::text_column_names(&cleaned);
        for col_name in &text_columns {
            let col = cleaned.column(col_name)?;
            let trimmed = converters::trim_text_series(col.as_materialized_series())?;
            cleaned.replace(col_name, trimmed)?;
        }
        if text_columns.is_empty() {
            actions.push("No text columns to trim".to_string());
        } else {
            actions.push(format!(
                "Trimmed whitespace in {} text columns",
                text_columns.len()
            ));
            debug!("Trimmed whitespace in {} text columns", text_columns.len());
        }

        // 2. Numeric reinterpretation, all-or-nothing per column
        let mut numeric_columns: Vec<String> = Vec::new();
        for col_name in Self::text_column_names(&cleaned) {
            let col = cleaned.column(&col_name)?;
            if let Some(numeric) = converters::try_numeric_series(col.as_materialized_series()) {
                let dtype = numeric.dtype().clone();
                cleaned.replace(&col_name, numeric)?;
                debug!(column = %col_name, dtype = %dtype, "Reinterpreted column as numeric");
                numeric_columns.push(col_name);
            }
        }
        if numeric_columns.is_empty() {
            actions.push("No columns reinterpreted as numeric".to_string());
        } else {
            actions.push(format!(
                "Reinterpreted {} columns as numeric: {:?}",
                numeric_columns.len(),
                numeric_columns
            ));
        }

        // 3. Datetime reinterpretation for columns still text
        let mut datetime_columns: Vec<String> = Vec::new();
        for col_name in Self::text_column_names(&cleaned) {
            let col = cleaned.column(&col_name)?;
            if let Some(datetimes) = converters::try_datetime_series(col.as_materialized_series())
            {
                cleaned.replace(&col_name, datetimes)?;
                debug!(column = %col_name, "Reinterpreted column as datetime");
                datetime_columns.push(col_name);
            }
        }
        if datetime_columns.is_empty() {
            actions.push("No columns reinterpreted as datetime".to_string());
        } else {
            actions.push(format!(
                "Reinterpreted {} columns as datetime: {:?}",
                datetime_columns.len(),
                datetime_columns
            ));
        }

        // 4. Drop exact duplicate rows, keeping the first occurrence
        let before_duplicates = cleaned.height();
        cleaned = cleaned.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let duplicates_removed = before_duplicates - cleaned.height();

        if duplicates_removed > 0 {
            let pct = (duplicates_removed as f64 / before_duplicates as f64) * 100.0;
            actions.push(format!(
                "Removed {} duplicate rows ({:.1}%)",
                duplicates_removed, pct
            ));
            debug!("Removed {} duplicate rows", duplicates_removed);
        } else {
            actions.push("No duplicate rows found".to_string());
        }

        Ok((cleaned, actions))
    }

    /// Write a cleaned frame to a uniquely-named CSV artifact.
    ///
    /// The file name is "{base}_{random}_cleaned.csv" where base is the
    /// source file's stem. A random infix keeps concurrent cleaning requests
    /// from colliding. The file is persisted (not deleted on drop).
    pub fn write_artifact(
        df: &mut DataFrame,
        source_name: Option<&str>,
        artifact_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let base = source_name
            .map(Path::new)
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_ARTIFACT_BASE);

        let prefix = format!("{base}_");
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(&prefix)
            .suffix(ARTIFACT_SUFFIX);

        let mut file = match artifact_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create artifact dir {}", dir.display()))?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .context("Failed to write cleaned CSV")?;

        let (_handle, path) = file
            .keep()
            .context("Failed to persist cleaned artifact")?;
        info!(path = %path.display(), rows = df.height(), "Wrote cleaned artifact");
        Ok(path)
    }

    fn text_column_names(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| col.dtype() == &DataType::String)
            .map(|col| col.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::BaselineChecker;

    fn messy_df() -> DataFrame {
        df!(
            "id" => &[1i64, 1],
            "name" => &[" Alice ", " Alice "],
            "amount" => &["$10.00", "$10.00"],
        )
        .unwrap()
    }

    // ========================================================================
    // clean() tests
    // ========================================================================

    #[test]
    fn test_clean_trims_converts_and_dedupes() {
        let df = messy_df();
        let (cleaned, actions) = DataCleaner::clean(&df).unwrap();

        assert_eq!(cleaned.height(), 1);
        assert_eq!(
            cleaned.column("name").unwrap().str().unwrap().get(0),
            Some("Alice")
        );
        assert_eq!(cleaned.column("amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            cleaned
                .column("amount")
                .unwrap()
                .f64()
                .unwrap()
                .get(0),
            Some(10.0)
        );
        assert!(actions.iter().any(|a| a == "Removed 1 duplicate rows (50.0%)"));
    }

    #[test]
    fn test_clean_leaves_mixed_column_as_text() {
        let df = df!("v" => &["1", "2", "abc"]).unwrap();
        let (cleaned, _) = DataCleaner::clean(&df).unwrap();

        let col = cleaned.column("v").unwrap();
        assert_eq!(col.dtype(), &DataType::String);
        assert_eq!(col.str().unwrap().get(2), Some("abc"));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let df = df!(
            "id" => &[1i64, 2, 2],
            "name" => &[" a ", "b", "b"],
            "when" => &["2024-01-01", "2024/01/02", "2024/01/02"],
            "score" => &["10", "300", "300"],
        )
        .unwrap();

        let (once, _) = DataCleaner::clean(&df).unwrap();
        let (twice, _) = DataCleaner::clean(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_never_leaves_duplicates() {
        let df = df!(
            "a" => &["x", "x", "y", "x"],
            "b" => &["1", "1", "2", "1"],
        )
        .unwrap();
        let (cleaned, _) = DataCleaner::clean(&df).unwrap();

        let report = BaselineChecker::scan(&cleaned).unwrap();
        assert_eq!(report.duplicate_rows, 0);
        assert!(cleaned.height() <= df.height());
    }

    #[test]
    fn test_clean_dedupe_keeps_first_in_order() {
        let df = df!("v" => &["b", "a", "b", "c"]).unwrap();
        let (cleaned, _) = DataCleaner::clean(&df).unwrap();

        let values: Vec<&str> = cleaned
            .column("v")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_clean_numeric_takes_precedence_over_datetime() {
        let df = df!("d" => &["20240317", "20240318"]).unwrap();
        let (cleaned, _) = DataCleaner::clean(&df).unwrap();

        assert_eq!(cleaned.column("d").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_clean_converts_mixed_format_dates() {
        let df = df!(
            "when" => &["2024-01-01", "2024/01/02", "17/03/2024"],
            "note" => &["x", "y", "z"],
        )
        .unwrap();
        let (cleaned, actions) = DataCleaner::clean(&df).unwrap();

        assert_eq!(
            cleaned.column("when").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(cleaned.column("note").unwrap().dtype(), &DataType::String);
        assert!(actions.iter().any(|a| a.contains("datetime")));
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let df = messy_df();
        let (_, _) = DataCleaner::clean(&df).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            df.column("name").unwrap().str().unwrap().get(0),
            Some(" Alice ")
        );
    }

    // ========================================================================
    // write_artifact() tests
    // ========================================================================

    #[test]
    fn test_artifact_name_derives_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let (mut cleaned, _) = DataCleaner::clean(&messy_df()).unwrap();

        let path =
            DataCleaner::write_artifact(&mut cleaned, Some("orders.csv"), Some(dir.path()))
                .unwrap();

        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("orders_"));
        assert!(file_name.ends_with("_cleaned.csv"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("id,name,amount\n"));
    }

    #[test]
    fn test_artifact_falls_back_to_generic_base() {
        let dir = tempfile::tempdir().unwrap();
        let (mut cleaned, _) = DataCleaner::clean(&messy_df()).unwrap();

        let path = DataCleaner::write_artifact(&mut cleaned, None, Some(dir.path())).unwrap();
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("dataset_"));
    }

    #[test]
    fn test_artifact_names_are_unique_per_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut cleaned, _) = DataCleaner::clean(&messy_df()).unwrap();

        let first =
            DataCleaner::write_artifact(&mut cleaned, Some("orders.csv"), Some(dir.path()))
                .unwrap();
        let second =
            DataCleaner::write_artifact(&mut cleaned, Some("orders.csv"), Some(dir.path()))
                .unwrap();
        assert_ne!(first, second);
    }
}
