use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Statistical digest of a single column.
///
/// Computed fresh for every analysis request and discarded after the prompt
/// is built; never cached or mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDigest {
    pub name: String,
    /// Storage type name as inferred by the data engine (e.g. "i64", "str").
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
    /// Exact distinct-value count, or `None` when counting failed.
    pub unique_count: Option<usize>,
    /// Up to 3 non-null values in original row order, stringified.
    pub examples: Vec<String>,
    /// Minimum value; present only for numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum value; present only for numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ColumnDigest {
    /// Render this digest as a single summary line.
    pub fn render_line(&self) -> String {
        let unique = match self.unique_count {
            Some(count) => count.to_string(),
            None => "unknown".to_string(),
        };

        let numeric_stats = match (self.min, self.max) {
            (Some(min), Some(max)) => format!(", min={}, max={}", min, max),
            _ => String::new(),
        };

        let examples = if self.examples.is_empty() {
            "(none)".to_string()
        } else {
            self.examples.join(", ")
        };

        format!(
            "- {} | dtype={}, non_null={}, nulls={}, unique={}{}; examples: {}",
            self.name, self.dtype, self.non_null_count, self.null_count, unique, numeric_stats,
            examples
        )
    }
}

/// Whole-dataset digest: global shape plus one [`ColumnDigest`] per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDigest {
    pub rows: usize,
    pub columns: usize,
    pub column_digests: Vec<ColumnDigest>,
}

impl DatasetDigest {
    /// Render the digest in its stable textual form: a shape header followed
    /// by one line per column.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.column_digests.len() + 1);
        lines.push(format!("Rows: {}, Columns: {}", self.rows, self.columns));
        for digest in &self.column_digests {
            lines.push(digest.render_line());
        }
        lines.join("\n")
    }
}

/// Result of the deterministic baseline scan: two dataset-wide facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineReport {
    /// Whether any null value exists anywhere in the dataset.
    pub missing_values: bool,
    /// Whether any row is an exact duplicate of another row.
    pub duplicate_rows: bool,
}

impl BaselineReport {
    /// Names of the detected issues, in detection order.
    pub fn issues(&self) -> Vec<&'static str> {
        let mut issues = Vec::new();
        if self.missing_values {
            issues.push("Missing values found");
        }
        if self.duplicate_rows {
            issues.push("Duplicate rows found");
        }
        issues
    }

    pub fn is_clean(&self) -> bool {
        !self.missing_values && !self.duplicate_rows
    }

    /// Render the baseline findings as a one-line report.
    pub fn render(&self) -> String {
        let issues = self.issues();
        let detected = if issues.is_empty() {
            "No major issues".to_string()
        } else {
            issues.join(", ")
        };
        format!("Baseline scan detected: {}", detected)
    }
}

/// Complete outcome of one analysis request.
///
/// Immutable once produced: `text` is assembled at construction time and is
/// what callers render; the structured parts back the JSON output mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub digest: DatasetDigest,
    pub baseline: BaselineReport,
    /// Output of the generation service, or one of its normalized failure
    /// strings. Always non-empty.
    pub suggestions: String,
    pub elapsed_seconds: f64,
    /// Assembled text bundle: baseline findings, generated findings, elapsed time.
    pub text: String,
}

impl AnalysisResult {
    /// Assemble the result bundle from its parts.
    pub fn new(
        digest: DatasetDigest,
        baseline: BaselineReport,
        suggestions: impl Into<String>,
        elapsed_seconds: f64,
    ) -> Self {
        let suggestions = suggestions.into();
        let text = format!(
            "--- Baseline ---\n\n{}\n\n--- LLM Suggestions ---\n\n{}\n\n_Time taken: {:.1}s_",
            baseline.render(),
            suggestions,
            elapsed_seconds
        );
        Self {
            digest,
            baseline,
            suggestions,
            elapsed_seconds,
            text,
        }
    }

    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Outcome of a cleaning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanOutcome {
    /// No dataset was supplied (nothing has been analyzed yet).
    NothingToClean,
    /// A cleaned artifact was produced.
    Cleaned(CleanedArtifact),
}

impl CleanOutcome {
    /// The artifact path, when one was produced.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NothingToClean => None,
            Self::Cleaned(artifact) => Some(&artifact.path),
        }
    }
}

/// A persisted cleaned-dataset artifact plus what the cleaner did to produce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedArtifact {
    /// Location of the written file (uniquely named per invocation).
    pub path: PathBuf,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
    /// Human-readable descriptions of the transformations applied.
    pub actions: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numeric_digest() -> ColumnDigest {
        ColumnDigest {
            name: "score".to_string(),
            dtype: "i64".to_string(),
            non_null_count: 98,
            null_count: 2,
            unique_count: Some(41),
            examples: vec!["12".to_string(), "87".to_string(), "55".to_string()],
            min: Some(0.0),
            max: Some(100.0),
        }
    }

    #[test]
    fn test_column_digest_render_numeric() {
        assert_eq!(
            numeric_digest().render_line(),
            "- score | dtype=i64, non_null=98, nulls=2, unique=41, min=0, max=100; examples: 12, 87, 55"
        );
    }

    #[test]
    fn test_column_digest_render_text_column_omits_range() {
        let digest = ColumnDigest {
            name: "name".to_string(),
            dtype: "str".to_string(),
            non_null_count: 100,
            null_count: 0,
            unique_count: Some(72),
            examples: vec!["Alice".to_string(), "Bob".to_string()],
            min: None,
            max: None,
        };
        assert_eq!(
            digest.render_line(),
            "- name | dtype=str, non_null=100, nulls=0, unique=72; examples: Alice, Bob"
        );
    }

    #[test]
    fn test_column_digest_render_fallbacks() {
        let digest = ColumnDigest {
            name: "empty".to_string(),
            dtype: "str".to_string(),
            non_null_count: 0,
            null_count: 5,
            unique_count: None,
            examples: Vec::new(),
            min: None,
            max: None,
        };
        assert_eq!(
            digest.render_line(),
            "- empty | dtype=str, non_null=0, nulls=5, unique=unknown; examples: (none)"
        );
    }

    #[test]
    fn test_dataset_digest_render() {
        let digest = DatasetDigest {
            rows: 100,
            columns: 1,
            column_digests: vec![numeric_digest()],
        };
        let rendered = digest.render();
        assert!(rendered.starts_with("Rows: 100, Columns: 1\n"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_baseline_report_render_variants() {
        let clean = BaselineReport {
            missing_values: false,
            duplicate_rows: false,
        };
        assert!(clean.is_clean());
        assert_eq!(clean.render(), "Baseline scan detected: No major issues");

        let nulls_only = BaselineReport {
            missing_values: true,
            duplicate_rows: false,
        };
        assert_eq!(
            nulls_only.render(),
            "Baseline scan detected: Missing values found"
        );

        let both = BaselineReport {
            missing_values: true,
            duplicate_rows: true,
        };
        assert_eq!(
            both.render(),
            "Baseline scan detected: Missing values found, Duplicate rows found"
        );
    }

    #[test]
    fn test_analysis_result_text_assembly() {
        let digest = DatasetDigest {
            rows: 2,
            columns: 1,
            column_digests: vec![numeric_digest()],
        };
        let baseline = BaselineReport {
            missing_values: false,
            duplicate_rows: true,
        };
        let result = AnalysisResult::new(digest, baseline, "Looks fine overall.", 2.34);

        assert_eq!(
            result.text,
            "--- Baseline ---\n\n\
             Baseline scan detected: Duplicate rows found\n\n\
             --- LLM Suggestions ---\n\n\
             Looks fine overall.\n\n\
             _Time taken: 2.3s_"
        );
    }

    #[test]
    fn test_analysis_result_to_json() {
        let digest = DatasetDigest {
            rows: 1,
            columns: 1,
            column_digests: vec![numeric_digest()],
        };
        let baseline = BaselineReport {
            missing_values: false,
            duplicate_rows: false,
        };
        let result = AnalysisResult::new(digest, baseline, "ok", 0.5);
        let json = result.to_json().unwrap();
        assert!(json.contains("\"suggestions\""));
        assert!(json.contains("\"elapsed_seconds\""));
        assert!(json.contains("\"score\""));
    }

    #[test]
    fn test_clean_outcome_path() {
        let outcome = CleanOutcome::Cleaned(CleanedArtifact {
            path: PathBuf::from("/tmp/orders_abc_cleaned.csv"),
            rows_before: 10,
            rows_after: 9,
            columns: 3,
            actions: vec!["Removed 1 duplicate row".to_string()],
        });
        assert!(outcome.path().is_some());
        assert!(CleanOutcome::NothingToClean.path().is_none());
    }

    #[test]
    fn test_clean_outcome_serialization() {
        let json = serde_json::to_string(&CleanOutcome::NothingToClean).unwrap();
        assert!(json.contains("nothing_to_clean"));
    }
}
