//! Dataset profiling: the per-column statistical digest.
//!
//! Profiling is a pure function of the dataset. Per-column failures
//! (distinct counting, numeric range) degrade to an "unknown"/omitted field
//! rather than aborting the profile.

use crate::types::{ColumnDigest, DatasetDigest};
use crate::utils::{collect_example_values, is_numeric_dtype};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Maximum number of example values included per column.
const MAX_EXAMPLE_VALUES: usize = 3;

/// Profiler computing the compact statistical digest used as generation context.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset.
    ///
    /// Two calls on equal datasets produce identical digests, including
    /// identical example-value selection.
    pub fn profile_dataset(df: &DataFrame) -> Result<DatasetDigest> {
        debug!(
            rows = df.height(),
            columns = df.width(),
            "Profiling dataset"
        );

        let mut column_digests = Vec::with_capacity(df.width());
        for col_name in df.get_column_names() {
            column_digests.push(Self::profile_column(df, col_name)?);
        }

        Ok(DatasetDigest {
            rows: df.height(),
            columns: df.width(),
            column_digests,
        })
    }

    fn profile_column(df: &DataFrame, col_name: &str) -> Result<ColumnDigest> {
        let col = df.column(col_name)?;
        let series = col.as_materialized_series();

        let dtype = format!("{}", series.dtype());
        let null_count = series.null_count();
        let non_null_count = series.len() - null_count;

        // Exact distinct counting can fail on exotic dtypes; degrade to the
        // "unknown" sentinel instead of failing the whole pass.
        let unique_count = series.n_unique().ok();

        let examples = collect_example_values(series, MAX_EXAMPLE_VALUES);

        let (min, max) = if is_numeric_dtype(series.dtype()) {
            Self::numeric_range(series)
        } else {
            (None, None)
        };

        Ok(ColumnDigest {
            name: col_name.to_string(),
            dtype,
            non_null_count,
            null_count,
            unique_count,
            examples,
            min,
            max,
        })
    }

    /// Min/max for a numeric column. A failure drops the stat for this column
    /// only; the rest of the digest is unaffected.
    fn numeric_range(series: &Series) -> (Option<f64>, Option<f64>) {
        let min = series.min::<f64>().ok().flatten();
        let max = series.max::<f64>().ok().flatten();
        (min, max)
    }
}
