//! Deterministic row sampling for generation context.
//!
//! Sampling is a pure function of the dataset, the sample size, and the
//! seed. Re-running with equal inputs yields the same rows in the same
//! order, so prompts built from a sample are reproducible.

use anyhow::Result;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Sampler drawing a fixed-seed random subset of rows.
pub struct RowSampler;

impl RowSampler {
    /// Draw up to `sample_size` rows without replacement.
    ///
    /// Datasets smaller than `sample_size` are returned whole (in sampled
    /// order). An empty dataset yields an empty frame with the same schema.
    pub fn sample(df: &DataFrame, sample_size: usize, seed: u64) -> Result<DataFrame> {
        let indices = sample_indices(df.height(), sample_size, seed);
        debug!(
            rows = df.height(),
            sampled = indices.len(),
            seed,
            "Sampling rows"
        );

        let idx = IdxCa::from_vec("sample_idx".into(), indices);
        Ok(df.take(&idx)?)
    }
}

/// Row indices for a sample of `sample_size` out of `row_count`, drawn
/// without replacement from a seeded generator.
pub fn sample_indices(row_count: usize, sample_size: usize, seed: u64) -> Vec<IdxSize> {
    let amount = sample_size.min(row_count);
    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, row_count, amount)
        .into_iter()
        .map(|i| i as IdxSize)
        .collect()
}
