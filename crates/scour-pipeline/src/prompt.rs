//! Prompt assembly for the generation request.
//!
//! The prompt is a pure function of the dataset digest, the sample, and the
//! sample cap. It is the sole payload sent to the generation backend, so for
//! a fixed dataset and seed the request is byte-for-byte reproducible.

use crate::types::DatasetDigest;
use crate::utils::stringify_cell;
use polars::prelude::*;

/// Fixed output contract appended to every prompt. The three-section shape
/// keeps responses parseable by eye and comparable across models.
const OUTPUT_CONTRACT: &str = "\
Write your answer in exactly these three markdown sections with short bullet points:
**1) Possible data quality issues:**
- For each bullet, name the exact column and quote 1–2 example cell values from the sample.
- Use the format: ColumnName: Issue → Action (keep one line per item).
**2) Cleaning steps:**
- Be concrete: specify target formats (e.g., YYYY-MM-DD), units (e.g., USD), and exact type casts (e.g., to int/float/category/datetime). No code.
**3) Additional notes:**
- Keep it practical; avoid vague words like \"verify\", \"unexpected formats\", or \"might\". If uncertain, say what to check and how.

Rules:
- Do not invent columns or values.
- Do not include any code blocks.
- Keep it concise and practical.";

/// Assembler combining profiler and sampler output with the fixed template.
pub struct PromptAssembler;

impl PromptAssembler {
    /// Build the complete request payload.
    ///
    /// `sample_cap` is the configured maximum sample size, quoted in the
    /// template so the model knows how much of the dataset it is seeing.
    pub fn assemble(digest: &DatasetDigest, sample: &DataFrame, sample_cap: usize) -> String {
        let mut prompt = format!(
            "You are a helpful data cleaning assistant for tabular CSV data.\n\n\
             Dataset summary (entire file):\n{}\n\n\
             Random sample of rows (up to {}):\n{}\n\n",
            digest.render(),
            sample_cap,
            render_sample_table(sample)
        );
        prompt.push_str(OUTPUT_CONTRACT);
        prompt
    }
}

/// Render a frame as a fixed-width text table: header row first, columns
/// right-aligned to their widest cell, two spaces between columns, nulls
/// rendered as "null".
pub fn render_sample_table(df: &DataFrame) -> String {
    if df.width() == 0 {
        return String::new();
    }

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let mut cells = Vec::with_capacity(series.len() + 1);
        cells.push(col.name().to_string());
        for i in 0..series.len() {
            let cell = series
                .get(i)
                .map(|v| stringify_cell(&v))
                .unwrap_or_else(|_| "null".to_string());
            cells.push(cell);
        }
        columns.push(cells);
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|cells| {
            cells
                .iter()
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let row_count = columns[0].len();
    let mut lines = Vec::with_capacity(row_count);
    for row in 0..row_count {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(cells, width)| format!("{:>width$}", cells[row], width = width))
            .collect();
        lines.push(line.join("  "));
    }
    lines.join("\n")
}
