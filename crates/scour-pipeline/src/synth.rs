//! Synthetic noisy dataset generation.
//!
//! Produces CSV files seeded with the kinds of dirt the cleaner targets:
//! inconsistent casing, padded whitespace, mixed date formats, currency
//! strings, numeric outliers, placeholder values, empty cells, and
//! duplicated rows. Output is deterministic: the same `(rows, seed)` pair
//! always yields byte-identical CSV.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

const FIRST_NAMES: &[&str] = &[
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Chris", "Sam", "Jamie", "Lee",
    "Robin", "Avery", "Parker", "Quinn", "Drew",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia", "Rodriguez",
    "Wilson", "Martinez", "Anderson", "Taylor",
];

const EMAIL_PROVIDERS: &[&str] = &["example.com", "mail.com", "sample.org", "test.net"];

// Deliberately inconsistent labels for the same few categories
const CATEGORIES: &[&str] = &[
    "Retail",
    "retail",
    "ONLINE",
    "Wholesale",
    "wholesale",
    "e-comm",
    "E-Commerce",
];

const BAD_SCORES: &[&str] = &["NA", "", "null", "abc"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-03-17
    "%d/%m/%Y", // 17/03/2024
    "%m-%d-%Y", // 03-17-2024
    "%Y/%m/%d", // 2024/03/17
];

/// One generated row. Cells are kept as the strings that land in the CSV;
/// an empty string is a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct NoisyRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub date: String,
    pub score: String,
    pub amount: String,
    pub category: String,
}

/// Generator for synthetic datasets with injected quality issues.
pub struct NoisyDataGenerator;

impl NoisyDataGenerator {
    /// Generate `rows` base rows (plus ~1% appended duplicates).
    ///
    /// The same `(rows, seed)` pair always produces the same output.
    pub fn generate_rows(rows: usize, seed: u64) -> Vec<NoisyRow> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut generated = Vec::with_capacity(rows + rows / 64);

        for id in 1..=rows as i64 {
            let name = random_name(&mut rng);
            let email = random_email(&name, &mut rng);
            let mut row = NoisyRow {
                id,
                name,
                email,
                date: random_date(&mut rng),
                score: random_score(&mut rng),
                amount: random_amount(&mut rng),
                category: random_category(&mut rng),
            };

            // Inject missing values
            if rng.r#gen::<f64>() < 0.03 {
                row.name.clear();
            }
            if rng.r#gen::<f64>() < 0.03 {
                row.email.clear();
            }
            if rng.r#gen::<f64>() < 0.03 {
                row.date.clear();
            }
            if rng.r#gen::<f64>() < 0.03 {
                row.score.clear();
            }

            generated.push(row.clone());

            // Sprinkle duplicates (about 1%)
            if rng.r#gen::<f64>() < 0.01 {
                generated.push(row);
            }
        }

        generated
    }

    /// Generate the dataset as a DataFrame, ready to write or feed straight
    /// into the pipeline.
    pub fn generate_dataframe(rows: usize, seed: u64) -> Result<DataFrame> {
        let generated = Self::generate_rows(rows, seed);

        let ids: Vec<i64> = generated.iter().map(|r| r.id).collect();
        let names: Vec<&str> = generated.iter().map(|r| r.name.as_str()).collect();
        let emails: Vec<&str> = generated.iter().map(|r| r.email.as_str()).collect();
        let dates: Vec<&str> = generated.iter().map(|r| r.date.as_str()).collect();
        let scores: Vec<&str> = generated.iter().map(|r| r.score.as_str()).collect();
        let amounts: Vec<&str> = generated.iter().map(|r| r.amount.as_str()).collect();
        let categories: Vec<&str> = generated.iter().map(|r| r.category.as_str()).collect();

        let df = DataFrame::new(vec![
            Column::new("id".into(), ids),
            Column::new("name".into(), names),
            Column::new("email".into(), emails),
            Column::new("date".into(), dates),
            Column::new("score".into(), scores),
            Column::new("amount".into(), amounts),
            Column::new("category".into(), categories),
        ])
        .context("Failed to assemble generated columns")?;

        Ok(df)
    }

    /// Write the dataset to `path`, creating parent directories as needed.
    pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .context("Failed to write generated CSV")?;

        info!(path = %path.display(), rows = df.height(), "Wrote synthetic dataset");
        Ok(())
    }
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

fn random_name(rng: &mut StdRng) -> String {
    let mut name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
    // Random casing and whitespace noise
    if rng.r#gen::<f64>() < 0.25 {
        name = name.to_uppercase();
    }
    if rng.r#gen::<f64>() < 0.25 {
        name = name.to_lowercase();
    }
    if rng.r#gen::<f64>() < 0.25 {
        name = format!("  {name}  ");
    }
    name
}

fn random_email(name: &str, rng: &mut StdRng) -> String {
    let base = name.replace(' ', ".").to_lowercase();
    let mut email = format!("{base}@{}", pick(rng, EMAIL_PROVIDERS));
    // Noise: missing at, spaces, uppercase
    let roll = rng.r#gen::<f64>();
    if roll < 0.05 {
        email = email.replace('@', ""); // invalid
    } else if roll < 0.10 {
        email = email.replace('.', " "); // spaces
    }
    if rng.r#gen::<f64>() < 0.2 {
        email = email.to_uppercase();
    }
    if rng.r#gen::<f64>() < 0.2 {
        email = format!(" {email} ");
    }
    email
}

fn random_date(rng: &mut StdRng) -> String {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("Invalid start date");
    let date = start + Days::new(rng.gen_range(0..=5 * 365));
    let mut rendered = date.format(pick(rng, DATE_FORMATS)).to_string();
    // Occasional invalid month
    if rng.r#gen::<f64>() < 0.01 && rendered.contains("-03-") {
        rendered = rendered.replace("-03-", "-13-");
    }
    rendered
}

fn random_category(rng: &mut StdRng) -> String {
    let base = pick(rng, CATEGORIES);
    if rng.r#gen::<f64>() < 0.2 {
        format!(" {base} ")
    } else {
        base.to_string()
    }
}

fn random_score(rng: &mut StdRng) -> String {
    // Mostly 0-100, some bad strings, some outliers
    let roll = rng.r#gen::<f64>();
    if roll < 0.75 {
        rng.gen_range(0..=100i64).to_string()
    } else if roll < 0.85 {
        pick(rng, BAD_SCORES).to_string()
    } else {
        rng.gen_range(300..=5000i64).to_string()
    }
}

fn random_amount(rng: &mut StdRng) -> String {
    let amount = rng.gen_range(5.0..2000.0);
    // Mixed representation
    if rng.r#gen::<f64>() < 0.5 {
        format!("${}", format_thousands(amount)) // with currency + commas
    } else if rng.r#gen::<f64>() < 0.2 {
        format!(" {amount:.0} ") // integer string with spaces
    } else {
        format!("{amount:.2}")
    }
}

/// Render an amount with comma thousands separators and two decimals.
fn format_thousands(amount: f64) -> String {
    let cents = format!("{amount:.2}");
    let Some((whole, frac)) = cents.split_once('.') else {
        return cents;
    };
    let reversed: Vec<char> = whole.chars().rev().collect();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in reversed.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    let whole: String = grouped.chars().rev().collect();
    format!("{whole}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // determinism tests
    // ========================================================================

    #[test]
    fn test_same_seed_produces_identical_rows() {
        let first = NoisyDataGenerator::generate_rows(100, 42);
        let second = NoisyDataGenerator::generate_rows(100, 42);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_produces_identical_csv_bytes() {
        let mut first = NoisyDataGenerator::generate_dataframe(100, 42).unwrap();
        let mut second = NoisyDataGenerator::generate_dataframe(100, 42).unwrap();

        let mut first_bytes = Vec::new();
        CsvWriter::new(&mut first_bytes)
            .include_header(true)
            .finish(&mut first)
            .unwrap();
        let mut second_bytes = Vec::new();
        CsvWriter::new(&mut second_bytes)
            .include_header(true)
            .finish(&mut second)
            .unwrap();

        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = NoisyDataGenerator::generate_rows(50, 1);
        let second = NoisyDataGenerator::generate_rows(50, 2);
        assert_ne!(first, second);
    }

    // ========================================================================
    // shape and noise tests
    // ========================================================================

    #[test]
    fn test_row_count_and_ids() {
        let rows = NoisyDataGenerator::generate_rows(200, 7);
        assert!(rows.len() >= 200, "duplicates only ever add rows");
        assert_eq!(rows.iter().map(|r| r.id).max(), Some(200));
        assert_eq!(rows.first().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_noise_kinds_all_appear() {
        let rows = NoisyDataGenerator::generate_rows(2000, 7);

        assert!(
            rows.iter().any(|r| r.name.starts_with("  ")),
            "expected padded names"
        );
        assert!(
            rows.iter()
                .any(|r| !r.email.is_empty() && !r.email.contains('@')),
            "expected invalid emails"
        );
        assert!(
            rows.iter()
                .any(|r| r.amount.starts_with('$') && r.amount.contains(',')),
            "expected currency amounts"
        );
        assert!(
            rows.iter()
                .any(|r| BAD_SCORES.contains(&r.score.as_str()) && !r.score.is_empty()),
            "expected placeholder scores"
        );
        assert!(
            rows.iter().any(|r| r.name.is_empty()),
            "expected missing names"
        );
        assert!(
            rows.iter().any(|r| r.date.contains('/')),
            "expected slash-formatted dates"
        );
    }

    #[test]
    fn test_duplicates_are_exact_copies() {
        let rows = NoisyDataGenerator::generate_rows(2000, 7);
        let duplicate = rows
            .windows(2)
            .find(|pair| pair[0].id == pair[1].id)
            .expect("expected at least one duplicate in 2000 rows");
        assert_eq!(duplicate[0], duplicate[1]);
    }

    #[test]
    fn test_dataframe_schema() {
        let df = NoisyDataGenerator::generate_dataframe(20, 0).unwrap();
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            vec!["id", "name", "email", "date", "score", "amount", "category"]
        );
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("amount").unwrap().dtype(), &DataType::String);
    }

    // ========================================================================
    // formatting tests
    // ========================================================================

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(5.0), "5.00");
        assert_eq!(format_thousands(999.99), "999.99");
        assert_eq!(format_thousands(1234.5), "1,234.50");
    }

    #[test]
    fn test_write_csv_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("noisy.csv");

        let mut df = NoisyDataGenerator::generate_dataframe(10, 3).unwrap();
        NoisyDataGenerator::write_csv(&mut df, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("id,name,email,date,score,amount,category\n"));
    }
}
