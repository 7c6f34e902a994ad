//! Writes a synthetic surface-temperature dataset as `sample_temps.json` and
//! `sample_temps.parquet` in the working directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const FIRST_YEAR: i64 = 1961;
const LAST_YEAR: i64 = 2019;

/// (continent, warming per decade in °C, countries)
const REGIONS: &[(&str, f64, &[&str])] = &[
    ("Africa", 0.22, &["Kenya", "Chad", "Egypt", "Ghana", "Morocco"]),
    ("Asia", 0.26, &["India", "Japan", "Mongolia", "Thailand", "Kazakhstan"]),
    ("Europe", 0.33, &["France", "Spain", "Finland", "Poland", "Italy"]),
    ("North America", 0.24, &["Canada", "Mexico", "United States of America"]),
    ("Oceania", 0.18, &["Australia", "New Zealand", "Fiji"]),
    (
        "South America",
        0.17,
        &["Brazil", "Chile", "Peru", "Argentina", "Falkland Islands (Malvinas)"],
    ),
];

/// Row in the same shape the viewer reads (Year as a string).
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SampleRow {
    country: String,
    continent: String,
    year: String,
    value: f64,
}

/// Normal sample via Box-Muller.
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn generate(rng: &mut impl Rng) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for &(continent, per_decade, countries) in REGIONS {
        for &country in countries {
            let offset = gauss(rng, 0.0, 0.15);
            for year in FIRST_YEAR..=LAST_YEAR {
                let decades = (year - FIRST_YEAR) as f64 / 10.0;
                let value = offset + per_decade * decades + gauss(rng, 0.0, 0.35);
                rows.push(SampleRow {
                    country: country.to_string(),
                    continent: continent.to_string(),
                    year: year.to_string(),
                    // Two decimals like the published FAO series.
                    value: (value * 100.0).round() / 100.0,
                });
            }
        }
    }
    rows
}

fn write_json(rows: &[SampleRow], path: &str) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    serde_json::to_writer_pretty(file, rows).context("writing JSON")?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Continent", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Value", DataType::Float64, false),
    ]));

    let years = rows
        .iter()
        .map(|r| r.year.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .context("sample years must be integers")?;

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.continent.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(years)),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.value).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate(&mut rng);

    write_json(&rows, "sample_temps.json")?;
    write_parquet(&rows, "sample_temps.parquet")?;

    log::info!("Generated {} rows", rows.len());
    println!(
        "Wrote {} records ({}–{}) to sample_temps.json and sample_temps.parquet",
        rows.len(),
        FIRST_YEAR,
        LAST_YEAR
    );
    Ok(())
}
