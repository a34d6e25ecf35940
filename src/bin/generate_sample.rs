use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Write a deterministic synthetic launch table.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output file; `.parquet` or `.pq` writes Parquet, anything else CSV.
    #[arg(default_value = "spacex_launch_dash.csv")]
    output: PathBuf,

    /// Seed for the generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One CSV row, in the column order of the original launch export.
#[derive(Serialize)]
struct LaunchRow {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

/// Booster generations in flight order: (category, first serial, payload
/// window in kg, success probability).
const BOOSTERS: [(&str, u32, (f64, f64), f64); 5] = [
    ("v1.0", 3, (0.0, 700.0), 0.2),
    ("v1.1", 1003, (500.0, 4500.0), 0.35),
    ("FT", 1019, (1900.0, 9600.0), 0.75),
    ("B4", 1039, (2200.0, 9600.0), 0.55),
    ("B5", 1046, (3600.0, 9600.0), 0.95),
];

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

fn generate(rng: &mut StdRng) -> Vec<LaunchRow> {
    let mut rows = Vec::new();
    let mut flight_number = 1;

    for (generation, &(category, first_serial, (lo, hi), p_success)) in BOOSTERS.iter().enumerate() {
        for n in 0..12u32 {
            // Early flights only flew from the first pad.
            let site = if generation == 0 {
                SITES[0]
            } else {
                SITES[rng.gen_range(0..SITES.len())]
            };
            let payload = (rng.gen_range(lo..=hi) / 10.0).round() * 10.0;
            let class = i64::from(rng.gen_bool(p_success));

            rows.push(LaunchRow {
                flight_number,
                site: site.to_string(),
                class,
                payload_mass_kg: payload,
                booster_version: format!("F9 {category} B{:04}", first_serial + n),
                booster_version_category: category.to_string(),
            });
            flight_number += 1;
        }
    }
    rows
}

fn write_csv(rows: &[LaunchRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[LaunchRow], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.site.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.booster_version_category.as_str()),
            )),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn is_parquet(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("parquet" | "pq")
    )
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let rows = generate(&mut rng);

    let output = &args.output;
    let written = if is_parquet(output) {
        write_parquet(&rows, output)
    } else {
        write_csv(&rows, output)
    };
    written.with_context(|| format!("writing {}", output.display()))?;

    let successes = rows.iter().filter(|r| r.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {}",
        rows.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_and_accepts_a_path() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.output, PathBuf::from("spacex_launch_dash.csv"));
        assert_eq!(args.seed, 42);

        let args = Args::try_parse_from(["generate_sample", "out/launches.parquet", "--seed", "7"])
            .unwrap();
        assert!(is_parquet(&args.output));
        assert_eq!(args.seed, 7);
        assert!(Args::try_parse_from(["generate_sample", "a.csv", "b.csv"]).is_err());
    }

    #[test]
    fn same_seed_gives_same_table() {
        let a = generate(&mut StdRng::seed_from_u64(42));
        let b = generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.len(), 60);
        let key = |rows: &[LaunchRow]| -> Vec<(String, f64, i64)> {
            rows.iter().map(|r| (r.site.clone(), r.payload_mass_kg, r.class)).collect()
        };
        assert_eq!(key(&a), key(&b));
        assert!(a[..12].iter().all(|r| r.site == SITES[0]));
        assert!(a.iter().all(|r| r.class == 0 || r.class == 1));
    }
}
