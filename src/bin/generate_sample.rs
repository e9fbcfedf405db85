//! Writes a deterministic synthetic copy of the four source tables.
//!
//! `generate_sample [OUT_DIR] [--parquet]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const COUNTRIES: [&str; 6] = ["Austria", "France", "Germany", "Italy", "Portugal", "Spain"];
const YEARS: std::ops::RangeInclusive<i64> = 2010..=2022;
/// Share of observations left blank, as in the published tables.
const MISSING_RATE: f64 = 0.04;

/// Which optional sub-classification column a table carries.
#[derive(Clone, Copy)]
enum Detail {
    Category,
    Sector,
}

impl Detail {
    fn header(self) -> &'static str {
        match self {
            Detail::Category => "Indicator Categories",
            Detail::Sector => "Technology or Sector",
        }
    }
}

struct Row {
    country: &'static str,
    year: i64,
    indicator: &'static str,
    detail: &'static str,
    value: Option<f64>,
}

struct Table {
    file_stem: &'static str,
    topic: &'static str,
    detail: Detail,
    rows: Vec<Row>,
}

/// One row per country × year × indicator × detail, around `base` with a
/// per-country offset and a slow trend.
fn build_table(
    rng: &mut SimpleRng,
    file_stem: &'static str,
    topic: &'static str,
    detail: Detail,
    series: &[(&'static str, f64, f64)],
    details: &[&'static str],
) -> Table {
    let mut rows = Vec::new();
    for (ci, &country) in COUNTRIES.iter().enumerate() {
        let offset = ci as f64 * 1.5 - 4.0;
        for year in YEARS {
            let t = (year - YEARS.start()) as f64;
            for &(indicator, base, trend) in series {
                for &d in details {
                    let value = if rng.next_f64() < MISSING_RATE {
                        None
                    } else {
                        let v = base + offset + trend * t + rng.gauss(0.0, 1.5);
                        Some((v * 100.0).round() / 100.0)
                    };
                    rows.push(Row {
                        country,
                        year,
                        indicator,
                        detail: d,
                        value,
                    });
                }
            }
        }
    }
    Table {
        file_stem,
        topic,
        detail,
        rows,
    }
}

fn write_csv(table: &Table, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", table.file_stem));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "Country",
        "Year",
        "Topic",
        "Indicator",
        table.detail.header(),
        "Value",
    ])?;
    for row in &table.rows {
        let year = row.year.to_string();
        let value = row.value.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            row.country,
            year.as_str(),
            table.topic,
            row.indicator,
            row.detail,
            value.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_parquet(table: &Table, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.parquet", table.file_stem));

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Topic", DataType::Utf8, false),
        Field::new("Indicator", DataType::Utf8, false),
        Field::new(table.detail.header(), DataType::Utf8, false),
        Field::new("Value", DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(table.rows.iter().map(|r| r.country))),
        Arc::new(Int64Array::from_iter_values(table.rows.iter().map(|r| r.year))),
        Arc::new(StringArray::from_iter_values(table.rows.iter().map(|_| table.topic))),
        Arc::new(StringArray::from_iter_values(table.rows.iter().map(|r| r.indicator))),
        Arc::new(StringArray::from_iter_values(table.rows.iter().map(|r| r.detail))),
        Arc::new(table.rows.iter().map(|r| r.value).collect::<Float64Array>()),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut out_dir = PathBuf::from("data");
    let mut parquet = false;
    for arg in std::env::args().skip(1) {
        if arg == "--parquet" {
            parquet = true;
        } else {
            out_dir = PathBuf::from(arg);
        }
    }
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let tables = [
        build_table(
            &mut rng,
            "Employment",
            "Employment",
            Detail::Category,
            &[
                ("Gender wage gap (%)", -14.0, 0.3),
                ("Gender gap by contract type", 6.0, -0.1),
                ("Gender gap by occupation", 9.0, -0.2),
            ],
            &["Total"],
        ),
        build_table(
            &mut rng,
            "innovation",
            "Innovation",
            Detail::Sector,
            &[("Share of female inventors", 11.0, 0.4)],
            &["Solar PV", "Wind", "Hydrogen", "Batteries"],
        ),
        build_table(
            &mut rng,
            "Senior_Management",
            "Senior Management",
            Detail::Category,
            &[("Share of female senior managers", 18.0, 0.6)],
            &["Women", "Board members", "Executives"],
        ),
        build_table(
            &mut rng,
            "Entrepreneurship",
            "Entrepreneurship",
            Detail::Sector,
            &[("Share of gender diverse founding teams", 15.0, 0.5)],
            &["Clean energy", "Mobility", "Grid"],
        ),
    ];

    for table in &tables {
        let path = if parquet {
            write_parquet(table, &out_dir)?
        } else {
            write_csv(table, &out_dir)?
        };
        log::info!("Wrote {} rows to {}", table.rows.len(), path.display());
    }
    Ok(())
}
