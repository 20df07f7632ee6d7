use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const N_PATIENTS: usize = 1319;

/// One row of the synthetic dataset, in the cleaned file's column layout.
#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Age")]
    age: i64,
    #[serde(rename = "Gender")]
    gender: i64,
    #[serde(rename = "Heart rate")]
    heart_rate: i64,
    #[serde(rename = "Systolic blood pressure")]
    systolic: i64,
    #[serde(rename = "Diastolic blood pressure")]
    diastolic: i64,
    #[serde(rename = "Blood sugar")]
    blood_sugar: f64,
    #[serde(rename = "CK-MB")]
    ck_mb: f64,
    #[serde(rename = "Troponin")]
    troponin: f64,
    #[serde(rename = "Result")]
    result: &'static str,
}

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

    /// Log-normal draw, for the right-skewed cardiac markers.
    fn log_normal(&mut self, median: f64, sigma: f64) -> f64 {
        median * self.gauss(0.0, sigma).exp()
    }
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (v * p).round() / p
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let age = rng.gauss(56.0, 13.5).round().clamp(14.0, 103.0) as i64;
    let gender = i64::from(rng.next_f64() < 0.66);

    // Risk rises with age and male sex; abnormal patients carry raised markers.
    let risk = 0.25 + (age as f64 - 40.0) * 0.008 + gender as f64 * 0.08;
    let abnormal = rng.next_f64() < risk.clamp(0.05, 0.9);

    let (ck_median, trop_median) = if abnormal { (6.5, 0.09) } else { (2.2, 0.008) };

    Row {
        age,
        gender,
        heart_rate: rng.gauss(76.0, 12.0).round().clamp(40.0, 160.0) as i64,
        systolic: rng.gauss(127.0, 18.0).round().clamp(80.0, 220.0) as i64,
        diastolic: rng.gauss(72.0, 11.0).round().clamp(40.0, 130.0) as i64,
        blood_sugar: round_to(rng.log_normal(130.0, 0.3), 1),
        ck_mb: round_to(rng.log_normal(ck_median, 0.7), 2),
        troponin: round_to(rng.log_normal(trop_median, 0.9), 3),
        result: if abnormal { "Abnormal" } else { "Normal" },
    }
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let ints = |f: fn(&Row) -> i64| -> ArrayRef { Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>())) };
    let floats = |f: fn(&Row) -> f64| -> ArrayRef { Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>())) };
    let labels: ArrayRef = Arc::new(StringArray::from(rows.iter().map(|r| r.result).collect::<Vec<_>>()));

    let schema = Arc::new(Schema::new(vec![
        Field::new("Age", DataType::Int64, false),
        Field::new("Gender", DataType::Int64, false),
        Field::new("Heart rate", DataType::Int64, false),
        Field::new("Systolic blood pressure", DataType::Int64, false),
        Field::new("Diastolic blood pressure", DataType::Int64, false),
        Field::new("Blood sugar", DataType::Float64, false),
        Field::new("CK-MB", DataType::Float64, false),
        Field::new("Troponin", DataType::Float64, false),
        Field::new("Result", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            ints(|r| r.age),
            ints(|r| r.gender),
            ints(|r| r.heart_rate),
            ints(|r| r.systolic),
            ints(|r| r.diastolic),
            floats(|r| r.blood_sugar),
            floats(|r| r.ck_mb),
            floats(|r| r.troponin),
            labels,
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
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..N_PATIENTS).map(|_| generate_row(&mut rng)).collect();

    write_csv("cleaned_medical_data.csv", &rows)?;
    write_parquet("cleaned_medical_data.parquet", &rows)?;

    let abnormal = rows.iter().filter(|r| r.result == "Abnormal").count();
    println!(
        "Wrote {} patients ({abnormal} abnormal) to cleaned_medical_data.csv and cleaned_medical_data.parquet",
        rows.len()
    );
    Ok(())
}
