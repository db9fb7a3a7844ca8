use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_SAMPLES: usize = 60_000;
const SAMPLE_RATE: f64 = 1_000.0;

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

/// Columns of the generated table. `None` marks a missing cell.
struct Waveforms {
    time: Vec<f64>,
    sine: Vec<f64>,
    step: Vec<f64>,
    sparse: Vec<Option<f64>>,
    phase: Vec<&'static str>,
}

fn generate(rng: &mut SimpleRng) -> Waveforms {
    let mut w = Waveforms {
        time: Vec::with_capacity(N_SAMPLES),
        sine: Vec::with_capacity(N_SAMPLES),
        step: Vec::with_capacity(N_SAMPLES),
        sparse: Vec::with_capacity(N_SAMPLES),
        phase: Vec::with_capacity(N_SAMPLES),
    };

    for i in 0..N_SAMPLES {
        let t = i as f64 / SAMPLE_RATE;
        let sine = 2.0 * (2.0 * std::f64::consts::PI * 0.5 * t).sin() + rng.gauss(0.0, 0.1);

        // three plateaus, so the mean visibly changes along the trace
        let (level, phase) = match i * 3 / N_SAMPLES {
            0 => (1.0, "warmup"),
            1 => (4.0, "load"),
            _ => (2.5, "cooldown"),
        };
        let step = level + rng.gauss(0.0, 0.2);

        // drop roughly one sample in eight to exercise cleaning
        let sparse = (rng.next_f64() > 0.125).then(|| 10.0 + rng.gauss(0.0, 1.0));

        w.time.push(t);
        w.sine.push(sine);
        w.step.push(step);
        w.sparse.push(sparse);
        w.phase.push(phase);
    }
    w
}

fn write_csv(w: &Waveforms, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["time", "sine", "step", "sparse", "phase"])?;
    for i in 0..N_SAMPLES {
        let sparse = w.sparse[i].map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            w.time[i].to_string(),
            format!("{:.6}", w.sine[i]),
            format!("{:.6}", w.step[i]),
            sparse,
            w.phase[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(w: &Waveforms, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("time", DataType::Float64, false),
        Field::new("sine", DataType::Float64, false),
        Field::new("step", DataType::Float64, false),
        Field::new("sparse", DataType::Float64, true),
        Field::new("phase", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(w.time.clone())),
            Arc::new(Float64Array::from(w.sine.clone())),
            Arc::new(Float64Array::from(w.step.clone())),
            Arc::new(Float64Array::from(w.sparse.clone())),
            Arc::new(StringArray::from(w.phase.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let waveforms = generate(&mut rng);

    write_csv(&waveforms, "sample_waveform.csv")?;
    write_parquet(&waveforms, "sample_waveform.parquet")?;

    let missing = waveforms.sparse.iter().filter(|v| v.is_none()).count();
    println!(
        "Wrote {N_SAMPLES} samples to sample_waveform.csv / .parquet ({missing} gaps in 'sparse')"
    );
    Ok(())
}
