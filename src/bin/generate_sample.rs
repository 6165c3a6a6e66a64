use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use parquet::arrow::ArrowWriter;

const ENERGY_COL: &str = "CTR01_BuildingEnergy_kWhHourly(kW-hr)";
const DAYS: i64 = 14;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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
}

/// Daily load shape of one synthetic building.
struct Profile {
    name: &'static str,
    /// `None` leaves the building out of the climate file.
    zone: Option<&'static str>,
    area: f64,
    base_kwh: f64,
    /// (hour of peak, width in hours, height in kWh)
    peaks: &'static [(f64, f64, f64)],
}

const PROFILES: &[Profile] = &[
    Profile {
        name: "Library",
        zone: Some("3C"),
        area: 1200.0,
        base_kwh: 18.0,
        peaks: &[(10.0, 2.5, 30.0), (15.0, 3.0, 25.0)],
    },
    Profile {
        name: "Gym",
        zone: Some("5B"),
        area: 800.0,
        base_kwh: 9.0,
        peaks: &[(7.0, 1.5, 22.0), (18.0, 2.0, 28.0)],
    },
    Profile {
        name: "Dorm North",
        zone: Some("3C"),
        area: 2500.0,
        base_kwh: 25.0,
        peaks: &[(7.5, 1.5, 20.0), (21.0, 2.5, 35.0)],
    },
    Profile {
        name: "Lab",
        zone: Some("5B"),
        area: 950.0,
        base_kwh: 40.0,
        peaks: &[(13.0, 4.0, 15.0)],
    },
    Profile {
        name: "Annex",
        zone: None,
        area: 400.0,
        base_kwh: 4.0,
        peaks: &[(12.0, 3.0, 6.0)],
    },
];

struct Row {
    building: &'static str,
    timestamp: NaiveDateTime,
    kwh: f64,
    area: Option<f64>,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 4)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    let mut rows = Vec::new();
    for profile in PROFILES {
        for hour in 0..DAYS * 24 {
            let timestamp = start + Duration::hours(hour);
            let h = timestamp.hour() as f64;
            let shape: f64 = profile
                .peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(h, mu, sigma, amp))
                .sum();
            let kwh = (profile.base_kwh + shape + rng.gauss(0.0, 0.05 * profile.base_kwh)).max(0.0);

            // The annex has one missing area reading, so it never gets an EUI series.
            let area = if profile.name == "Annex" && hour == 30 {
                None
            } else {
                Some(profile.area)
            };

            rows.push(Row {
                building: profile.name,
                timestamp,
                kwh: (kwh * 1000.0).round() / 1000.0,
                area,
            });
        }
    }
    rows
}

fn write_energy_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["Building", "Timestamp", ENERGY_COL, "Area"])?;
    for row in rows {
        writer.write_record([
            row.building.to_string(),
            row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.kwh.to_string(),
            row.area.map(|a| a.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_energy_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Building", DataType::Utf8, false),
        Field::new("Timestamp", DataType::Timestamp(TimeUnit::Second, None), false),
        Field::new(ENERGY_COL, DataType::Float64, true),
        Field::new("Area", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.building).collect::<Vec<_>>(),
            )),
            Arc::new(TimestampSecondArray::from(
                rows.iter()
                    .map(|r| r.timestamp.and_utc().timestamp())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.kwh).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.area).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Peak and base load come from the generated series; the lab's peak is
/// written as 0 so its base-to-peak ratio shows up as a division anomaly.
fn write_climate_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["Building Name", "Climate zone", "Peak load", "Base load", "Area"])?;

    for profile in PROFILES {
        let Some(zone) = profile.zone else {
            continue;
        };
        let loads = rows
            .iter()
            .filter(|r| r.building == profile.name)
            .map(|r| r.kwh);
        let peak = loads.clone().fold(f64::NEG_INFINITY, f64::max);
        let base = loads.fold(f64::INFINITY, f64::min);
        let peak = if profile.name == "Lab" { 0.0 } else { peak };

        writer.write_record([
            profile.name.to_string(),
            zone.to_string(),
            peak.to_string(),
            base.to_string(),
            profile.area.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = "combined_hourly_energy.csv";
    let parquet_path = "combined_hourly_energy.parquet";
    let climate_path = "climate_zones.csv";

    write_energy_csv(csv_path, &rows)?;
    write_energy_parquet(parquet_path, &rows)?;
    write_climate_csv(climate_path, &rows)?;

    println!(
        "Wrote {} hourly rows for {} buildings to {csv_path} and {parquet_path}, reference to {climate_path}",
        rows.len(),
        PROFILES.len()
    );
    Ok(())
}
