use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{
    AREA_COL, BUILDING_COL, ClimateRecord, ClimateTable, CombinedRecord, CombinedTable, ENERGY_COL,
    EnergyFrame, EnergyRecord, REF_AREA_COL, REF_BASE_COL, REF_BUILDING_COL, REF_PEAK_COL,
    REF_ZONE_COL, TIMESTAMP_COL,
};
use super::summary::ReferenceMetrics;
use super::timestamp::parse_timestamp;

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// Why a load request failed. Shown to the user; never fatal to the app.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot read parquet file {}: {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },
    #[error("cannot decode record batch in {}: {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
    #[error("{} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{}, row {row}: column '{column}' is empty", .path.display())]
    MissingValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },
    #[error("{}, row {row}: cannot parse timestamp '{value}'", .path.display())]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },
    #[error("{}, row {row}: '{value}' in column '{column}' is not a number", .path.display())]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("{}: column '{column}' has unsupported type {data_type}", .path.display())]
    UnsupportedColumnType {
        path: PathBuf,
        column: &'static str,
        data_type: DataType,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Non-fatal findings from a load. Every row is still kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The building has no row in the climate reference; its climate fields are null.
    UnmatchedBuilding(String),
    /// The reference lists the building more than once; the first row was used.
    DuplicateReferenceKey(String),
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnmatchedBuilding(b) => {
                write!(f, "Building '{b}' has no climate-zone match")
            }
            LoadWarning::DuplicateReferenceKey(b) => {
                write!(f, "Building '{b}' appears more than once in the climate file; using the first row")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Identity of the inputs of one load: the primary file and the optional reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSources {
    pub primary: PathBuf,
    pub reference: Option<PathBuf>,
}

impl DataSources {
    pub fn new(primary: impl Into<PathBuf>, reference: Option<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            reference,
        }
    }
}

/// Everything one load produces. Immutable once built; shared through `Arc`.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: CombinedTable,
    /// Per-building reference metrics, present when a reference was joined.
    pub metrics: Option<ReferenceMetrics>,
    pub warnings: Vec<LoadWarning>,
}

/// Read both sources and join them. Prefer [`super::cache::LoadCache`] in the UI.
pub fn load_sources(sources: &DataSources) -> Result<LoadOutcome, LoadError> {
    let energy = load_energy(&sources.primary)?;
    let reference = sources
        .reference
        .as_deref()
        .map(load_climate_csv)
        .transpose()?;

    let outcome = combine(energy, reference.as_ref());
    log::info!(
        "Loaded {} rows for {} buildings from {}",
        outcome.table.len(),
        outcome.table.buildings.len(),
        sources.primary.display()
    );
    for warning in &outcome.warnings {
        log::warn!("{warning}");
    }
    Ok(outcome)
}

/// Load the primary hourly file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Building`, `Timestamp`, the energy column, optional `Area`
/// * `.parquet` – same column names; timestamps as strings or Arrow timestamps
pub fn load_energy(path: &Path) -> Result<EnergyFrame, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_energy_csv(path),
        "parquet" | "pq" => load_energy_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Left-join the energy rows onto the reference by building name, then sort.
///
/// Row count never changes: unmatched buildings keep their rows with null
/// climate fields and get one [`LoadWarning::UnmatchedBuilding`] each.
pub fn combine(energy: EnergyFrame, reference: Option<&ClimateTable>) -> LoadOutcome {
    let mut warnings: Vec<LoadWarning> = reference
        .map(|r| {
            r.duplicates()
                .iter()
                .map(|b| LoadWarning::DuplicateReferenceKey(b.clone()))
                .collect()
        })
        .unwrap_or_default();

    let mut unmatched: BTreeSet<String> = BTreeSet::new();
    let rows: Vec<CombinedRecord> = energy
        .records
        .into_iter()
        .map(|rec| {
            let matched = reference.and_then(|r| r.get(&rec.building));
            if reference.is_some() && matched.is_none() && !unmatched.contains(&rec.building) {
                unmatched.insert(rec.building.clone());
            }
            CombinedRecord {
                area: matched.and_then(|m| m.area).or(rec.area),
                climate_zone: matched.and_then(|m| m.climate_zone.clone()),
                peak_load: matched.and_then(|m| m.peak_load),
                base_load: matched.and_then(|m| m.base_load),
                building: rec.building,
                timestamp: rec.timestamp,
                energy_kwh: rec.energy_kwh,
            }
        })
        .collect();

    warnings.extend(unmatched.into_iter().map(LoadWarning::UnmatchedBuilding));

    let has_reference = reference.is_some();
    LoadOutcome {
        table: CombinedTable::from_rows(rows, energy.has_area || has_reference, has_reference),
        metrics: reference.map(ReferenceMetrics::from_table),
        warnings,
    }
}

// ---------------------------------------------------------------------------
// CSV loaders
// ---------------------------------------------------------------------------

fn open_csv(path: &Path) -> Result<(csv::Reader<File>, Vec<String>), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    Ok((reader, headers))
}

fn require_column(path: &Path, headers: &[String], column: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
}

/// CSV layout: header row with column names. Extra columns are ignored.
/// Rows are numbered from 1 (the first data row) in error messages.
fn load_energy_csv(path: &Path) -> Result<EnergyFrame, LoadError> {
    let (mut reader, headers) = open_csv(path)?;

    let building_idx = require_column(path, &headers, BUILDING_COL)?;
    let ts_idx = require_column(path, &headers, TIMESTAMP_COL)?;
    let energy_idx = require_column(path, &headers, ENERGY_COL)?;
    let area_idx = headers.iter().position(|h| h == AREA_COL);

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let building = cell(building_idx);
        if building.is_empty() {
            return Err(LoadError::MissingValue {
                path: path.to_path_buf(),
                row,
                column: BUILDING_COL,
            });
        }

        let ts_text = cell(ts_idx);
        let timestamp = parse_timestamp(ts_text).ok_or_else(|| LoadError::InvalidTimestamp {
            path: path.to_path_buf(),
            row,
            value: ts_text.to_string(),
        })?;

        let energy_kwh = parse_optional_f64(path, row, ENERGY_COL, cell(energy_idx))?.unwrap_or(f64::NAN);
        let area = match area_idx {
            Some(idx) => parse_optional_f64(path, row, AREA_COL, cell(idx))?,
            None => None,
        };

        records.push(EnergyRecord {
            building: building.to_string(),
            timestamp,
            energy_kwh,
            area,
        });
    }

    Ok(EnergyFrame {
        records,
        has_area: area_idx.is_some(),
    })
}

/// Load the climate-zone reference CSV.
pub fn load_climate_csv(path: &Path) -> Result<ClimateTable, LoadError> {
    let (mut reader, headers) = open_csv(path)?;

    let name_idx = require_column(path, &headers, REF_BUILDING_COL)?;
    let zone_idx = require_column(path, &headers, REF_ZONE_COL)?;
    let peak_idx = require_column(path, &headers, REF_PEAK_COL)?;
    let base_idx = require_column(path, &headers, REF_BASE_COL)?;
    let area_idx = require_column(path, &headers, REF_AREA_COL)?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let building_name = cell(name_idx);
        if building_name.is_empty() {
            return Err(LoadError::MissingValue {
                path: path.to_path_buf(),
                row,
                column: REF_BUILDING_COL,
            });
        }
        let zone = cell(zone_idx);

        records.push(ClimateRecord {
            building_name: building_name.to_string(),
            climate_zone: (!zone.is_empty()).then(|| zone.to_string()),
            peak_load: parse_optional_f64(path, row, REF_PEAK_COL, cell(peak_idx))?,
            base_load: parse_optional_f64(path, row, REF_BASE_COL, cell(base_idx))?,
            area: parse_optional_f64(path, row, REF_AREA_COL, cell(area_idx))?,
        });
    }

    Ok(ClimateTable::from_records(records))
}

/// Empty cells (and the literal `NaN`) are null; anything else must be a number.
fn parse_optional_f64(
    path: &Path,
    row: usize,
    column: &'static str,
    text: &str,
) -> Result<Option<f64>, LoadError> {
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidNumber {
            path: path.to_path_buf(),
            row,
            column,
            value: text.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet layout: flat columns named like the CSV header.
/// `Timestamp` may be a string column or an Arrow timestamp column (read as UTC wall clock).
fn load_energy_parquet(path: &Path) -> Result<EnergyFrame, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut records = Vec::new();
    let mut has_area = false;
    let mut rows_before = 0;

    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = batch.schema();
        let column = |name: &'static str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };

        let building_col = column(BUILDING_COL)?;
        let ts_col = column(TIMESTAMP_COL)?;
        let energy_col = column(ENERGY_COL)?;
        let area_col = schema.index_of(AREA_COL).ok().map(|idx| batch.column(idx));
        has_area |= area_col.is_some();

        for i in 0..batch.num_rows() {
            let row = rows_before + i + 1;
            let building = string_value(path, building_col, BUILDING_COL, i)?.ok_or_else(|| {
                LoadError::MissingValue {
                    path: path.to_path_buf(),
                    row,
                    column: BUILDING_COL,
                }
            })?;
            let timestamp = timestamp_value(path, ts_col, i, row)?;
            let energy_kwh = f64_value(path, energy_col, ENERGY_COL, i)?.unwrap_or(f64::NAN);
            let area = match area_col {
                Some(col) => f64_value(path, col, AREA_COL, i)?,
                None => None,
            };

            records.push(EnergyRecord {
                building,
                timestamp,
                energy_kwh,
                area,
            });
        }
        rows_before += batch.num_rows();
    }

    Ok(EnergyFrame { records, has_area })
}

// -- Parquet / Arrow helpers --

fn unsupported(path: &Path, column: &'static str, col: &ArrayRef) -> LoadError {
    LoadError::UnsupportedColumnType {
        path: path.to_path_buf(),
        column,
        data_type: col.data_type().clone(),
    }
}

fn string_value(
    path: &Path,
    col: &ArrayRef,
    column: &'static str,
    i: usize,
) -> Result<Option<String>, LoadError> {
    if col.is_null(i) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(i),
        DataType::LargeUtf8 => col.as_string::<i64>().value(i),
        DataType::Utf8View => col.as_string_view().value(i),
        _ => return Err(unsupported(path, column, col)),
    };
    Ok(Some(value.to_string()))
}

fn f64_value(
    path: &Path,
    col: &ArrayRef,
    column: &'static str,
    i: usize,
) -> Result<Option<f64>, LoadError> {
    if col.is_null(i) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(i),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(i) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(i) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(i) as f64,
        _ => return Err(unsupported(path, column, col)),
    };
    Ok(Some(value))
}

fn timestamp_value(
    path: &Path,
    col: &ArrayRef,
    i: usize,
    row: usize,
) -> Result<NaiveDateTime, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::MissingValue {
            path: path.to_path_buf(),
            row,
            column: TIMESTAMP_COL,
        });
    }
    let (parsed, raw) = match col.data_type() {
        DataType::Timestamp(unit, _) => {
            let (utc, raw) = match unit {
                TimeUnit::Second => {
                    let v = col.as_primitive::<TimestampSecondType>().value(i);
                    (DateTime::from_timestamp(v, 0), v)
                }
                TimeUnit::Millisecond => {
                    let v = col.as_primitive::<TimestampMillisecondType>().value(i);
                    (DateTime::from_timestamp_millis(v), v)
                }
                TimeUnit::Microsecond => {
                    let v = col.as_primitive::<TimestampMicrosecondType>().value(i);
                    (DateTime::from_timestamp_micros(v), v)
                }
                TimeUnit::Nanosecond => {
                    let v = col.as_primitive::<TimestampNanosecondType>().value(i);
                    (Some(DateTime::from_timestamp_nanos(v)), v)
                }
            };
            (utc.map(|d| d.naive_utc()), raw.to_string())
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let text = string_value(path, col, TIMESTAMP_COL, i)?.unwrap_or_default();
            (parse_timestamp(&text), text)
        }
        _ => return Err(unsupported(path, TIMESTAMP_COL, col)),
    };
    parsed.ok_or_else(|| LoadError::InvalidTimestamp {
        path: path.to_path_buf(),
        row,
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use anyhow::Result;
    use arrow::array::{Float64Array, StringArray, TimestampSecondArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    const ENERGY_HEADER: &str = "Building,Timestamp,CTR01_BuildingEnergy_kWhHourly(kW-hr)";
    const CLIMATE_HEADER: &str = "Building Name,Climate zone,Peak load,Base load,Area";

    fn write(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, body)?;
        Ok(path)
    }

    #[test]
    fn left_join_keeps_every_row_and_warns_on_unmatched() -> Result<()> {
        let dir = tempdir()?;
        let primary = write(
            dir.path(),
            "energy.csv",
            &format!(
                "{ENERGY_HEADER}\n\
                 B,2024-01-01 01:00:00,3.0\n\
                 A,2024-01-01 01:00:00,2.0\n\
                 A,2024-01-01 00:00:00,1.0\n\
                 B,2024-01-01 00:00:00,4.0\n"
            ),
        )?;
        let climate = write(
            dir.path(),
            "zones.csv",
            &format!("{CLIMATE_HEADER}\nA,Z1,10.0,2.0,100.0\n"),
        )?;

        let outcome = load_sources(&DataSources::new(&primary, Some(climate)))?;
        let table = &outcome.table;

        assert_eq!(table.len(), 4);
        assert_eq!(table.buildings.len(), 2);
        assert_eq!(outcome.warnings, vec![LoadWarning::UnmatchedBuilding("B".into())]);

        for row in &table.rows {
            match row.building.as_str() {
                "A" => {
                    assert_eq!(row.climate_zone.as_deref(), Some("Z1"));
                    assert_eq!(row.area, Some(100.0));
                    assert_eq!(row.peak_load, Some(10.0));
                }
                _ => {
                    assert_eq!(row.climate_zone, None);
                    assert_eq!(row.area, None);
                    assert_eq!(row.base_load, None);
                }
            }
        }

        let energies: Vec<f64> = table.rows.iter().map(|r| r.energy_kwh).collect();
        assert_eq!(energies, vec![1.0, 2.0, 4.0, 3.0]);
        Ok(())
    }

    #[test]
    fn primary_area_used_without_reference() -> Result<()> {
        let dir = tempdir()?;
        let primary = write(
            dir.path(),
            "energy.csv",
            &format!("{ENERGY_HEADER},Area\nA,2024-01-01 00:00,1.5,50\nA,2024-01-01 01:00,,\n"),
        )?;
        let outcome = load_sources(&DataSources::new(&primary, None))?;

        assert!(outcome.table.has_area);
        assert!(!outcome.table.has_reference);
        assert!(outcome.metrics.is_none());
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.table.rows[0].area, Some(50.0));
        assert_eq!(outcome.table.rows[1].area, None);
        assert!(outcome.table.rows[1].energy_kwh.is_nan());
        Ok(())
    }

    #[test]
    fn missing_energy_column_is_a_load_error() -> Result<()> {
        let dir = tempdir()?;
        let primary = write(dir.path(), "energy.csv", "Building,Timestamp\nA,2024-01-01\n")?;

        let err = load_energy(&primary).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: ENERGY_COL, .. }));
        Ok(())
    }

    #[test]
    fn climate_file_requires_zone_column() -> Result<()> {
        let dir = tempdir()?;
        let climate = write(dir.path(), "zones.csv", "Building Name,Peak load,Base load,Area\nA,1,1,1\n")?;

        let err = load_climate_csv(&climate).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: REF_ZONE_COL, .. }));
        Ok(())
    }

    #[test]
    fn bad_timestamp_reports_row() -> Result<()> {
        let dir = tempdir()?;
        let primary = write(
            dir.path(),
            "energy.csv",
            &format!("{ENERGY_HEADER}\nA,2024-01-01 00:00,1\nA,not a date,2\n"),
        )?;

        match load_energy(&primary).unwrap_err() {
            LoadError::InvalidTimestamp { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn non_numeric_energy_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let primary = write(
            dir.path(),
            "energy.csv",
            &format!("{ENERGY_HEADER}\nA,2024-01-01 00:00,lots\n"),
        )?;

        let err = load_energy(&primary).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNumber { row: 1, column: ENERGY_COL, .. }));
        Ok(())
    }

    #[test]
    fn unreadable_and_unknown_sources() {
        let missing = Path::new("/definitely/not/here.csv");
        assert!(matches!(load_energy(missing), Err(LoadError::Io { .. })));
        assert!(matches!(
            load_energy(Path::new("data.xlsx")),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn duplicate_reference_rows_do_not_multiply_rows() -> Result<()> {
        let dir = tempdir()?;
        let primary = write(
            dir.path(),
            "energy.csv",
            &format!("{ENERGY_HEADER}\nA,2024-01-01 00:00,1\nA,2024-01-01 01:00,2\n"),
        )?;
        let climate = write(
            dir.path(),
            "zones.csv",
            &format!("{CLIMATE_HEADER}\nA,Z1,10,2,100\nA,Z9,1,1,1\n"),
        )?;

        let outcome = load_sources(&DataSources::new(&primary, Some(climate)))?;
        assert_eq!(outcome.table.len(), 2);
        assert!(outcome.table.rows.iter().all(|r| r.climate_zone.as_deref() == Some("Z1")));
        assert_eq!(outcome.warnings, vec![LoadWarning::DuplicateReferenceKey("A".into())]);
        Ok(())
    }

    #[test]
    fn parquet_with_arrow_timestamps() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("energy.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(BUILDING_COL, DataType::Utf8, false),
            Field::new(TIMESTAMP_COL, DataType::Timestamp(TimeUnit::Second, None), false),
            Field::new(ENERGY_COL, DataType::Float64, true),
            Field::new(AREA_COL, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["B", "A"])),
                Arc::new(TimestampSecondArray::from(vec![1_704_067_200, 1_704_070_800])),
                Arc::new(Float64Array::from(vec![Some(2.0), None])),
                Arc::new(Float64Array::from(vec![Some(10.0), Some(20.0)])),
            ],
        )?;
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let frame = load_energy(&path)?;
        assert!(frame.has_area);
        assert_eq!(frame.records.len(), 2);
        assert_eq!(frame.records[0].building, "B");
        assert_eq!(
            frame.records[0].timestamp,
            parse_timestamp("2024-01-01 00:00:00").unwrap()
        );
        assert!(frame.records[1].energy_kwh.is_nan());
        assert_eq!(frame.records[1].area, Some(20.0));
        Ok(())
    }
}
