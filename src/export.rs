use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::{
    AREA_COL, BUILDING_COL, CombinedRecord, ENERGY_COL, REF_BASE_COL, REF_PEAK_COL, REF_ZONE_COL,
    TIMESTAMP_COL,
};
use crate::data::timestamp::format_timestamp;

/// Scope of the "download all" export.
pub const ALL_SCOPE: &str = "all_buildings";
/// Scope of the climate view export.
pub const FILTERED_SCOPE: &str = "filtered";

/// `<scope>_energy.csv`, with path separators in the scope replaced.
pub fn export_file_name(scope: &str) -> String {
    let scope: String = scope
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{scope}_energy.csv")
}

/// Serialise rows as CSV.
///
/// `Area` is written when any row has one; the joined climate columns when
/// `with_reference` is set. Nulls become empty cells.
pub fn rows_to_csv(rows: &[CombinedRecord], with_reference: bool) -> Result<Vec<u8>> {
    let with_area = rows.iter().any(|r| r.area.is_some());

    let mut header = vec![BUILDING_COL, TIMESTAMP_COL, ENERGY_COL];
    if with_area {
        header.push(AREA_COL);
    }
    if with_reference {
        header.extend([REF_ZONE_COL, REF_PEAK_COL, REF_BASE_COL]);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header).context("writing CSV header")?;

    for row in rows {
        let mut record = vec![
            row.building.clone(),
            format_timestamp(&row.timestamp),
            number_cell(Some(row.energy_kwh)),
        ];
        if with_area {
            record.push(number_cell(row.area));
        }
        if with_reference {
            record.push(row.climate_zone.clone().unwrap_or_default());
            record.push(number_cell(row.peak_load));
            record.push(number_cell(row.base_load));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row for {}", row.building))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Serialise `rows` and write them to `path`.
pub fn write_csv(path: &Path, rows: &[CombinedRecord], with_reference: bool) -> Result<()> {
    let bytes = rows_to_csv(rows, with_reference)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn number_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => String::new(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timestamp::parse_timestamp;
    use tempfile::tempdir;

    fn record(building: &str, area: Option<f64>, zone: Option<&str>) -> CombinedRecord {
        CombinedRecord {
            building: building.into(),
            timestamp: parse_timestamp("2024-05-01 07:00").unwrap(),
            energy_kwh: 12.5,
            area,
            climate_zone: zone.map(Into::into),
            peak_load: zone.map(|_| 40.0),
            base_load: None,
        }
    }

    #[test]
    fn file_names_follow_scope_pattern() {
        assert_eq!(export_file_name(ALL_SCOPE), "all_buildings_energy.csv");
        assert_eq!(export_file_name("Library"), "Library_energy.csv");
        assert_eq!(export_file_name("Lab A/B"), "Lab A_B_energy.csv");
    }

    #[test]
    fn plain_rows_have_three_columns() -> Result<()> {
        let bytes = rows_to_csv(&[record("A", None, None)], false)?;
        let text = String::from_utf8(bytes)?;
        assert_eq!(
            text,
            "Building,Timestamp,CTR01_BuildingEnergy_kWhHourly(kW-hr)\n\
             A,2024-05-01 07:00:00,12.5\n"
        );
        Ok(())
    }

    #[test]
    fn joined_rows_write_nulls_as_empty_cells() -> Result<()> {
        let rows = [record("A", Some(300.0), Some("Z1")), record("B", None, None)];
        let text = String::from_utf8(rows_to_csv(&rows, true)?)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Building,Timestamp,CTR01_BuildingEnergy_kWhHourly(kW-hr),Area,Climate zone,Peak load,Base load"
        );
        assert_eq!(lines[1], "A,2024-05-01 07:00:00,12.5,300,Z1,40,");
        assert_eq!(lines[2], "B,2024-05-01 07:00:00,12.5,,,,");
        Ok(())
    }

    #[test]
    fn exported_file_loads_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(export_file_name("A"));
        write_csv(&path, &[record("A", Some(300.0), None)], false)?;

        let frame = crate::data::loader::load_energy(&path)?;
        assert_eq!(frame.records.len(), 1);
        assert_eq!(frame.records[0].area, Some(300.0));
        Ok(())
    }
}
