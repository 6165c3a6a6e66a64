use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Column names of the input files
// ---------------------------------------------------------------------------

pub const BUILDING_COL: &str = "Building";
pub const TIMESTAMP_COL: &str = "Timestamp";
pub const ENERGY_COL: &str = "CTR01_BuildingEnergy_kWhHourly(kW-hr)";
pub const AREA_COL: &str = "Area";

pub const REF_BUILDING_COL: &str = "Building Name";
pub const REF_ZONE_COL: &str = "Climate zone";
pub const REF_PEAK_COL: &str = "Peak load";
pub const REF_BASE_COL: &str = "Base load";
pub const REF_AREA_COL: &str = "Area";

// ---------------------------------------------------------------------------
// EnergyRecord – one row of the primary hourly file
// ---------------------------------------------------------------------------

/// One building-hour reading from the primary source.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRecord {
    pub building: String,
    pub timestamp: NaiveDateTime,
    /// Hourly energy in kWh. Empty cells load as NaN.
    pub energy_kwh: f64,
    pub area: Option<f64>,
}

/// The primary source as read from disk, before the join.
#[derive(Debug, Clone, Default)]
pub struct EnergyFrame {
    pub records: Vec<EnergyRecord>,
    /// Whether the source carried an `Area` column at all.
    pub has_area: bool,
}

// ---------------------------------------------------------------------------
// ClimateRecord / ClimateTable – the reference file
// ---------------------------------------------------------------------------

/// One row of the climate-zone reference file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRecord {
    pub building_name: String,
    pub climate_zone: Option<String>,
    pub peak_load: Option<f64>,
    pub base_load: Option<f64>,
    pub area: Option<f64>,
}

/// Reference rows keyed by building name.
///
/// The first row for a name wins; later rows with the same name are kept in
/// `duplicates` so the loader can warn about them.
#[derive(Debug, Clone, Default)]
pub struct ClimateTable {
    by_building: BTreeMap<String, ClimateRecord>,
    duplicates: BTreeSet<String>,
}

impl ClimateTable {
    pub fn from_records(records: Vec<ClimateRecord>) -> Self {
        let mut table = ClimateTable::default();
        for rec in records {
            if table.by_building.contains_key(&rec.building_name) {
                table.duplicates.insert(rec.building_name);
            } else {
                table.by_building.insert(rec.building_name.clone(), rec);
            }
        }
        table
    }

    pub fn get(&self, building: &str) -> Option<&ClimateRecord> {
        self.by_building.get(building)
    }

    pub fn records(&self) -> impl Iterator<Item = &ClimateRecord> {
        self.by_building.values()
    }

    pub fn duplicates(&self) -> &BTreeSet<String> {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.by_building.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_building.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CombinedRecord – energy row after the left join
// ---------------------------------------------------------------------------

/// An energy row left-joined with its climate reference row.
/// Reference fields are `None` when the building had no match.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRecord {
    pub building: String,
    pub timestamp: NaiveDateTime,
    pub energy_kwh: f64,
    pub area: Option<f64>,
    pub climate_zone: Option<String>,
    pub peak_load: Option<f64>,
    pub base_load: Option<f64>,
}

// ---------------------------------------------------------------------------
// CombinedTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The combined table, sorted by (building, timestamp), with the distinct
/// values the selection widgets offer.
#[derive(Debug, Clone, Default)]
pub struct CombinedTable {
    pub rows: Vec<CombinedRecord>,
    /// Sorted distinct building names.
    pub buildings: BTreeSet<String>,
    /// Sorted distinct non-null climate zones.
    pub climate_zones: BTreeSet<String>,
    /// Whether an `Area` column exists (from the primary file or the reference).
    pub has_area: bool,
    /// Whether a climate reference was joined in.
    pub has_reference: bool,
}

impl CombinedTable {
    /// Sort the rows and build the distinct-value indices.
    pub fn from_rows(mut rows: Vec<CombinedRecord>, has_area: bool, has_reference: bool) -> Self {
        rows.sort_by(|a, b| {
            a.building
                .cmp(&b.building)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });

        let mut buildings = BTreeSet::new();
        let mut climate_zones = BTreeSet::new();
        for row in &rows {
            if !buildings.contains(&row.building) {
                buildings.insert(row.building.clone());
            }
            if let Some(zone) = &row.climate_zone {
                if !climate_zones.contains(zone) {
                    climate_zones.insert(zone.clone());
                }
            }
        }

        CombinedTable {
            rows,
            buildings,
            climate_zones,
            has_area,
            has_reference,
        }
    }

    /// Buildings whose climate zone is in `zones`; every building when `zones` is empty.
    pub fn buildings_in_zones(&self, zones: &BTreeSet<String>) -> BTreeSet<String> {
        if zones.is_empty() {
            return self.buildings.clone();
        }
        self.rows
            .iter()
            .filter(|r| r.climate_zone.as_ref().is_some_and(|z| zones.contains(z)))
            .map(|r| r.building.clone())
            .collect()
    }

    /// The first `n` rows, for the preview table.
    pub fn head(&self, n: usize) -> &[CombinedRecord] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
