use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::ClimateTable;

// ---------------------------------------------------------------------------
// LoadRatio – base load over peak load
// ---------------------------------------------------------------------------

/// Base-to-peak load ratio of one building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadRatio {
    Ratio(f64),
    /// Peak load is zero. The raw quotient (±inf or NaN) is kept as-is.
    DivisionAnomaly(f64),
    /// Peak or base load is null in the reference.
    Unavailable,
}

impl LoadRatio {
    /// `base / peak` with no guard against a zero peak.
    pub fn compute(base_load: Option<f64>, peak_load: Option<f64>) -> Self {
        match (base_load, peak_load) {
            (Some(base), Some(peak)) if peak == 0.0 => LoadRatio::DivisionAnomaly(base / peak),
            (Some(base), Some(peak)) => LoadRatio::Ratio(base / peak),
            _ => LoadRatio::Unavailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            LoadRatio::Ratio(v) | LoadRatio::DivisionAnomaly(v) => Some(*v),
            LoadRatio::Unavailable => None,
        }
    }
}

impl fmt::Display for LoadRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadRatio::Ratio(v) => write!(f, "{v:.3}"),
            LoadRatio::DivisionAnomaly(v) => write!(f, "{v}"),
            LoadRatio::Unavailable => write!(f, ""),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-building metrics
// ---------------------------------------------------------------------------

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingMetrics {
    pub building: String,
    pub peak_load: Option<f64>,
    pub base_load: Option<f64>,
    pub base_to_peak: LoadRatio,
    pub area: Option<f64>,
}

/// Metrics for every building of a reference table, ratio computed once at load.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMetrics {
    by_building: BTreeMap<String, BuildingMetrics>,
}

impl ReferenceMetrics {
    pub fn from_table(table: &ClimateTable) -> Self {
        let by_building = table
            .records()
            .map(|rec| {
                let metrics = BuildingMetrics {
                    building: rec.building_name.clone(),
                    peak_load: rec.peak_load,
                    base_load: rec.base_load,
                    base_to_peak: LoadRatio::compute(rec.base_load, rec.peak_load),
                    area: rec.area,
                };
                (rec.building_name.clone(), metrics)
            })
            .collect();
        ReferenceMetrics { by_building }
    }

    pub fn get(&self, building: &str) -> Option<&BuildingMetrics> {
        self.by_building.get(building)
    }

    /// Summary rows for the buildings in view that have a reference row, by name.
    pub fn summary_for(&self, buildings: &BTreeSet<String>) -> Vec<BuildingMetrics> {
        buildings
            .iter()
            .filter_map(|b| self.by_building.get(b))
            .cloned()
            .collect()
    }
}
