use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{CombinedRecord, CombinedTable};

// ---------------------------------------------------------------------------
// Selection: which zones and buildings the user picked
// ---------------------------------------------------------------------------

/// User selection. An empty set means "no filter" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub zones: BTreeSet<String>,
    pub buildings: BTreeSet<String>,
}

impl Selection {
    /// Selection used by the hourly view: exactly one building, any zone.
    pub fn single_building(building: &str) -> Self {
        Selection {
            zones: BTreeSet::new(),
            buildings: BTreeSet::from([building.to_string()]),
        }
    }

    pub fn toggle_zone(&mut self, zone: &str) {
        toggle(&mut self.zones, zone);
    }

    pub fn toggle_building(&mut self, building: &str) {
        toggle(&mut self.buildings, building);
    }

    /// Drop selected values that no longer exist in `table` (after a reload).
    pub fn retain_known(&mut self, table: &CombinedTable) {
        self.zones.retain(|z| table.climate_zones.contains(z));
        self.buildings.retain(|b| table.buildings.contains(b));
    }

    pub fn clear(&mut self) {
        self.zones.clear();
        self.buildings.clear();
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows that survived the filters, still sorted by (building, timestamp).
#[derive(Debug, Clone, Default)]
pub struct FilteredTable {
    pub rows: Vec<CombinedRecord>,
}

impl FilteredTable {
    pub fn buildings(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.building.clone()).collect()
    }

    /// Distinct calendar dates present, ascending.
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.rows.iter().map(|r| r.timestamp.date()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of applying a selection. `Empty` is a state to present, not an error.
#[derive(Debug, Clone)]
pub enum FilterOutcome {
    Rows(FilteredTable),
    Empty,
}

/// Return indices of rows that pass the selection.
///
/// Zones are applied first, then buildings:
/// * empty set → the dimension is not filtered
/// * otherwise → the row's value must be in the set (a null zone never matches)
pub fn filtered_indices(table: &CombinedTable, selection: &Selection) -> Vec<usize> {
    let by_zone = table.rows.iter().enumerate().filter(|(_, row)| {
        selection.zones.is_empty()
            || row
                .climate_zone
                .as_ref()
                .is_some_and(|z| selection.zones.contains(z))
    });

    by_zone
        .filter(|(_, row)| {
            selection.buildings.is_empty() || selection.buildings.contains(&row.building)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Apply the selection and copy the surviving rows into a new table.
pub fn apply(table: &CombinedTable, selection: &Selection) -> FilterOutcome {
    let rows: Vec<CombinedRecord> = filtered_indices(table, selection)
        .into_iter()
        .map(|i| table.rows[i].clone())
        .collect();

    if rows.is_empty() {
        FilterOutcome::Empty
    } else {
        FilterOutcome::Rows(FilteredTable { rows })
    }
}
