use super::derive::{DailyWindow, EuiDerivation, ShadingWindow, derive_eui, shading_windows};
use super::filter::{FilterOutcome, FilteredTable, Selection, apply};
use super::loader::LoadOutcome;
use super::summary::BuildingMetrics;

/// Everything the charts and tables of one view need.
#[derive(Debug, Clone)]
pub struct ViewData {
    pub filtered: FilteredTable,
    pub eui: EuiDerivation,
    pub shading: Vec<ShadingWindow>,
    pub summary: Vec<BuildingMetrics>,
}

#[derive(Debug, Clone)]
pub enum ViewState {
    /// The selection matched nothing.
    NoData,
    Ready(ViewData),
}

/// filter → derive → summarise, for one interaction.
pub fn run(outcome: &LoadOutcome, selection: &Selection, window: DailyWindow) -> ViewState {
    let filtered = match apply(&outcome.table, selection) {
        FilterOutcome::Rows(filtered) => filtered,
        FilterOutcome::Empty => return ViewState::NoData,
    };

    let eui = derive_eui(&filtered.rows, outcome.table.has_area);
    let shading = shading_windows(&filtered.dates(), window);
    let summary = outcome
        .metrics
        .as_ref()
        .map(|m| m.summary_for(&filtered.buildings()))
        .unwrap_or_default();

    ViewState::Ready(ViewData {
        filtered,
        eui,
        shading,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{LoadWarning, combine};
    use crate::data::model::{ClimateRecord, ClimateTable, EnergyFrame, EnergyRecord};
    use chrono::NaiveDate;

    fn energy(buildings: &[&str]) -> EnergyFrame {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let records = buildings
            .iter()
            .flat_map(|b| {
                (0..24).map(move |h| EnergyRecord {
                    building: b.to_string(),
                    timestamp: day.and_hms_opt(h, 0, 0).unwrap(),
                    energy_kwh: 5.0,
                    area: None,
                })
            })
            .collect();
        EnergyFrame {
            records,
            has_area: false,
        }
    }

    fn zones() -> ClimateTable {
        ClimateTable::from_records(vec![ClimateRecord {
            building_name: "A".into(),
            climate_zone: Some("Z1".into()),
            peak_load: Some(8.0),
            base_load: Some(2.0),
            area: Some(100.0),
        }])
    }

    #[test]
    fn unmatched_building_scenario() {
        let outcome = combine(energy(&["A", "B"]), Some(&zones()));
        assert_eq!(outcome.table.buildings.len(), 2);
        assert_eq!(outcome.table.len(), 48);
        assert!(outcome
            .table
            .rows
            .iter()
            .filter(|r| r.building == "B")
            .all(|r| r.climate_zone.is_none()));
        assert_eq!(outcome.warnings, vec![LoadWarning::UnmatchedBuilding("B".into())]);

        let selection = Selection {
            zones: ["Z1".to_string()].into(),
            ..Default::default()
        };
        let ViewState::Ready(view) = run(&outcome, &selection, DailyWindow::default()) else {
            panic!("expected data for Z1");
        };
        assert!(view.filtered.rows.iter().all(|r| r.building == "A"));
        assert_eq!(view.eui.series["A"].len(), 24);
        assert_eq!(view.eui.series["A"][0].eui, 0.05);
        assert_eq!(view.shading.len(), 1);
        assert_eq!(view.summary.len(), 1);
        assert_eq!(view.summary[0].building, "A");
    }

    #[test]
    fn unfiltered_view_omits_eui_for_unmatched_building() {
        let outcome = combine(energy(&["A", "B"]), Some(&zones()));
        let ViewState::Ready(view) = run(&outcome, &Selection::default(), DailyWindow::default())
        else {
            panic!("expected data");
        };
        assert_eq!(view.filtered.len(), 48);
        assert!(view.eui.series.contains_key("A"));
        assert!(view.eui.omitted.contains_key("B"));
        assert_eq!(view.summary.len(), 1);
    }

    #[test]
    fn empty_selection_result_is_no_data() {
        let outcome = combine(energy(&["A"]), None);
        let selection = Selection::single_building("Z");
        assert!(matches!(
            run(&outcome, &selection, DailyWindow::default()),
            ViewState::NoData
        ));
    }

    #[test]
    fn no_reference_means_no_summary() {
        let outcome = combine(energy(&["A"]), None);
        let ViewState::Ready(view) = run(&outcome, &Selection::default(), DailyWindow::default())
        else {
            panic!("expected data");
        };
        assert!(view.summary.is_empty());
        assert!(view.eui.series.is_empty());
    }
}
