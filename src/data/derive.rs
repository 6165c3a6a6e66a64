use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::model::CombinedRecord;

// ---------------------------------------------------------------------------
// Energy use intensity
// ---------------------------------------------------------------------------

/// EUI of one building-hour: kWh per unit of floor area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuiPoint {
    pub timestamp: NaiveDateTime,
    pub eui: f64,
}

/// Why a building has no EUI series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EuiOmission {
    /// Neither source carried an `Area` column.
    NoAreaColumn,
    /// `missing` of the building's `total` rows have a null area.
    IncompleteArea { missing: usize, total: usize },
}

#[derive(Debug, Clone, Default)]
pub struct EuiDerivation {
    /// Building → EUI series in row order.
    pub series: BTreeMap<String, Vec<EuiPoint>>,
    /// Buildings left out of `series`. Not shown to the user.
    pub omitted: BTreeMap<String, EuiOmission>,
}

/// Group `rows` by building and divide energy by area.
///
/// A building is kept only when every one of its rows has an area; otherwise it
/// lands in `omitted`. Zero areas are not guarded and give non-finite values.
pub fn derive_eui(rows: &[CombinedRecord], has_area: bool) -> EuiDerivation {
    let mut groups: BTreeMap<&str, Vec<&CombinedRecord>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.building.as_str()).or_default().push(row);
    }

    let mut derivation = EuiDerivation::default();
    for (building, group) in groups {
        if !has_area {
            derivation
                .omitted
                .insert(building.to_string(), EuiOmission::NoAreaColumn);
            continue;
        }

        let missing = group.iter().filter(|r| r.area.is_none()).count();
        if missing > 0 {
            derivation.omitted.insert(
                building.to_string(),
                EuiOmission::IncompleteArea {
                    missing,
                    total: group.len(),
                },
            );
            continue;
        }

        let series = group
            .iter()
            .filter_map(|r| {
                r.area.map(|area| EuiPoint {
                    timestamp: r.timestamp,
                    eui: r.energy_kwh / area,
                })
            })
            .collect();
        derivation.series.insert(building.to_string(), series);
    }
    derivation
}

// ---------------------------------------------------------------------------
// Morning shading overlay
// ---------------------------------------------------------------------------

/// Time-of-day band shaded on every date of the EUI chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for DailyWindow {
    fn default() -> Self {
        DailyWindow {
            start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// One shaded interval on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One window per distinct date, ascending.
pub fn shading_windows(dates: &BTreeSet<NaiveDate>, window: DailyWindow) -> Vec<ShadingWindow> {
    dates
        .iter()
        .map(|date| ShadingWindow {
            start: date.and_time(window.start),
            end: date.and_time(window.end),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn hourly(building: &str, areas: impl Fn(u32) -> Option<f64>) -> Vec<CombinedRecord> {
        (0..24)
            .map(|h| CombinedRecord {
                building: building.into(),
                timestamp: day().and_hms_opt(h, 0, 0).unwrap(),
                energy_kwh: 10.0 + h as f64,
                area: areas(h),
                climate_zone: Some("Z1".into()),
                peak_load: None,
                base_load: None,
            })
            .collect()
    }

    #[test]
    fn complete_day_yields_24_values() {
        let rows = hourly("A", |_| Some(200.0));
        let derived = derive_eui(&rows, true);

        let series = &derived.series["A"];
        assert_eq!(series.len(), 24);
        for (point, row) in series.iter().zip(&rows) {
            assert_eq!(point.timestamp, row.timestamp);
            assert_eq!(point.eui, row.energy_kwh / 200.0);
        }
        assert!(derived.omitted.is_empty());
    }

    #[test]
    fn one_null_area_omits_the_building() {
        let mut rows = hourly("A", |_| Some(200.0));
        rows.extend(hourly("B", |h| (h != 13).then_some(150.0)));

        let derived = derive_eui(&rows, true);
        assert!(derived.series.contains_key("A"));
        assert!(!derived.series.contains_key("B"));
        assert_eq!(
            derived.omitted["B"],
            EuiOmission::IncompleteArea { missing: 1, total: 24 }
        );
    }

    #[test]
    fn no_area_column_omits_everyone() {
        let derived = derive_eui(&hourly("A", |_| None), false);
        assert!(derived.series.is_empty());
        assert_eq!(derived.omitted["A"], EuiOmission::NoAreaColumn);
    }

    #[test]
    fn zero_area_is_not_masked() {
        let derived = derive_eui(&hourly("A", |_| Some(0.0)), true);
        assert!(derived.series["A"].iter().all(|p| p.eui.is_infinite()));
    }

    #[test]
    fn one_shading_window_per_date() {
        let next = day().succ_opt().unwrap();
        let dates = BTreeSet::from([next, day()]);
        let windows = shading_windows(&dates, DailyWindow::default());

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start, day().and_hms_opt(6, 0, 0).unwrap());
        assert_eq!(windows[0].end, day().and_hms_opt(9, 30, 0).unwrap());
        assert_eq!(windows[1].start.date(), next);
    }
}
