use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Text layouts accepted for the `Timestamp` column, tried in order after RFC 3339.
const FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Format used when timestamps are written back out (CSV export, tables).
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp cell into wall-clock time.
///
/// Offsets in RFC 3339 input are dropped: the local wall-clock reading is kept,
/// so `2024-01-01T06:00:00+02:00` becomes `2024-01-01 06:00:00`.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Plot x-coordinate for a timestamp: seconds since the epoch, wall clock read as UTC.
pub fn to_plot_x(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

/// Inverse of [`to_plot_x`], used by axis and hover labels.
pub fn from_plot_x(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    DateTime::from_timestamp(x.round() as i64, 0).map(|dt| dt.naive_utc())
}
