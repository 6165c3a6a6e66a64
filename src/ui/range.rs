// ---------------------------------------------------------------------------
// Time-range presets and the range slider
// ---------------------------------------------------------------------------

const HOUR: f64 = 3600.0;

/// Width of the visible time window on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePreset {
    SixHours,
    TwelveHours,
    OneDay,
    OneWeek,
    #[default]
    All,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::SixHours,
        RangePreset::TwelveHours,
        RangePreset::OneDay,
        RangePreset::OneWeek,
        RangePreset::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RangePreset::SixHours => "6h",
            RangePreset::TwelveHours => "12h",
            RangePreset::OneDay => "1d",
            RangePreset::OneWeek => "1w",
            RangePreset::All => "All",
        }
    }

    /// Window width in seconds; `None` shows everything.
    pub fn span(self) -> Option<f64> {
        match self {
            RangePreset::SixHours => Some(6.0 * HOUR),
            RangePreset::TwelveHours => Some(12.0 * HOUR),
            RangePreset::OneDay => Some(24.0 * HOUR),
            RangePreset::OneWeek => Some(7.0 * 24.0 * HOUR),
            RangePreset::All => None,
        }
    }
}

/// Preset plus slider position, shared by every chart of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeControl {
    pub preset: RangePreset,
    /// Where the window ends, from 0.0 (start of data) to 1.0 (latest reading).
    pub position: f64,
}

impl Default for RangeControl {
    fn default() -> Self {
        RangeControl {
            preset: RangePreset::All,
            position: 1.0,
        }
    }
}

impl RangeControl {
    /// Visible x-range for data spanning `[first, last]`, or `None` to auto-fit.
    ///
    /// The window never extends past the data; a window wider than the data
    /// covers all of it.
    pub fn visible_window(&self, first: f64, last: f64) -> Option<(f64, f64)> {
        let span = self.preset.span()?;
        if !(first.is_finite() && last.is_finite()) || last <= first {
            return None;
        }
        if span >= last - first {
            return Some((first, last));
        }
        let position = self.position.clamp(0.0, 1.0);
        let end = first + span + position * (last - first - span);
        Some((end - span, end))
    }
}

/// Min and max of the finite `y` values whose `x` falls in `[x0, x1]`.
pub fn y_extent<'a>(points: impl IntoIterator<Item = &'a [f64; 2]>, x0: f64, x1: f64) -> Option<(f64, f64)> {
    points
        .into_iter()
        .filter(|[x, y]| *x >= x0 && *x <= x1 && y.is_finite())
        .fold(None, |acc, [_, y]| match acc {
            None => Some((*y, *y)),
            Some((lo, hi)) => Some((lo.min(*y), hi.max(*y))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: f64 = 24.0 * HOUR;

    #[test]
    fn all_preset_auto_fits() {
        assert_eq!(RangeControl::default().visible_window(0.0, 10.0 * DAY), None);
    }

    #[test]
    fn window_slides_over_the_data() {
        let mut range = RangeControl {
            preset: RangePreset::OneDay,
            position: 1.0,
        };
        assert_eq!(range.visible_window(0.0, 10.0 * DAY), Some((9.0 * DAY, 10.0 * DAY)));

        range.position = 0.0;
        assert_eq!(range.visible_window(0.0, 10.0 * DAY), Some((0.0, DAY)));

        range.position = 0.5;
        assert_eq!(range.visible_window(0.0, 10.0 * DAY), Some((4.5 * DAY, 5.5 * DAY)));
    }

    #[test]
    fn window_clamps_to_short_data() {
        let range = RangeControl {
            preset: RangePreset::OneWeek,
            position: 0.3,
        };
        assert_eq!(range.visible_window(100.0, 100.0 + DAY), Some((100.0, 100.0 + DAY)));
        assert_eq!(range.visible_window(5.0, 5.0), None);
    }

    #[test]
    fn labels_follow_chart_buttons() {
        let labels: Vec<&str> = RangePreset::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["6h", "12h", "1d", "1w", "All"]);
        assert_eq!(RangePreset::SixHours.span(), Some(6.0 * HOUR));
    }

    #[test]
    fn y_extent_ignores_points_outside_window_and_non_finite() {
        let points = [[0.0, 5.0], [1.0, f64::NAN], [2.0, -1.0], [3.0, 2.0], [9.0, 100.0]];
        assert_eq!(y_extent(&points, 0.0, 3.0), Some((-1.0, 5.0)));
        assert_eq!(y_extent(&points, 4.0, 8.0), None);
    }
}
