use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Translucent fill for the morning shading band.
pub const SHADING_FILL: Color32 = Color32::from_rgba_premultiplied(60, 60, 20, 40);

// ---------------------------------------------------------------------------
// Color mapping: building name → Color32
// ---------------------------------------------------------------------------

/// Gives every building a stable colour so its energy and EUI lines match.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map from the full (sorted) building list.
    pub fn new(buildings: &BTreeSet<String>) -> Self {
        let mapping = buildings
            .iter()
            .cloned()
            .zip(generate_palette(buildings.len()))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, building: &str) -> Color32 {
        self.mapping
            .get(building)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}
