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
            hsl_to_color32(hue, 0.75, 0.55)
        })
        .collect()
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Diverging bar colour: warm red for positive deltas, cool blue otherwise.
/// Saturation grows with the magnitude relative to `scale`.
pub fn diverging_color(value: f64, scale: f64) -> Color32 {
    let strength = if scale > 0.0 {
        (value.abs() / scale).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    let hue = if value > 0.0 { 5.0 } else { 215.0 };
    hsl_to_color32(hue, 0.35 + 0.5 * strength, 0.5)
}

// ---------------------------------------------------------------------------
// Color mapping: continent → Color32
// ---------------------------------------------------------------------------

/// Maps continents to distinct colours for the line chart and legend.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(continents: &BTreeSet<String>) -> Self {
        let palette = generate_palette(continents.len());
        let mapping = continents.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, continent: &str) -> Color32 {
        self.mapping
            .get(continent)
            .copied()
            .unwrap_or(self.default_color)
    }
}
