use std::collections::BTreeMap;

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

// ---------------------------------------------------------------------------
// Color mapping: protocol label → Color32
// ---------------------------------------------------------------------------

/// Maps protocol labels to distinct colours so every chart colours a given
/// protocol the same way.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map from labels in row order.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> = labels
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a protocol label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Sequential heat ramp for the heatmap
// ---------------------------------------------------------------------------

fn lerp(a: Srgb, b: Srgb, t: f32) -> Srgb {
    Srgb::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}

/// Map `t` in [0, 1] onto a yellow → green → blue ramp (low → high).
pub fn heat_color(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;

    let low = Srgb::new(1.0_f32, 1.0, 0.75);
    let mid = Srgb::new(0.25_f32, 0.71, 0.60);
    let high = Srgb::new(0.13_f32, 0.23, 0.55);

    let rgb = if t < 0.5 {
        lerp(low, mid, t * 2.0)
    } else {
        lerp(mid, high, (t - 0.5) * 2.0)
    };
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_and_sized() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let unique: std::collections::BTreeSet<_> =
            colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_falls_back_to_gray() {
        let cm = ColorMap::new(&["RSA 2048".to_string()]);
        assert_ne!(cm.color_for("RSA 2048"), Color32::GRAY);
        assert_eq!(cm.color_for("unknown"), Color32::GRAY);
    }

    #[test]
    fn heat_ramp_endpoints() {
        // Low values render light, high values dark.
        let lo = heat_color(0.0);
        let hi = heat_color(1.0);
        assert!(lo.r() > hi.r());
        assert!(lo.g() > hi.g());
    }
}
