use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::Diagnosis;

/// Trend line colour.
pub const TREND_COLOR: Color32 = Color32::from_rgb(0xe7, 0x6f, 0x51);

/// Bar chart fill.
pub const BAR_COLOR: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);

/// Heatmap cell with no defined coefficient.
pub const UNDEFINED_COLOR: Color32 = Color32::from_gray(140);

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // offset so two-colour palettes land on teal / coral
            let hue = 160.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

/// Scatter colour for a diagnostic result.
pub fn result_color(result: Diagnosis) -> Color32 {
    let palette = generate_palette(2);
    palette[result.code() as usize]
}

// ---------------------------------------------------------------------------
// Diverging correlation scale
// ---------------------------------------------------------------------------

fn srgb8(r: u8, g: u8, b: u8) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Red (−1) → near-white (0) → blue (+1), interpolated in linear RGB.
///
/// `None` (undefined coefficient) maps to a neutral grey.
pub fn correlation_color(value: Option<f64>) -> Color32 {
    let Some(v) = value else {
        return UNDEFINED_COLOR;
    };
    let v = v.clamp(-1.0, 1.0) as f32;
    let red = srgb8(178, 24, 43);
    let mid = srgb8(247, 247, 247);
    let blue = srgb8(33, 102, 172);

    let mixed = if v < 0.0 { mid.mix(red, -v) } else { mid.mix(blue, v) };
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
