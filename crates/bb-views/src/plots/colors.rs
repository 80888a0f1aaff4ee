//! Color utilities for plots

use egui::Color32;

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Color32 {
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(100, 150, 250), // Blue
        Color32::from_rgb(250, 150, 100), // Orange
        Color32::from_rgb(150, 250, 100), // Green
        Color32::from_rgb(250, 100, 150), // Pink
        Color32::from_rgb(150, 100, 250), // Purple
        Color32::from_rgb(250, 250, 100), // Yellow
        Color32::from_rgb(100, 250, 250), // Cyan
        Color32::from_rgb(250, 100, 100), // Red
    ];
    PALETTE[index % PALETTE.len()]
}

/// Viridis color map
pub fn viridis_color(t: f32) -> Color32 {
    const STOPS: [(f32, f32, f32); 5] = [
        (68.0, 1.0, 84.0),
        (53.0, 91.0, 125.0),
        (42.0, 117.0, 142.0),
        (86.0, 163.0, 92.0),
        (253.0, 231.0, 36.0),
    ];

    let t = t.clamp(0.0, 1.0) * 4.0;
    let i = (t.floor() as usize).min(3);
    let s = t - i as f32;
    let (a, b) = (STOPS[i], STOPS[i + 1]);
    Color32::from_rgb(
        (a.0 * (1.0 - s) + b.0 * s) as u8,
        (a.1 * (1.0 - s) + b.1 * s) as u8,
        (a.2 * (1.0 - s) + b.2 * s) as u8,
    )
}

/// Map a CSS color name or `#rrggbb` to a color, falling back to `default`
pub fn named_color(name: &str, default: Color32) -> Color32 {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                return Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
            }
        }
        return default;
    }

    match name.to_ascii_lowercase().as_str() {
        "blue" => Color32::from_rgb(56, 126, 184),
        "red" => Color32::from_rgb(214, 62, 42),
        "green" => Color32::from_rgb(114, 176, 38),
        "orange" => Color32::from_rgb(246, 151, 48),
        "purple" => Color32::from_rgb(210, 82, 185),
        "gray" | "grey" => Color32::from_gray(128),
        "black" => Color32::BLACK,
        "white" => Color32::WHITE,
        _ => default,
    }
}
