//! egui painters for chart specifications and the trip map

pub mod bar;
pub mod colors;
pub mod geo;
pub mod heatmap;
pub mod histogram;
pub mod line;
pub mod pie;

pub use geo::MapPreview;

use egui::Ui;

use crate::chart::{ChartData, ChartSpec};

/// Draw a chart specification with the painter for its chart type
pub fn show_chart(ui: &mut Ui, spec: &ChartSpec) {
    ui.heading(&spec.title);

    if spec.is_empty() {
        no_data(ui, "No trips match the current selection");
        return;
    }

    let id = spec.kind.id();
    match &spec.data {
        ChartData::Line { points } => line::show(ui, id, spec, points),
        ChartData::Histogram { bins } => histogram::show(ui, id, spec, bins),
        ChartData::Pie { slices } => pie::show(ui, slices),
        ChartData::Heatmap {
            x_labels,
            y_labels,
            cells,
        } => heatmap::show(ui, spec, x_labels, y_labels, cells),
        ChartData::GroupedBar { categories, series } => {
            bar::show_grouped(ui, id, spec, categories, series)
        }
        ChartData::Bar { bars } => bar::show(ui, id, spec, bars),
    }
}

pub(crate) fn no_data(ui: &mut Ui, hint: &str) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.label("No data to display");
            ui.label(egui::RichText::new(hint).weak());
        });
    });
}

/// Shorten long category names for axis labels
pub(crate) fn short_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("MIT", 10), "MIT");
        assert_eq!(short_label("Central Square at Mass Ave", 8), "Central…");
        assert_eq!(short_label("Central Square at Mass Ave", 8).chars().count(), 8);
    }
}
