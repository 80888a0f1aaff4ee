//! Line plot of counts over an ordered category axis

use egui::{Align2, Color32, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::chart::{CategoryCount, ChartSpec};

pub fn show(ui: &mut Ui, id: &str, spec: &ChartSpec, points: &[CategoryCount]) {
    let color = super::colors::categorical_color(0);
    let labels: Vec<String> = points.iter().map(|p| p.label.clone()).collect();
    let values: Vec<[f64; 2]> = points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.count as f64])
        .collect();

    let hover_labels = labels.clone();
    Plot::new(id)
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .include_y(0.0)
        .allow_scroll(false)
        .label_formatter(move |_, value| {
            let index = value.x.round();
            match hover_labels.get(index.max(0.0) as usize) {
                Some(label) if index >= 0.0 => format!("{}\n{:.0} trips", label, value.y),
                _ => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(values.clone()))
                    .color(color)
                    .width(2.0)
                    .name(&spec.y_label),
            );
            plot_ui.points(Points::new(values).color(color).radius(3.0));

            for (i, label) in labels.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, 0.0), label.as_str())
                        .anchor(Align2::CENTER_TOP)
                        .color(Color32::GRAY),
                );
            }
        });
}
