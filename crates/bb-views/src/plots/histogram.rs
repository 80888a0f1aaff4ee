//! Histogram of trip durations

use egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::chart::{ChartSpec, HistogramBin};

pub fn show(ui: &mut Ui, id: &str, spec: &ChartSpec, bins: &[HistogramBin]) {
    let color = super::colors::categorical_color(0);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                .width(bin.end - bin.start)
                .name(format!("{:.0}-{:.0} s", bin.start, bin.end))
                .fill(color.linear_multiply(0.7))
        })
        .collect();

    Plot::new(id)
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).name(&spec.y_label));
        });
}
