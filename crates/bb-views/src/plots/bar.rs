//! Bar charts over a category axis, single and grouped

use egui::{Align2, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

use super::colors::categorical_color;
use super::short_label;
use crate::chart::{BarSeries, CategoryCount, ChartSpec};

const LABEL_CHARS: usize = 18;

pub fn show(ui: &mut Ui, id: &str, spec: &ChartSpec, bars: &[CategoryCount]) {
    let color = categorical_color(0);
    let chart = BarChart::new(
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                Bar::new(i as f64, bar.count as f64)
                    .width(0.7)
                    .name(&bar.label)
                    .fill(color)
            })
            .collect(),
    )
    .color(color);

    let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
    Plot::new(id)
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            for (i, label) in labels.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, 0.0), short_label(label, LABEL_CHARS))
                        .anchor(Align2::CENTER_TOP)
                        .color(Color32::GRAY),
                );
            }
        });
}

/// One bar per series side by side within each category slot
pub fn show_grouped(
    ui: &mut Ui,
    id: &str,
    spec: &ChartSpec,
    categories: &[String],
    series: &[BarSeries],
) {
    let count = series.len();
    let width = group_width(count);

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(s, group)| {
            let color = categorical_color(s);
            let bars = group
                .bars
                .iter()
                .filter_map(|bar| {
                    let slot = categories.iter().position(|c| *c == bar.label)?;
                    Some(
                        Bar::new(slot as f64 + offset(s, count, width), bar.count as f64)
                            .width(width)
                            .name(&bar.label)
                            .fill(color),
                    )
                })
                .collect();
            BarChart::new(bars).color(color).name(&group.name)
        })
        .collect();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            for (i, label) in categories.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, 0.0), short_label(label, LABEL_CHARS))
                        .anchor(Align2::CENTER_TOP)
                        .color(Color32::GRAY),
                );
            }
        });
}

/// Width of each bar when `count` series share a slot
fn group_width(count: usize) -> f64 {
    0.8 / count.max(1) as f64
}

/// Offset of series `index` from its slot center
fn offset(index: usize, count: usize, width: f64) -> f64 {
    (index as f64 - (count.max(1) as f64 - 1.0) / 2.0) * width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_offsets_are_centered() {
        let width = group_width(2);
        assert!((width - 0.4).abs() < 1e-12);
        assert!((offset(0, 2, width) + 0.2).abs() < 1e-12);
        assert!((offset(1, 2, width) - 0.2).abs() < 1e-12);
        assert_eq!(offset(0, 1, group_width(1)), 0.0);
    }
}
