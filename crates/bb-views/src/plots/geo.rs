//! In-app preview of the trip map

use egui::{Align2, Color32, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Points, Text};

use super::colors::named_color;
use crate::map::{EndStationMarker, MapStyle, TripMap};

/// Draws a [`TripMap`] on a lon/lat plot with the colors of a [`MapStyle`]
#[derive(Debug, Clone)]
pub struct MapPreview {
    start_color: Color32,
    end_color: Color32,
    path_color: Color32,
    path_width: f32,
}

impl MapPreview {
    pub fn new(style: &MapStyle) -> Self {
        Self {
            start_color: named_color(&style.start_color, Color32::from_rgb(56, 126, 184)),
            end_color: named_color(&style.end_color, Color32::from_rgb(214, 62, 42)),
            path_color: named_color(&style.path_color, Color32::from_rgb(56, 126, 184))
                .linear_multiply(0.35),
            path_width: style.path_weight.max(0.5) / 2.0,
        }
    }

    pub fn show(&self, ui: &mut Ui, map: &TripMap) {
        if map.is_empty() {
            super::no_data(ui, "No trips from this station in the selected dates");
            return;
        }

        Plot::new("trip_map_preview")
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid(false)
            .allow_scroll(false)
            .label_formatter(|_, _| String::new())
            .show(ui, |plot_ui| {
                // Repeated routes stack onto the same segment, darkening busy routes
                for path in &map.paths {
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![
                            [path.from.lon, path.from.lat],
                            [path.to.lon, path.to.lat],
                        ]))
                        .color(self.path_color)
                        .width(self.path_width),
                    );
                }

                let ends: Vec<[f64; 2]> = map.end_stations.iter().map(|e| [e.point.lon, e.point.lat]).collect();
                plot_ui.points(Points::new(ends).color(self.end_color).radius(4.0));

                if let Some(start) = &map.start {
                    plot_ui.points(
                        Points::new(vec![[start.point.lon, start.point.lat]])
                            .color(self.start_color)
                            .radius(7.0),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(start.point.lon, start.point.lat), start.name.as_str())
                            .anchor(Align2::LEFT_BOTTOM)
                            .color(self.start_color),
                    );
                }

                if let Some(pointer) = plot_ui.pointer_coordinate() {
                    let scale = plot_ui.plot_bounds().width() / 40.0;
                    if let Some(end) = nearest_station(&map.end_stations, pointer.x, pointer.y, scale) {
                        plot_ui.text(
                            Text::new(
                                PlotPoint::new(end.point.lon, end.point.lat),
                                format!("{}\n{} rides", end.name, end.trips),
                            )
                            .anchor(Align2::LEFT_TOP)
                            .color(self.end_color),
                        );
                    }
                }
            });
    }
}

/// Closest end station to a plot position, if within `max_distance`
fn nearest_station(stations: &[EndStationMarker], lon: f64, lat: f64, max_distance: f64) -> Option<&EndStationMarker> {
    stations
        .iter()
        .map(|s| (s, (s.point.lon - lon).hypot(s.point.lat - lat)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}
