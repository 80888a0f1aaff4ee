//! Control strip: visualization, start station and date range
//!
//! Widgets never mutate the selection themselves. Each returns the
//! [`ControlEvent`]s for what the user changed this frame and the app routes
//! them through its controller.

use bb_core::{ControlEvent, DateBounds, Selection, VisualizationKind};
use chrono::NaiveDate;
use egui::{ComboBox, RichText, Ui};
use egui_extras::DatePickerButton;
use tracing::debug;

use crate::widget_utils::{widget_id, WidgetId};

/// Most stations listed in the dropdown at once
const STATION_LIST_LIMIT: usize = 200;

/// Search text typed into the station dropdown
#[derive(Debug, Default, Clone)]
pub struct StationFilter {
    pub query: String,
}

impl StationFilter {
    /// Stations containing the query, case-insensitive, at most `limit`
    pub fn apply<'a>(&self, stations: &'a [String], limit: usize) -> (Vec<&'a str>, usize) {
        let query = self.query.trim().to_lowercase();
        let matching: Vec<&str> = stations
            .iter()
            .map(String::as_str)
            .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
            .collect();
        let total = matching.len();
        (matching.into_iter().take(limit).collect(), total)
    }
}

#[derive(Debug, Default)]
pub struct ControlPanel {
    pub station_filter: StationFilter,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dropdown of the six visualization kinds
    pub fn visualization_picker(&mut self, ui: &mut Ui, selection: &Selection) -> Option<ControlEvent> {
        let mut kind = selection.kind;
        ComboBox::from_id_source(widget_id("controls", "visualization"))
            .selected_text(kind.label())
            .width(320.0)
            .show_ui(ui, |ui| {
                for option in VisualizationKind::ALL {
                    ui.selectable_value(&mut kind, option, option.label());
                }
            });

        (kind != selection.kind).then(|| {
            debug!("Visualization changed to {}", kind);
            ControlEvent::VisualizationChanged(kind)
        })
    }

    /// Searchable dropdown of start stations
    pub fn station_picker(&mut self, ui: &mut Ui, stations: &[String], selection: &Selection) -> Option<ControlEvent> {
        let current = selection.station.as_deref();
        let mut picked: Option<String> = None;

        ComboBox::from_id_source(WidgetId::new("controls").with("station").build())
            .selected_text(current.unwrap_or("Select a start station"))
            .width(320.0)
            .show_ui(ui, |ui| {
                ui.text_edit_singleline(&mut self.station_filter.query)
                    .on_hover_text("Filter stations by name");
                ui.separator();

                let (shown, total) = self.station_filter.apply(stations, STATION_LIST_LIMIT);
                for name in &shown {
                    if ui.selectable_label(current == Some(*name), *name).clicked() {
                        picked = Some(name.to_string());
                    }
                }
                if total > shown.len() {
                    ui.label(RichText::new(format!("{} more, refine the search", total - shown.len())).weak());
                }
                if total == 0 {
                    ui.label(RichText::new("No matching stations").weak());
                }
            });

        match picked {
            Some(name) if current != Some(name.as_str()) => {
                debug!("Start station changed to '{}'", name);
                Some(ControlEvent::StationChanged(name))
            }
            _ => None,
        }
    }

    /// Start and end date pickers limited to `bounds`
    ///
    /// With no bounds (no station chosen, or a station without trips) the
    /// pickers are disabled.
    pub fn date_pickers(&mut self, ui: &mut Ui, bounds: Option<DateBounds>, selection: &Selection) -> Vec<ControlEvent> {
        let mut events = Vec::new();

        let Some(bounds) = bounds else {
            ui.add_enabled_ui(false, |ui| {
                ui.label("Start date: -");
                ui.label("End date: -");
            });
            return events;
        };

        let mut start = selection.start_date.unwrap_or(bounds.min);
        let mut end = selection.end_date.unwrap_or(bounds.max);

        ui.label("Start date:");
        ui.add(DatePickerButton::new(&mut start).id_source("controls_start_date"));
        ui.label("End date:");
        ui.add(DatePickerButton::new(&mut end).id_source("controls_end_date"));

        if let Some(date) = picked_date(bounds, selection.start_date.unwrap_or(bounds.min), start) {
            events.push(ControlEvent::StartDateChanged(Some(date)));
        }
        if let Some(date) = picked_date(bounds, selection.end_date.unwrap_or(bounds.max), end) {
            events.push(ControlEvent::EndDateChanged(Some(date)));
        }

        if (selection.start_date.is_some() || selection.end_date.is_some())
            && ui.small_button("Full range").on_hover_text("Show every date for this station").clicked()
        {
            events.push(ControlEvent::StartDateChanged(None));
            events.push(ControlEvent::EndDateChanged(None));
        }

        events
    }
}

/// The clamped date when the picker moved away from `previous`
fn picked_date(bounds: DateBounds, previous: NaiveDate, picked: NaiveDate) -> Option<NaiveDate> {
    (picked != previous).then(|| bounds.clamp(picked))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_station_filter() {
        let stations = vec![
            "Central Square at Mass Ave / Essex St".to_string(),
            "Charles Circle - Charles St at Cambridge St".to_string(),
            "MIT at Mass Ave / Amherst St".to_string(),
        ];

        let filter = StationFilter { query: "mass ave".to_string() };
        let (shown, total) = filter.apply(&stations, 10);
        assert_eq!(total, 2);
        assert_eq!(shown, vec!["Central Square at Mass Ave / Essex St", "MIT at Mass Ave / Amherst St"]);

        let (shown, total) = StationFilter::default().apply(&stations, 1);
        assert_eq!(total, 3);
        assert_eq!(shown.len(), 1);
    }

    #[test]
    fn test_picked_date_is_clamped() {
        let bounds = DateBounds::new(date(2020, 1, 1), date(2020, 1, 31));
        assert_eq!(picked_date(bounds, date(2020, 1, 1), date(2020, 1, 1)), None);
        assert_eq!(picked_date(bounds, date(2020, 1, 1), date(2020, 1, 10)), Some(date(2020, 1, 10)));
        assert_eq!(picked_date(bounds, date(2020, 1, 1), date(2020, 3, 1)), Some(date(2020, 1, 31)));
        assert_eq!(picked_date(bounds, date(2020, 1, 31), date(2019, 12, 1)), Some(date(2020, 1, 1)));
    }
}
