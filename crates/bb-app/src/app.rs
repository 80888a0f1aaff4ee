//! eframe application shell

use std::path::PathBuf;
use std::sync::Arc;

use bb_core::{ControlEvent, DateBounds, Selection, TripSource, VisualizationKind};
use bb_data::{CsvTripSource, TripFileConfig, TripTable};
use bb_ui::{apply_theme, theme, ControlPanel, Theme};
use bb_views::plots::colors::named_color;
use bb_views::{show_chart, ChartSpec, MapPreview, MapStyle};
use eframe::egui::{self, Context, RichText, Ui};
use parking_lot::RwLock;
use tracing::{error, info};

use crate::controller::{Controller, MapOutput, OutputUpdate};

/// Latest value of every output
#[derive(Default)]
struct Outputs {
    text: String,
    chart: Option<ChartSpec>,
    bounds: Option<DateBounds>,
    map: MapOutput,
}

impl Outputs {
    fn store(&mut self, updates: Vec<OutputUpdate>) {
        for update in updates {
            match update {
                OutputUpdate::Text(text) => self.text = text,
                OutputUpdate::Chart(chart) => self.chart = Some(chart),
                OutputUpdate::DateBounds(bounds) => self.bounds = bounds,
                OutputUpdate::Map(map) => self.map = map,
            }
        }
    }
}

/// One loaded dataset with its selection and outputs
pub struct Session {
    controller: Controller,
    source_name: String,
    stations: Vec<String>,
    selection: Selection,
    outputs: Outputs,
}

impl Session {
    /// `station` picks the initial start station; the first sorted one otherwise
    pub fn new(controller: Controller, source_name: String, selection: Selection) -> Self {
        let stations = controller.table().start_station_names();
        let mut selection = selection;
        if selection.station.is_none() {
            selection.station = stations.first().cloned();
        }

        let mut outputs = Outputs::default();
        outputs.store(controller.initial_outputs(&selection));

        Self {
            controller,
            source_name,
            stations,
            selection,
            outputs,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn handle(&mut self, events: Vec<ControlEvent>) {
        for event in events {
            let updates = self.controller.apply(&mut self.selection, event);
            self.outputs.store(updates);
        }
    }
}

#[derive(Clone)]
enum LoadState {
    Idle,
    Loading(String),
    Failed(String),
}

pub struct DashboardApp {
    title: String,
    session: Arc<RwLock<Option<Session>>>,
    load_state: Arc<RwLock<LoadState>>,
    controls: ControlPanel,
    preview: MapPreview,
    file_config: TripFileConfig,
    map_style: MapStyle,
    theme: Theme,
    status: Option<String>,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    /// Egui context
    egui_ctx: egui::Context,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        title: String,
        file_config: TripFileConfig,
        map_style: MapStyle,
        theme: Theme,
        session: Option<Session>,
    ) -> Self {
        apply_theme(&cc.egui_ctx, &theme);

        Self {
            title,
            session: Arc::new(RwLock::new(session)),
            load_state: Arc::new(RwLock::new(LoadState::Idle)),
            controls: ControlPanel::new(),
            preview: MapPreview::new(&map_style),
            file_config,
            map_style,
            theme,
            status: None,
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
        }
    }

    /// Load a CSV file in the background and swap it in when ready
    fn open_csv_file(&mut self, path: PathBuf) {
        info!("Opening CSV file: {:?}", path);

        let mut config = self.file_config.clone();
        config.path = path;
        let source = CsvTripSource::new(config);

        let ctx = self.egui_ctx.clone();
        let session = self.session.clone();
        let load_state = self.load_state.clone();
        let map_style = self.map_style.clone();
        let kind = self
            .session
            .read()
            .as_ref()
            .map(|s| s.selection.kind)
            .unwrap_or_default();

        *load_state.write() = LoadState::Loading(source.source_name().to_string());
        self.runtime.spawn(async move {
            match TripTable::load(&source).await {
                Ok(table) => {
                    let controller = Controller::new(Arc::new(table), map_style);
                    let selection = Selection {
                        kind,
                        ..Selection::default()
                    };
                    *session.write() = Some(Session::new(controller, source.source_name().to_string(), selection));
                    *load_state.write() = LoadState::Idle;
                }
                Err(e) => {
                    error!("Failed to open CSV file: {:#}", e);
                    *load_state.write() = LoadState::Failed(format!("{:#}", e));
                }
            }
            ctx.request_repaint();
        });
    }

    fn save_map_html(&mut self, html: String) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("HTML", &["html"])
            .set_file_name("map.html")
            .save_file()
        else {
            return;
        };

        self.status = Some(match std::fs::write(&path, html) {
            Ok(()) => {
                info!("Saved map to {}", path.display());
                format!("Saved map to {}", path.display())
            }
            Err(e) => {
                error!("Failed to save map to {}: {}", path.display(), e);
                format!("Failed to save map: {}", e)
            }
        });
    }

    fn handle_menu(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV Files", &["csv"])
                            .pick_file()
                        {
                            self.open_csv_file(path);
                        }
                        ui.close_menu();
                    }

                    let html = self.session.read().as_ref().map(|s| s.outputs.map.html.clone());
                    if ui.add_enabled(html.is_some(), egui::Button::new("Save map HTML...")).clicked() {
                        if let Some(html) = html {
                            self.save_map_html(html);
                        }
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.theme.dark_mode, "Dark mode").changed() {
                        apply_theme(ui.ctx(), &self.theme);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &*self.load_state.read() {
                        LoadState::Loading(name) => {
                            ui.spinner();
                            ui.label(format!("Loading {}", name));
                        }
                        LoadState::Failed(message) => {
                            ui.label(RichText::new(message).color(theme::error_color()));
                        }
                        LoadState::Idle => {
                            if let Some(status) = &self.status {
                                ui.label(RichText::new(status).weak());
                            }
                        }
                    }
                });
            });
        });
    }

    fn show_welcome_screen(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading(&self.title);
            ui.add_space(12.0);
            ui.label("Open a trip CSV file to explore rides by month, duration, rider type, hour and station.");
            ui.add_space(12.0);
            if ui.button("Open CSV...").clicked() {
                if let Some(path) = rfd::FileDialog::new().add_filter("CSV Files", &["csv"]).pick_file() {
                    self.open_csv_file(path);
                }
            }
        });
    }

    fn show_dashboard(&mut self, ui: &mut Ui, session: &mut Session) {
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new(&self.title).strong());
            ui.label(RichText::new(format!("{} trips from {}", session.controller.table().len(), session.source_name)).weak());
        });
        ui.separator();

        let mut events = Vec::new();
        let mut save_map = false;

        ui.columns(2, |columns| {
            let left = &mut columns[0];
            left.horizontal(|ui| {
                ui.label("Visualization:");
                events.extend(self.controls.visualization_picker(ui, &session.selection));
            });
            left.add_space(8.0);
            if let Some(chart) = &session.outputs.chart {
                let width = left.available_width();
                left.allocate_ui(egui::vec2(width, 440.0), |ui| show_chart(ui, chart));
            }
            left.add_space(8.0);
            left.label(&session.outputs.text);

            let right = &mut columns[1];
            right.horizontal(|ui| {
                ui.label("Start station:");
                events.extend(self.controls.station_picker(ui, &session.stations, &session.selection));
            });
            right.horizontal(|ui| {
                events.extend(self.controls.date_pickers(ui, session.outputs.bounds, &session.selection));
            });
            right.add_space(8.0);

            let width = right.available_width();
            right.allocate_ui(egui::vec2(width, 440.0), |ui| self.preview.show(ui, &session.outputs.map.map));

            right.horizontal(|ui| {
                for entry in legend(&self.map_style) {
                    legend_entry(ui, &entry);
                }
                ui.label(format!("{} trips", session.outputs.map.trips));
                save_map = ui.button("Save map HTML...").clicked();
            });
        });

        if save_map {
            self.save_map_html(session.outputs.map.html.clone());
        }

        if !events.is_empty() {
            session.handle(events);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Swatch {
    Dot,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
struct LegendEntry {
    swatch: Swatch,
    color: egui::Color32,
    label: &'static str,
}

/// Legend for the map preview, in the map style's colors
fn legend(style: &MapStyle) -> [LegendEntry; 3] {
    [
        LegendEntry {
            swatch: Swatch::Dot,
            color: named_color(&style.start_color, theme::accent_color()),
            label: "Start station",
        },
        LegendEntry {
            swatch: Swatch::Dot,
            color: named_color(&style.end_color, theme::error_color()),
            label: "End stations",
        },
        LegendEntry {
            swatch: Swatch::Line,
            color: named_color(&style.path_color, theme::accent_color()),
            label: "Path",
        },
    ]
}

fn legend_entry(ui: &mut Ui, entry: &LegendEntry) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 12.0), egui::Sense::hover());
    match entry.swatch {
        Swatch::Dot => ui.painter().circle_filled(rect.center(), 5.0, entry.color),
        Swatch::Line => ui.painter().line_segment(
            [rect.left_center(), rect.right_center()],
            egui::Stroke::new(3.0, entry.color),
        ),
    };
    ui.label(entry.label);
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_menu(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.read().is_none() {
                self.show_welcome_screen(ui);
                return;
            }

            let session = self.session.clone();
            let mut guard = session.write();
            if let Some(session) = guard.as_mut() {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_dashboard(ui, session));
            }
        });
    }
}

/// Initial selection from the command line
pub fn initial_selection(
    station: Option<String>,
    from: Option<chrono::NaiveDate>,
    to: Option<chrono::NaiveDate>,
) -> Selection {
    Selection {
        kind: VisualizationKind::default(),
        station,
        start_date: from,
        end_date: to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoTripSource;
    use bb_data::TripBatchBuilder;

    fn session(station: Option<String>) -> Session {
        let builder: TripBatchBuilder = DemoTripSource::new(200, 5).generate().into_iter().collect();
        let table = TripTable::try_new(builder.finish().unwrap()).unwrap();
        let controller = Controller::new(Arc::new(table), MapStyle::default());
        Session::new(controller, "demo".to_string(), initial_selection(station, None, None))
    }

    #[test]
    fn test_session_defaults_to_first_station() {
        let session = session(None);
        assert_eq!(session.selection.station.as_ref(), session.stations.first());
        assert!(session.outputs.chart.is_some());
        assert!(session.outputs.bounds.is_some());
        assert!(!session.outputs.text.is_empty());
    }

    #[test]
    fn test_legend_covers_markers_and_path() {
        let style = MapStyle {
            path_color: "#00ff00".to_string(),
            ..MapStyle::default()
        };
        let entries = legend(&style);
        let labels: Vec<&str> = entries.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Start station", "End stations", "Path"]);
        assert_eq!(entries[2].swatch, Swatch::Line);
        assert_eq!(entries[2].color, egui::Color32::from_rgb(0, 255, 0));
        assert_eq!(entries[0].color, named_color("blue", theme::accent_color()));
        assert_eq!(entries[1].color, named_color("red", theme::error_color()));
    }

    #[test]
    fn test_events_update_outputs() {
        let mut session = session(None);
        let station = session.stations.last().cloned().unwrap();
        session.handle(vec![
            ControlEvent::VisualizationChanged(VisualizationKind::TopStations),
            ControlEvent::StationChanged(station.clone()),
        ]);
        assert_eq!(session.outputs.chart.as_ref().map(|c| c.kind), Some(VisualizationKind::TopStations));
        assert_eq!(session.outputs.bounds, session.controller.date_bounds(&station));
        assert_eq!(
            session.outputs.map.map.start.as_ref().map(|s| s.name.as_str()),
            Some(station.as_str())
        );
    }
}
