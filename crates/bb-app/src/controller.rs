//! Routes control events to the outputs they affect
//!
//! Every handler is a pure function of the shared trip table and its
//! arguments. The session's [`Selection`] is owned by the caller and passed
//! in, so a window and a headless export drive the same code.

use std::sync::Arc;

use bb_core::{ControlEvent, DateBounds, OutputKind, Selection, VisualizationKind};
use bb_data::TripTable;
use bb_views::{build_chart, explanation, ChartSpec, MapStyle, TripMap};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// The rendered map plus the structure behind it
#[derive(Debug, Clone, Default)]
pub struct MapOutput {
    pub map: TripMap,
    pub html: String,
    /// Trips in the filtered subset
    pub trips: usize,
}

/// A freshly computed value for one output
#[derive(Debug, Clone)]
pub enum OutputUpdate {
    Text(String),
    Chart(ChartSpec),
    DateBounds(Option<DateBounds>),
    Map(MapOutput),
}

impl OutputUpdate {
    pub fn kind(&self) -> OutputKind {
        match self {
            OutputUpdate::Text(_) => OutputKind::Text,
            OutputUpdate::Chart(_) => OutputKind::Chart,
            OutputUpdate::DateBounds(_) => OutputKind::DateBounds,
            OutputUpdate::Map(_) => OutputKind::Map,
        }
    }
}

pub struct Controller {
    table: Arc<TripTable>,
    map_style: MapStyle,
}

impl Controller {
    pub fn new(table: Arc<TripTable>, map_style: MapStyle) -> Self {
        Self { table, map_style }
    }

    pub fn table(&self) -> &TripTable {
        &self.table
    }

    pub fn map_style(&self) -> &MapStyle {
        &self.map_style
    }

    pub fn visualization_text(&self, kind: VisualizationKind) -> String {
        explanation(kind).to_string()
    }

    pub fn visualization_chart(&self, kind: VisualizationKind) -> ChartSpec {
        build_chart(&self.table, kind)
    }

    /// First and last start date of trips leaving `station`
    pub fn date_bounds(&self, station: &str) -> Option<DateBounds> {
        let bounds = self.table.station_date_bounds(station);
        if bounds.is_none() {
            debug!("No trips start at '{}'", station);
        }
        bounds
    }

    /// Map of trips leaving `station` between `start` and `end`, inclusive
    ///
    /// Unset dates default to the span of the whole table. Anything that
    /// leaves no trips (no station, unknown station, end before start)
    /// renders the placeholder map.
    pub fn map_markup(&self, station: Option<&str>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> MapOutput {
        let (map, trips) = match (station, self.table.date_span()) {
            (Some(station), Some(span)) => {
                let selection = Selection {
                    start_date: start,
                    end_date: end,
                    ..Selection::default()
                };
                let range = selection.resolve_range(span);
                match self.table.filter_station_dates(station, range) {
                    Ok(subset) => (TripMap::build(&subset), subset.len()),
                    Err(e) => {
                        warn!("Failed to filter trips for '{}': {}", station, e);
                        (TripMap::default(), 0)
                    }
                }
            }
            _ => (TripMap::default(), 0),
        };

        let html = map.render_html(&self.map_style).unwrap_or_else(|e| {
            warn!("Failed to render map: {}", e);
            String::new()
        });

        MapOutput { map, html, trips }
    }

    /// Apply `event` to the selection and recompute exactly the outputs it affects
    pub fn apply(&self, selection: &mut Selection, event: ControlEvent) -> Vec<OutputUpdate> {
        debug!("Control event: {:?}", event);
        event.apply_to(selection);
        event
            .affected_outputs()
            .iter()
            .map(|kind| self.output(*kind, selection))
            .collect()
    }

    /// Every output for the first frame
    pub fn initial_outputs(&self, selection: &Selection) -> Vec<OutputUpdate> {
        [OutputKind::Text, OutputKind::Chart, OutputKind::DateBounds, OutputKind::Map]
            .into_iter()
            .map(|kind| self.output(kind, selection))
            .collect()
    }

    fn output(&self, kind: OutputKind, selection: &Selection) -> OutputUpdate {
        match kind {
            OutputKind::Text => OutputUpdate::Text(self.visualization_text(selection.kind)),
            OutputKind::Chart => OutputUpdate::Chart(self.visualization_chart(selection.kind)),
            OutputKind::DateBounds => {
                OutputUpdate::DateBounds(selection.station.as_deref().and_then(|s| self.date_bounds(s)))
            }
            OutputKind::Map => OutputUpdate::Map(self.map_markup(
                selection.station.as_deref(),
                selection.start_date,
                selection.end_date,
            )),
        }
    }
}
