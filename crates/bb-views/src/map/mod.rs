//! Trip map for one start station and date range

mod html;

pub use html::MapStyle;

use bb_data::table::GeoPoint;
use bb_data::TripTable;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// The selected start station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub name: String,
    pub point: GeoPoint,
}

/// A distinct destination with the number of trips ending there
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndStationMarker {
    pub name: String,
    pub point: GeoPoint,
    pub trips: usize,
}

/// Straight line from a trip's start to its end
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathSegment {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

/// Markers and paths for a filtered trip subset
///
/// An empty subset builds an empty map: no start marker, no destinations,
/// no paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripMap {
    pub start: Option<StationMarker>,
    pub end_stations: Vec<EndStationMarker>,
    pub paths: Vec<PathSegment>,
}

impl TripMap {
    /// Build the map from trips that all leave the same station
    pub fn build(subset: &TripTable) -> Self {
        let start = subset.trips().next().and_then(|first| {
            let point = first
                .start_point
                .or_else(|| subset.trips().find_map(|trip| trip.start_point))?;
            Some(StationMarker {
                name: first.start_station.to_string(),
                point,
            })
        });

        // Destinations in first-seen order
        let mut destinations: IndexMap<&str, (Option<GeoPoint>, usize)> = IndexMap::new();
        for trip in subset.trips() {
            let entry = destinations.entry(trip.end_station).or_insert((None, 0));
            entry.0 = entry.0.or(trip.end_point);
            entry.1 += 1;
        }

        let end_stations = destinations
            .into_iter()
            .filter_map(|(name, (point, trips))| match point {
                Some(point) => Some(EndStationMarker {
                    name: name.to_string(),
                    point,
                    trips,
                }),
                None => {
                    debug!("No coordinates for end station '{}', skipping marker", name);
                    None
                }
            })
            .collect();

        // One path per trip, repeated routes included
        let paths: Vec<PathSegment> = subset
            .trips()
            .filter_map(|trip| {
                Some(PathSegment {
                    from: trip.start_point?,
                    to: trip.end_point?,
                })
            })
            .collect();

        if paths.len() < subset.len() {
            debug!("{} trips without coordinates drawn without a path", subset.len() - paths.len());
        }

        Self {
            start,
            end_stations,
            paths,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end_stations.is_empty() && self.paths.is_empty()
    }

    /// Initial map view: the start station
    pub fn center(&self) -> Option<GeoPoint> {
        self.start.as_ref().map(|s| s.point)
    }

    /// South-west and north-east corners covering every marker and path
    pub fn bounds(&self) -> Option<(GeoPoint, GeoPoint)> {
        let points = self
            .start
            .iter()
            .map(|s| s.point)
            .chain(self.end_stations.iter().map(|e| e.point))
            .chain(self.paths.iter().flat_map(|p| [p.from, p.to]));

        points.fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((sw, ne)) => Some((
                GeoPoint::new(sw.lat.min(p.lat), sw.lon.min(p.lon)),
                GeoPoint::new(ne.lat.max(p.lat), ne.lon.max(p.lon)),
            )),
        })
    }

    /// Render as a standalone HTML document
    pub fn render_html(&self, style: &MapStyle) -> Result<String, serde_json::Error> {
        html::render(self, style)
    }
}
