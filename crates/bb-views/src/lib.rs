//! Derived views over the trip table
//!
//! Everything here is a pure function of a [`bb_data::TripTable`]: chart
//! specifications for the six visualization kinds, the explanatory text for
//! each kind, and the trip map for a filtered subset. The `plots` module
//! paints those results with egui.

pub mod aggregate;
pub mod blurb;
pub mod chart;
pub mod map;
pub mod plots;

#[cfg(test)]
mod test_support;

pub use aggregate::build_chart;
pub use blurb::{explanation, explanation_for_id};
pub use chart::{BarSeries, CategoryCount, ChartData, ChartSpec, HeatmapCell, HistogramBin, PieSlice};
pub use map::{EndStationMarker, MapStyle, PathSegment, StationMarker, TripMap};
pub use plots::{show_chart, MapPreview};
