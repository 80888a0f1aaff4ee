//! Visualization kinds and the per-session selection state

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six chart kinds the dashboard can show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationKind {
    #[default]
    MonthlyTrend,
    TripDuration,
    CustomerSubscriber,
    HourlyWeeklyHeatmap,
    TopStations,
    PostalCode,
}

impl VisualizationKind {
    /// All kinds in dropdown order
    pub const ALL: [VisualizationKind; 6] = [
        VisualizationKind::MonthlyTrend,
        VisualizationKind::TripDuration,
        VisualizationKind::CustomerSubscriber,
        VisualizationKind::HourlyWeeklyHeatmap,
        VisualizationKind::TopStations,
        VisualizationKind::PostalCode,
    ];

    /// Stable identifier used in config files and export names
    pub fn id(&self) -> &'static str {
        match self {
            VisualizationKind::MonthlyTrend => "monthly-trend",
            VisualizationKind::TripDuration => "trip-duration",
            VisualizationKind::CustomerSubscriber => "customer-subscriber",
            VisualizationKind::HourlyWeeklyHeatmap => "hourly-weekly-heatmap",
            VisualizationKind::TopStations => "top-stations",
            VisualizationKind::PostalCode => "postal-code",
        }
    }

    /// Human readable dropdown label
    pub fn label(&self) -> &'static str {
        match self {
            VisualizationKind::MonthlyTrend => "Monthly Trend Analysis",
            VisualizationKind::TripDuration => "Trip Duration Analysis",
            VisualizationKind::CustomerSubscriber => "Customer vs. Subscriber Analysis",
            VisualizationKind::HourlyWeeklyHeatmap => "Heatmap of Trips per Hour and Day of the Week",
            VisualizationKind::TopStations => "Top Start and End Stations",
            VisualizationKind::PostalCode => "Postal Code Analysis",
        }
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string names no known visualization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown visualization kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for VisualizationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualizationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// Inclusive date range used to filter trips by start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` lies within the range; always false for an inverted range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

/// Earliest and latest selectable dates, e.g. for one station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        Self { min, max }
    }

    /// Clamp a date into the bounds
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.min, self.max)
    }

    pub fn as_range(&self) -> DateRange {
        DateRange::new(self.min, self.max)
    }
}

/// Control state for one dashboard session
///
/// Each window or export run owns its own selection; the controller only ever
/// receives it by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub kind: VisualizationKind,
    pub station: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Selection {
    pub fn new(station: Option<String>) -> Self {
        Self {
            station,
            ..Default::default()
        }
    }

    /// Resolve the date range, falling back to `span` for unset ends
    pub fn resolve_range(&self, span: DateBounds) -> DateRange {
        DateRange::new(
            self.start_date.unwrap_or(span.min),
            self.end_date.unwrap_or(span.max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_kind_ids_round_trip_through_from_str() {
        for kind in VisualizationKind::ALL {
            assert_eq!(kind.id().parse::<VisualizationKind>(), Ok(kind));
        }
        assert!("pie-of-everything".parse::<VisualizationKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_as_id() {
        let json = serde_json::to_string(&VisualizationKind::HourlyWeeklyHeatmap).unwrap();
        assert_eq!(json, "\"hourly-weekly-heatmap\"");
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let range = DateRange::new(date(2020, 5, 1), date(2020, 4, 1));
        assert!(range.is_inverted());
        assert!(!range.contains(date(2020, 4, 15)));
        assert!(!range.contains(date(2020, 5, 1)));
    }

    #[test]
    fn test_resolve_range_fills_unset_ends() {
        let span = DateBounds::new(date(2020, 1, 1), date(2020, 12, 31));
        let mut selection = Selection::new(Some("A".to_string()));
        assert_eq!(selection.resolve_range(span), span.as_range());

        selection.start_date = Some(date(2020, 3, 1));
        let range = selection.resolve_range(span);
        assert_eq!(range.start, date(2020, 3, 1));
        assert_eq!(range.end, date(2020, 12, 31));
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = DateBounds::new(date(2020, 3, 1), date(2020, 5, 31));
        assert_eq!(bounds.clamp(date(2020, 1, 1)), date(2020, 3, 1));
        assert_eq!(bounds.clamp(date(2020, 4, 2)), date(2020, 4, 2));
        assert_eq!(bounds.clamp(date(2021, 1, 1)), date(2020, 5, 31));
    }
}
