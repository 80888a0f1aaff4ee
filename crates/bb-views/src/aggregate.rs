//! Aggregations behind the six visualization kinds
//!
//! Each function makes one pass over the table and returns a [`ChartSpec`].
//! Derived values (month, hour, weekday, duration bin) live only in the
//! function's local tables; the shared trip table is never modified.

use std::collections::BTreeMap;

use bb_core::VisualizationKind;
use bb_data::TripTable;
use chrono::{Datelike, Timelike};
use indexmap::IndexMap;
use tracing::debug;

use crate::chart::{BarSeries, CategoryCount, ChartData, ChartSpec, HeatmapCell, HistogramBin, PieSlice};

/// Inclusive duration window for the trip-duration histogram, in seconds
pub const DURATION_RANGE: (f64, f64) = (0.0, 2000.0);
pub const DURATION_BINS: usize = 50;
pub const TOP_N: usize = 10;
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const TRIPS_AXIS: &str = "Number of Trips";

type Counter<'a> = IndexMap<&'a str, u64, ahash::RandomState>;

/// Build the chart for `kind` over the whole table
pub fn build_chart(table: &TripTable, kind: VisualizationKind) -> ChartSpec {
    let spec = match kind {
        VisualizationKind::MonthlyTrend => monthly_trend(table),
        VisualizationKind::TripDuration => trip_duration(table),
        VisualizationKind::CustomerSubscriber => customer_subscriber(table),
        VisualizationKind::HourlyWeeklyHeatmap => hourly_weekly_heatmap(table),
        VisualizationKind::TopStations => top_stations(table),
        VisualizationKind::PostalCode => postal_codes(table),
    };
    debug!("Built {} chart with {} rows over {} trips", kind, spec.row_count(), table.len());
    spec
}

/// Trips per calendar month of start time, in chronological order
pub fn monthly_trend(table: &TripTable) -> ChartSpec {
    let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for trip in table.trips() {
        *months.entry((trip.start_time.year(), trip.start_time.month())).or_insert(0) += 1;
    }

    let points = months
        .into_iter()
        .map(|((year, month), count)| CategoryCount::new(format!("{:04}-{:02}", year, month), count))
        .collect();

    ChartSpec {
        kind: VisualizationKind::MonthlyTrend,
        title: VisualizationKind::MonthlyTrend.label().to_string(),
        x_label: "Month".to_string(),
        y_label: TRIPS_AXIS.to_string(),
        data: ChartData::Line { points },
    }
}

/// Histogram of durations within [`DURATION_RANGE`] over [`DURATION_BINS`] equal bins
pub fn trip_duration(table: &TripTable) -> ChartSpec {
    let (low, high) = DURATION_RANGE;
    let width = (high - low) / DURATION_BINS as f64;
    let mut counts = vec![0u64; DURATION_BINS];
    let mut in_range = 0usize;

    for duration in table.trips().filter_map(|trip| trip.duration) {
        if !(low..=high).contains(&duration) {
            continue;
        }
        // The upper edge belongs to the last bin
        let bin = (((duration - low) / width) as usize).min(DURATION_BINS - 1);
        counts[bin] += 1;
        in_range += 1;
    }

    let bins = if in_range == 0 {
        Vec::new()
    } else {
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: low + i as f64 * width,
                end: low + (i + 1) as f64 * width,
                count,
            })
            .collect()
    };

    ChartSpec {
        kind: VisualizationKind::TripDuration,
        title: VisualizationKind::TripDuration.label().to_string(),
        x_label: "Trip Duration (seconds)".to_string(),
        y_label: TRIPS_AXIS.to_string(),
        data: ChartData::Histogram { bins },
    }
}

/// Share of trips per user type, largest first
pub fn customer_subscriber(table: &TripTable) -> ChartSpec {
    let counts = ranked_counts(table.trips().filter_map(|trip| trip.user_type), usize::MAX);
    let total: u64 = counts.iter().map(|c| c.count).sum();

    let slices = counts
        .into_iter()
        .map(|c| PieSlice {
            percent: c.count as f64 * 100.0 / total as f64,
            label: c.label,
            count: c.count,
        })
        .collect();

    ChartSpec {
        kind: VisualizationKind::CustomerSubscriber,
        title: VisualizationKind::CustomerSubscriber.label().to_string(),
        x_label: String::new(),
        y_label: String::new(),
        data: ChartData::Pie { slices },
    }
}

/// Trips per (hour of day, day of week) with Monday first
pub fn hourly_weekly_heatmap(table: &TripTable) -> ChartSpec {
    let mut grid = [[0u64; 7]; 24];
    for trip in table.trips() {
        let hour = trip.start_time.hour() as usize;
        let weekday = trip.start_time.weekday().num_days_from_monday() as usize;
        grid[hour][weekday] += 1;
    }

    let cells = grid
        .iter()
        .enumerate()
        .flat_map(|(hour, row)| {
            row.iter().enumerate().filter(|(_, count)| **count > 0).map(move |(weekday, count)| HeatmapCell {
                hour: hour as u32,
                weekday: weekday as u32,
                count: *count,
            })
        })
        .collect();

    ChartSpec {
        kind: VisualizationKind::HourlyWeeklyHeatmap,
        title: VisualizationKind::HourlyWeeklyHeatmap.label().to_string(),
        x_label: "Day of the Week".to_string(),
        y_label: "Hour of the Day".to_string(),
        data: ChartData::Heatmap {
            x_labels: WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
            y_labels: (0..24).map(|h| h.to_string()).collect(),
            cells,
        },
    }
}

/// The [`TOP_N`] busiest start stations and end stations side by side
pub fn top_stations(table: &TripTable) -> ChartSpec {
    let starts = ranked_counts(table.trips().map(|trip| trip.start_station), TOP_N);
    let ends = ranked_counts(table.trips().map(|trip| trip.end_station), TOP_N);

    let mut categories: Vec<String> = Vec::with_capacity(starts.len() + ends.len());
    for bar in starts.iter().chain(ends.iter()) {
        if !categories.contains(&bar.label) {
            categories.push(bar.label.clone());
        }
    }

    ChartSpec {
        kind: VisualizationKind::TopStations,
        title: VisualizationKind::TopStations.label().to_string(),
        x_label: "Station Name".to_string(),
        y_label: TRIPS_AXIS.to_string(),
        data: ChartData::GroupedBar {
            categories,
            series: vec![
                BarSeries { name: "Start Stations".to_string(), bars: starts },
                BarSeries { name: "End Stations".to_string(), bars: ends },
            ],
        },
    }
}

/// The [`TOP_N`] postal codes by trip count; trips without one are skipped
pub fn postal_codes(table: &TripTable) -> ChartSpec {
    let bars = ranked_counts(table.trips().filter_map(|trip| trip.postal_code), TOP_N);

    ChartSpec {
        kind: VisualizationKind::PostalCode,
        title: VisualizationKind::PostalCode.label().to_string(),
        x_label: "Postal Code".to_string(),
        y_label: TRIPS_AXIS.to_string(),
        data: ChartData::Bar { bars },
    }
}

/// Count values and keep the `limit` largest, descending
///
/// Ties keep first-seen order.
fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<CategoryCount> {
    let mut counter = Counter::default();
    for value in values {
        *counter.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, u64)> = counter.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(label, count)| CategoryCount::new(label, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, trip, TripFixture};
    use bb_data::TripTable;

    fn table(trips: Vec<TripFixture>) -> TripTable {
        TripTable::from_records(trips.into_iter().map(TripFixture::into_record)).unwrap()
    }

    fn mixed() -> TripTable {
        table(vec![
            trip("A", "B").at(at(2020, 1, 6, 8)).duration(300.0).user("Subscriber").postal("02139"),
            trip("A", "C").at(at(2020, 1, 7, 9)).duration(2000.0).user("Customer").postal("02139"),
            trip("B", "C").at(at(2020, 3, 2, 17)).duration(2500.0).user("Subscriber").postal("02215"),
            trip("C", "A").at(at(2020, 3, 8, 17)).duration(0.0).user("Subscriber"),
            trip("A", "B").at(at(2020, 2, 12, 23)).duration(45.0).user("Customer").postal("02116"),
        ])
    }

    #[test]
    fn test_every_kind_conserves_counts() {
        let table = mixed();
        for kind in [
            VisualizationKind::MonthlyTrend,
            VisualizationKind::CustomerSubscriber,
            VisualizationKind::HourlyWeeklyHeatmap,
        ] {
            assert_eq!(build_chart(&table, kind).total(), table.len() as u64, "{kind}");
        }

        // 2500 s falls outside the histogram window
        assert_eq!(build_chart(&table, VisualizationKind::TripDuration).total(), 4);
    }

    #[test]
    fn test_monthly_trend_is_chronological() {
        let spec = monthly_trend(&mixed());
        let ChartData::Line { points } = spec.data else {
            panic!("expected a line chart");
        };
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2020-01", "2020-02", "2020-03"]);
        assert_eq!(points.iter().map(|p| p.count).collect::<Vec<_>>(), vec![2, 1, 2]);
    }

    #[test]
    fn test_duration_histogram_has_fifty_bins_with_closed_upper_edge() {
        let spec = trip_duration(&mixed());
        let ChartData::Histogram { bins } = spec.data else {
            panic!("expected a histogram");
        };
        assert_eq!(bins.len(), DURATION_BINS);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[0].end, 40.0);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[7].count, 1);
        assert_eq!(bins[DURATION_BINS - 1].end, 2000.0);
        assert_eq!(bins[DURATION_BINS - 1].count, 1);
    }

    #[test]
    fn test_subscriber_split() {
        let mut trips = Vec::new();
        for i in 0..1000 {
            let user = if i < 720 { "Subscriber" } else { "Customer" };
            trips.push(trip("A", "B").user(user));
        }
        let spec = customer_subscriber(&table(trips));
        let ChartData::Pie { slices } = spec.data else {
            panic!("expected a pie chart");
        };

        assert_eq!(slices.len(), 2);
        assert_eq!((slices[0].label.as_str(), slices[0].count), ("Subscriber", 720));
        assert_eq!((slices[1].label.as_str(), slices[1].count), ("Customer", 280));
        assert!((slices[0].percent - 72.0).abs() < 1e-9);
        assert!((slices.iter().map(|s| s.percent).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_heatmap_places_monday_first() {
        // 2020-01-06 was a Monday, 2020-03-08 a Sunday
        let spec = hourly_weekly_heatmap(&mixed());
        let ChartData::Heatmap { x_labels, y_labels, cells } = spec.data else {
            panic!("expected a heatmap");
        };
        assert_eq!(x_labels.first().map(String::as_str), Some("Mon"));
        assert_eq!(x_labels.last().map(String::as_str), Some("Sun"));
        assert_eq!(y_labels.len(), 24);
        assert!(cells.contains(&HeatmapCell { hour: 8, weekday: 0, count: 1 }));
        assert!(cells.contains(&HeatmapCell { hour: 17, weekday: 6, count: 1 }));
    }

    #[test]
    fn test_top_lists_are_capped_and_descending() {
        let mut trips = Vec::new();
        for station in 0..15 {
            for _ in 0..=station {
                trips.push(trip(&format!("S{station}"), "Hub").postal(&format!("{:05}", station)));
            }
        }
        let table = table(trips);

        let ChartData::GroupedBar { series, categories } = top_stations(&table).data else {
            panic!("expected grouped bars");
        };
        assert_eq!(series[0].bars.len(), TOP_N);
        assert_eq!(series[0].bars[0].label, "S14");
        assert!(series[0].bars.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(series[1].bars.len(), 1);
        assert_eq!(categories.len(), TOP_N + 1);

        let ChartData::Bar { bars } = postal_codes(&table).data else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), TOP_N);
        assert!(bars.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = table(vec![trip("Z", "B"), trip("Y", "B"), trip("X", "B"), trip("Y", "B")]);
        let ChartData::GroupedBar { series, .. } = top_stations(&table).data else {
            panic!("expected grouped bars");
        };
        let labels: Vec<&str> = series[0].bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Y", "Z", "X"]);
    }

    #[test]
    fn test_empty_table_gives_empty_specs() {
        let empty = table(Vec::new());
        for kind in VisualizationKind::ALL {
            let spec = build_chart(&empty, kind);
            assert!(spec.is_empty(), "{kind}");
            assert_eq!(spec.kind, kind);
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let table = mixed();
        for kind in VisualizationKind::ALL {
            assert_eq!(build_chart(&table, kind), build_chart(&table, kind));
        }
    }
}
