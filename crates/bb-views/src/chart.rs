//! Chart specifications handed to the chart renderer

use bb_core::VisualizationKind;
use serde::{Deserialize, Serialize};

/// Trip count for one category (month, station, postal code, user type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// One histogram bin, `[start, end)` except the last which is closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    /// Share of the total in percent
    pub percent: f64,
}

/// Trips starting in one (hour, weekday) cell; weekday 0 is Monday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub hour: u32,
    pub weekday: u32,
    pub count: u64,
}

/// A named bar series on a shared category axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub bars: Vec<CategoryCount>,
}

/// The derived table behind a chart, one variant per chart type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Line {
        points: Vec<CategoryCount>,
    },
    Histogram {
        bins: Vec<HistogramBin>,
    },
    Pie {
        slices: Vec<PieSlice>,
    },
    Heatmap {
        x_labels: Vec<String>,
        y_labels: Vec<String>,
        cells: Vec<HeatmapCell>,
    },
    GroupedBar {
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    Bar {
        bars: Vec<CategoryCount>,
    },
}

/// Chart kind, derived table, titles and axis labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: VisualizationKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl ChartSpec {
    /// Sum of every count in the derived table
    pub fn total(&self) -> u64 {
        match &self.data {
            ChartData::Line { points } => points.iter().map(|p| p.count).sum(),
            ChartData::Histogram { bins } => bins.iter().map(|b| b.count).sum(),
            ChartData::Pie { slices } => slices.iter().map(|s| s.count).sum(),
            ChartData::Heatmap { cells, .. } => cells.iter().map(|c| c.count).sum(),
            ChartData::GroupedBar { series, .. } => series
                .iter()
                .flat_map(|s| s.bars.iter())
                .map(|b| b.count)
                .sum(),
            ChartData::Bar { bars } => bars.iter().map(|b| b.count).sum(),
        }
    }

    /// Number of rows in the derived table
    pub fn row_count(&self) -> usize {
        match &self.data {
            ChartData::Line { points } => points.len(),
            ChartData::Histogram { bins } => bins.len(),
            ChartData::Pie { slices } => slices.len(),
            ChartData::Heatmap { cells, .. } => cells.len(),
            ChartData::GroupedBar { series, .. } => series.iter().map(|s| s.bars.len()).sum(),
            ChartData::Bar { bars } => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
