//! Headless export: every output written to a directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bb_core::{Selection, VisualizationKind};
use serde_json::json;
use tracing::info;

use crate::controller::Controller;

/// Files written by [`export`]
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    pub map_trips: usize,
}

/// Write chart specs and texts for all six kinds, plus date bounds and map
/// HTML for the selection's station and dates
pub fn export(controller: &Controller, selection: &Selection, dir: &Path) -> Result<ExportSummary> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut summary = ExportSummary::default();

    for kind in VisualizationKind::ALL {
        let chart = controller.visualization_chart(kind);
        let json = chart.to_json().with_context(|| format!("Failed to encode chart {}", kind))?;
        summary.files.push(write(dir, &format!("chart-{}.json", kind.id()), &json)?);
        summary.files.push(write(
            dir,
            &format!("text-{}.txt", kind.id()),
            &controller.visualization_text(kind),
        )?);
    }

    let station = selection.station.as_deref();
    let bounds = station.and_then(|s| controller.date_bounds(s));
    let bounds_json = json!({
        "station": station,
        "bounds": bounds,
        "start_date": selection.start_date,
        "end_date": selection.end_date,
    });
    summary
        .files
        .push(write(dir, "bounds.json", &serde_json::to_string_pretty(&bounds_json)?)?);

    let map = controller.map_markup(station, selection.start_date, selection.end_date);
    summary.map_trips = map.trips;
    summary.files.push(write(dir, "map.html", &map.html)?);

    info!(
        "Exported {} files to {} ({} trips on the map)",
        summary.files.len(),
        dir.display(),
        summary.map_trips
    );
    Ok(summary)
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoTripSource;
    use bb_data::{TripBatchBuilder, TripTable};
    use bb_views::MapStyle;
    use std::sync::Arc;

    #[test]
    fn test_export_writes_every_output() {
        let builder: TripBatchBuilder = DemoTripSource::new(300, 11).generate().into_iter().collect();
        let table = TripTable::try_new(builder.finish().unwrap()).unwrap();
        let station = table.start_station_names().into_iter().next();
        let controller = Controller::new(Arc::new(table), MapStyle::default());
        let selection = Selection::new(station);

        let dir = std::env::temp_dir().join(format!("bikeboard-export-{}", std::process::id()));
        let summary = export(&controller, &selection, &dir).unwrap();

        assert_eq!(summary.files.len(), 6 * 2 + 2);
        assert!(summary.map_trips > 0);
        assert!(dir.join("chart-monthly-trend.json").exists());
        assert!(dir.join("text-postal-code.txt").exists());

        let bounds: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("bounds.json")).unwrap()).unwrap();
        assert!(bounds["bounds"]["min"].is_string());

        let html = fs::read_to_string(dir.join("map.html")).unwrap();
        assert!(html.contains("L.markerClusterGroup"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
