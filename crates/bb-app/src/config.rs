//! Dashboard configuration file

use std::path::Path;

use anyhow::{Context, Result};
use bb_data::TripFileConfig;
use bb_views::MapStyle;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings read from the JSON file given with `--config`
///
/// Every field is optional; missing ones keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Window and page title
    pub title: String,
    pub data: TripFileConfig,
    pub map: MapStyle,
    pub dark_mode: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Boston Blue Bike Travel Dashboard (2020)".to_string(),
            data: TripFileConfig::default(),
            map: MapStyle::default(),
            dark_mode: true,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{ "data": { "delimiter": ";" }, "map": { "zoom_start": 12 } }"#,
        )
        .unwrap();
        assert_eq!(config.data.delimiter, ';');
        assert!(config.data.has_headers);
        assert_eq!(config.map.zoom_start, 12);
        assert_eq!(config.title, DashboardConfig::default().title);
    }

    #[test]
    fn test_load_reports_path() {
        let path = std::env::temp_dir().join("bikeboard-missing-config.json");
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("bikeboard-missing-config.json"));
    }
}
