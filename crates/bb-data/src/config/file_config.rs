//! File configuration for trip loading

use std::path::PathBuf;
use serde::{Serialize, Deserialize};

use super::null_handling::NullConfig;
use crate::schema;

/// Header names of the required columns in the source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripColumns {
    pub start_time: String,
    pub stop_time: String,
    pub duration: String,
    pub start_station_name: String,
    pub start_station_latitude: String,
    pub start_station_longitude: String,
    pub end_station_name: String,
    pub end_station_latitude: String,
    pub end_station_longitude: String,
    pub user_type: String,
    pub postal_code: String,
}

impl Default for TripColumns {
    fn default() -> Self {
        Self {
            start_time: schema::START_TIME.to_string(),
            stop_time: schema::STOP_TIME.to_string(),
            duration: schema::DURATION.to_string(),
            start_station_name: schema::START_STATION_NAME.to_string(),
            start_station_latitude: schema::START_STATION_LATITUDE.to_string(),
            start_station_longitude: schema::START_STATION_LONGITUDE.to_string(),
            end_station_name: schema::END_STATION_NAME.to_string(),
            end_station_latitude: schema::END_STATION_LATITUDE.to_string(),
            end_station_longitude: schema::END_STATION_LONGITUDE.to_string(),
            user_type: schema::USER_TYPE.to_string(),
            postal_code: schema::POSTAL_CODE.to_string(),
        }
    }
}

impl TripColumns {
    /// Configured header names in canonical schema order
    pub fn in_schema_order(&self) -> [&str; schema::COLUMN_COUNT] {
        [
            self.start_time.as_str(),
            self.stop_time.as_str(),
            self.duration.as_str(),
            self.start_station_name.as_str(),
            self.start_station_latitude.as_str(),
            self.start_station_longitude.as_str(),
            self.end_station_name.as_str(),
            self.end_station_latitude.as_str(),
            self.end_station_longitude.as_str(),
            self.user_type.as_str(),
            self.postal_code.as_str(),
        ]
    }
}

/// Configuration for the trip file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripFileConfig {
    /// Path to the file
    pub path: PathBuf,

    /// Field delimiter
    pub delimiter: char,

    /// Whether the first record is a header row
    pub has_headers: bool,

    /// Header names of the required columns
    pub columns: TripColumns,

    /// chrono formats tried in order for both timestamp columns
    pub timestamp_formats: Vec<String>,

    /// Null handling configuration
    pub null_config: NullConfig,
}

impl Default for TripFileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: ',',
            has_headers: true,
            columns: TripColumns::default(),
            timestamp_formats: vec![
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%m/%d/%Y %H:%M:%S".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
            ],
            null_config: NullConfig::default(),
        }
    }
}

impl TripFileConfig {
    /// Create a configuration with default settings for `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Get the file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Delimiter as the byte the csv reader expects; non-ASCII falls back to ','
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TripFileConfig = serde_json::from_str(
            r#"{ "delimiter": ";", "columns": { "postal_code": "zip" } }"#,
        )
        .unwrap();

        assert_eq!(config.delimiter_byte(), b';');
        assert_eq!(config.columns.postal_code, "zip");
        assert_eq!(config.columns.start_time, schema::START_TIME);
        assert_eq!(config.timestamp_formats.len(), 4);
    }

    #[test]
    fn test_file_name() {
        let config = TripFileConfig::new(PathBuf::from("data/tripdata_2020.csv"));
        assert_eq!(config.file_name(), "tripdata_2020.csv");
    }
}
