use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::config::TripFileConfig;
use crate::schema::HeaderMap;
use crate::table::{TripBatchBuilder, TripRecord};
use crate::DataError;

// Canonical column positions, in `TripColumns::in_schema_order` order
const COL_START_TIME: usize = 0;
const COL_STOP_TIME: usize = 1;
const COL_DURATION: usize = 2;
const COL_START_NAME: usize = 3;
const COL_START_LAT: usize = 4;
const COL_START_LON: usize = 5;
const COL_END_NAME: usize = 6;
const COL_END_LAT: usize = 7;
const COL_END_LON: usize = 8;
const COL_USER_TYPE: usize = 9;
const COL_POSTAL_CODE: usize = 10;

/// Delimited trip file source
pub struct CsvTripSource {
    config: TripFileConfig,
    name: String,
}

/// Per-load counters reported once parsing finishes
#[derive(Debug, Default)]
struct ParseStats {
    rows: usize,
    null_durations: usize,
    null_coordinates: usize,
}

impl CsvTripSource {
    /// Create a new CSV source from a file configuration
    pub fn new(config: TripFileConfig) -> Self {
        let name = config.file_name();
        Self { config, name }
    }

    pub fn config(&self) -> &TripFileConfig {
        &self.config
    }

    /// Read the configured file into a trip batch
    pub fn read_path(path: &Path, config: &TripFileConfig) -> Result<RecordBatch, DataError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), config)
    }

    /// Parse trips from any reader
    pub fn read_from<R: Read>(reader: R, config: &TripFileConfig) -> Result<RecordBatch, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(config.has_headers)
            .delimiter(config.delimiter_byte())
            .flexible(true)
            .from_reader(reader);

        let header_map = if config.has_headers {
            HeaderMap::resolve(csv_reader.headers()?, &config.columns)?
        } else {
            HeaderMap::positional()
        };

        let mut builder = TripBatchBuilder::new();
        let mut stats = ParseStats::default();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let trip = Self::parse_record(&record, idx + 1, &header_map, config, &mut stats)?;
            builder.push(&trip);
            stats.rows += 1;
        }

        if stats.null_durations > 0 || stats.null_coordinates > 0 {
            warn!(
                "{} rows without a trip duration, {} rows with missing coordinates",
                stats.null_durations, stats.null_coordinates
            );
        }
        debug!("Parsed {} trip rows", stats.rows);

        builder.finish()
    }

    fn parse_record(
        record: &StringRecord,
        row: usize,
        header_map: &HeaderMap,
        config: &TripFileConfig,
        stats: &mut ParseStats,
    ) -> Result<TripRecord, DataError> {
        let cell = |column: usize| record.get(header_map.index(column)).unwrap_or("");
        let text = |column: usize| config.null_config.non_null(cell(column)).map(str::to_string);
        let number = |column: usize| {
            config
                .null_config
                .non_null(cell(column))
                .and_then(|value| value.parse::<f64>().ok())
                .filter(|value| value.is_finite())
        };
        let station = |column: usize, name: &str| {
            text(column).ok_or_else(|| DataError::Csv(format!("row {}: empty '{}'", row, name)))
        };

        let columns = &config.columns;
        let trip = TripRecord {
            start_time: Self::parse_timestamp(cell(COL_START_TIME), row, &columns.start_time, config)?,
            stop_time: Self::parse_timestamp(cell(COL_STOP_TIME), row, &columns.stop_time, config)?,
            duration: number(COL_DURATION),
            start_station: station(COL_START_NAME, &columns.start_station_name)?,
            start_latitude: number(COL_START_LAT),
            start_longitude: number(COL_START_LON),
            end_station: station(COL_END_NAME, &columns.end_station_name)?,
            end_latitude: number(COL_END_LAT),
            end_longitude: number(COL_END_LON),
            user_type: text(COL_USER_TYPE),
            postal_code: text(COL_POSTAL_CODE),
        };

        if trip.duration.is_none() {
            stats.null_durations += 1;
        }
        let coordinates = [trip.start_latitude, trip.start_longitude, trip.end_latitude, trip.end_longitude];
        if coordinates.iter().any(Option::is_none) {
            stats.null_coordinates += 1;
        }

        Ok(trip)
    }

    fn parse_timestamp(value: &str, row: usize, column: &str, config: &TripFileConfig) -> Result<NaiveDateTime, DataError> {
        let trimmed = value.trim();
        config
            .timestamp_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| DataError::Timestamp {
                row,
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

#[async_trait]
impl bb_core::data::TripSource for CsvTripSource {
    async fn load_batch(&self) -> anyhow::Result<RecordBatch> {
        info!("Reading trip file {:?}", self.config.path);
        let config = self.config.clone();
        let batch = tokio::task::spawn_blocking(move || Self::read_path(&config.path, &config))
            .await
            .map_err(DataError::from)??;
        Ok(batch)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TripTable;

    const HEADER: &str = "\"tripduration\",\"starttime\",\"stoptime\",\"start station id\",\"start station name\",\"start station latitude\",\"start station longitude\",\"end station id\",\"end station name\",\"end station latitude\",\"end station longitude\",\"bikeid\",\"usertype\",\"postal code\"";

    fn default_header() -> String {
        crate::config::TripColumns::default()
            .in_schema_order()
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn csv(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_reads_bluebikes_layout() {
        let data = csv(&[
            "597,\"2020-01-01 00:04:05.8270\",\"2020-01-01 00:14:03.6260\",366,\"Broadway T Stop\",42.342781,-71.057473,93,\"JFK/UMass T Stop\",42.320561,-71.05166,6005,\"Customer\",\"02127\"",
            "1130,\"2020-01-01 00:04:07.2000\",\"2020-01-01 00:22:57.9500\",219,\"Boston East\",42.369536,-71.039729,212,\"Maverick Square\",42.36907,-71.03952,3168,\"Subscriber\",",
        ]);

        let batch = CsvTripSource::read_from(data.as_bytes(), &TripFileConfig::default()).unwrap();
        let table = TripTable::try_new(batch).unwrap();

        assert_eq!(table.len(), 2);
        let first = table.row(0);
        assert_eq!(first.start_station, "Broadway T Stop");
        assert_eq!(first.duration, Some(597.0));
        assert_eq!(first.postal_code, Some("02127"));
        assert_eq!(first.start_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2020-01-01 00:04:05");
        assert_eq!(table.row(1).postal_code, None);
    }

    #[test]
    fn test_missing_column_fails() {
        let data = "starttime,stoptime\n2020-01-01 00:00:00,2020-01-01 00:10:00";
        let err = CsvTripSource::read_from(data.as_bytes(), &TripFileConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(_)));
    }

    #[test]
    fn test_bad_timestamp_reports_row() {
        let data = csv(&[
            "597,\"yesterday\",\"2020-01-01 00:14:03\",1,\"A\",42.3,-71.0,2,\"B\",42.3,-71.0,1,\"Customer\",\"02127\"",
        ]);
        let err = CsvTripSource::read_from(data.as_bytes(), &TripFileConfig::default()).unwrap_err();
        match err {
            DataError::Timestamp { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, crate::schema::START_TIME);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparseable_numbers_become_null() {
        let data = csv(&[
            "NA,\"2020-02-01 10:00:00\",\"2020-02-01 10:20:00\",1,\"A\",,-71.0,2,\"B\",42.3,-71.0,1,\"Subscriber\",\"02139\"",
        ]);
        let batch = CsvTripSource::read_from(data.as_bytes(), &TripFileConfig::default()).unwrap();
        let table = TripTable::try_new(batch).unwrap();
        let row = table.row(0);
        assert_eq!(row.duration, None);
        assert_eq!(row.start_point, None);
        assert!(row.end_point.is_some());
    }

    #[test]
    fn test_infinite_numbers_become_null() {
        let data = csv(&[
            "inf,\"2020-02-01 10:00:00\",\"2020-02-01 10:20:00\",1,\"A\",42.36,-71.06,2,\"B\",-infinity,-71.1,1,\"Subscriber\",\"02139\"",
        ]);
        let batch = CsvTripSource::read_from(data.as_bytes(), &TripFileConfig::default()).unwrap();
        let table = TripTable::try_new(batch).unwrap();
        let row = table.row(0);
        assert_eq!(row.duration, None);
        assert!(row.start_point.is_some());
        assert_eq!(row.end_point, None);
    }

    #[test]
    fn test_custom_delimiter_and_column_names() {
        let mut config = TripFileConfig::default();
        config.delimiter = ';';
        config.columns.postal_code = "zip".to_string();
        let header = default_header().replace(',', ";").replace("postal code", "zip");
        let data = format!(
            "{}\n2020-06-01 08:00:00;2020-06-01 08:30:00;1800;A;42.3;-71.0;B;42.4;-71.1;Subscriber;02139",
            header
        );
        let batch = CsvTripSource::read_from(data.as_bytes(), &config).unwrap();
        let table = TripTable::try_new(batch).unwrap();
        assert_eq!(table.row(0).postal_code, Some("02139"));
    }

    #[tokio::test]
    async fn test_async_load_from_file() {
        use bb_core::data::TripSource;

        let path = std::env::temp_dir().join(format!("bb-data-load-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            csv(&["300,\"2020-03-01 09:00:00\",\"2020-03-01 09:05:00\",1,\"A\",42.3,-71.0,2,\"B\",42.3,-71.1,1,\"Subscriber\",\"02139\""]),
        )
        .unwrap();

        let source = CsvTripSource::new(TripFileConfig::new(path.clone()));
        let table = TripTable::load(&source).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
        assert_eq!(source.source_name(), path.file_name().unwrap().to_str().unwrap());
    }
}
