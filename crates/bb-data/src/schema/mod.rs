//! Canonical trip schema and header resolution

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use csv::StringRecord;
use tracing::debug;

use crate::config::TripColumns;
use crate::DataError;

pub const START_TIME: &str = "starttime";
pub const STOP_TIME: &str = "stoptime";
pub const DURATION: &str = "tripduration";
pub const START_STATION_NAME: &str = "start station name";
pub const START_STATION_LATITUDE: &str = "start station latitude";
pub const START_STATION_LONGITUDE: &str = "start station longitude";
pub const END_STATION_NAME: &str = "end station name";
pub const END_STATION_LATITUDE: &str = "end station latitude";
pub const END_STATION_LONGITUDE: &str = "end station longitude";
pub const USER_TYPE: &str = "usertype";
pub const POSTAL_CODE: &str = "postal code";

pub const COLUMN_COUNT: usize = 11;

/// Build the canonical trip schema
///
/// Column order matches [`TripColumns::in_schema_order`].
pub fn trip_schema() -> SchemaRef {
    let timestamp = DataType::Timestamp(TimeUnit::Millisecond, None);
    Arc::new(Schema::new(vec![
        Field::new(START_TIME, timestamp.clone(), false),
        Field::new(STOP_TIME, timestamp, false),
        Field::new(DURATION, DataType::Float64, true),
        Field::new(START_STATION_NAME, DataType::Utf8, false),
        Field::new(START_STATION_LATITUDE, DataType::Float64, true),
        Field::new(START_STATION_LONGITUDE, DataType::Float64, true),
        Field::new(END_STATION_NAME, DataType::Utf8, false),
        Field::new(END_STATION_LATITUDE, DataType::Float64, true),
        Field::new(END_STATION_LONGITUDE, DataType::Float64, true),
        Field::new(USER_TYPE, DataType::Utf8, true),
        Field::new(POSTAL_CODE, DataType::Utf8, true),
    ]))
}

/// Positions of the required columns within a source header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    indices: [usize; COLUMN_COUNT],
}

impl HeaderMap {
    /// Resolve every configured column name against the header row
    pub fn resolve(headers: &StringRecord, columns: &TripColumns) -> Result<Self, DataError> {
        let mut indices = [0usize; COLUMN_COUNT];
        for (slot, name) in indices.iter_mut().zip(columns.in_schema_order()) {
            *slot = headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        }
        debug!("Resolved trip columns at positions {:?}", indices);
        Ok(Self { indices })
    }

    /// Map assuming the file has exactly the canonical columns in order
    pub fn positional() -> Self {
        let mut indices = [0usize; COLUMN_COUNT];
        for (i, slot) in indices.iter_mut().enumerate() {
            *slot = i;
        }
        Self { indices }
    }

    /// Source position of the canonical column `column`
    pub fn index(&self, column: usize) -> usize {
        self.indices[column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reordered_headers() {
        let columns = TripColumns::default();
        let mut names: Vec<&str> = columns.in_schema_order().to_vec();
        names.reverse();
        let headers = StringRecord::from(names);

        let map = HeaderMap::resolve(&headers, &TripColumns::default()).unwrap();
        assert_eq!(map.index(0), COLUMN_COUNT - 1);
        assert_eq!(map.index(COLUMN_COUNT - 1), 0);
    }

    #[test]
    fn test_missing_column_is_reported_by_name() {
        let headers = StringRecord::from(vec![START_TIME, STOP_TIME]);
        let err = HeaderMap::resolve(&headers, &TripColumns::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(name) if name == DURATION));
    }

    #[test]
    fn test_schema_width_matches_columns() {
        assert_eq!(trip_schema().fields().len(), COLUMN_COUNT);
    }
}
