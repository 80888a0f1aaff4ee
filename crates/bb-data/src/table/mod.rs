//! In-memory trip table

mod builder;

pub use builder::{TripBatchBuilder, TripRecord};

use std::collections::BTreeSet;

use arrow::array::{Array, BooleanArray, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::compute::filter_record_batch;
use arrow::record_batch::RecordBatch;
use bb_core::{DateBounds, DateRange, TripSource};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schema::{self, trip_schema};
use crate::DataError;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Borrowed view of one trip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRow<'a> {
    pub start_time: NaiveDateTime,
    pub stop_time: NaiveDateTime,
    pub duration: Option<f64>,
    pub start_station: &'a str,
    pub start_point: Option<GeoPoint>,
    pub end_station: &'a str,
    pub end_point: Option<GeoPoint>,
    pub user_type: Option<&'a str>,
    pub postal_code: Option<&'a str>,
}

impl TripRow<'_> {
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

/// Typed handles on the batch columns, resolved once
#[derive(Debug, Clone)]
struct TripArrays {
    start_time: TimestampMillisecondArray,
    stop_time: TimestampMillisecondArray,
    duration: Float64Array,
    start_station: StringArray,
    start_latitude: Float64Array,
    start_longitude: Float64Array,
    end_station: StringArray,
    end_latitude: Float64Array,
    end_longitude: Float64Array,
    user_type: StringArray,
    postal_code: StringArray,
}

/// Read-only table of trips backed by one Arrow record batch
#[derive(Debug, Clone)]
pub struct TripTable {
    batch: RecordBatch,
    arrays: TripArrays,
}

impl TripTable {
    /// Wrap a batch after checking it against the canonical trip schema
    pub fn try_new(batch: RecordBatch) -> Result<Self, DataError> {
        let expected = trip_schema();
        for field in expected.fields() {
            let column = batch
                .column_by_name(field.name())
                .ok_or_else(|| DataError::MissingColumn(field.name().clone()))?;
            if column.data_type() != field.data_type() {
                return Err(DataError::SchemaMismatch(format!(
                    "column '{}' is {:?}, expected {:?}",
                    field.name(),
                    column.data_type(),
                    field.data_type()
                )));
            }
            if !field.is_nullable() && column.null_count() > 0 {
                return Err(DataError::SchemaMismatch(format!(
                    "column '{}' contains {} nulls",
                    field.name(),
                    column.null_count()
                )));
            }
        }

        let arrays = TripArrays {
            start_time: typed_column(&batch, schema::START_TIME)?,
            stop_time: typed_column(&batch, schema::STOP_TIME)?,
            duration: typed_column(&batch, schema::DURATION)?,
            start_station: typed_column(&batch, schema::START_STATION_NAME)?,
            start_latitude: typed_column(&batch, schema::START_STATION_LATITUDE)?,
            start_longitude: typed_column(&batch, schema::START_STATION_LONGITUDE)?,
            end_station: typed_column(&batch, schema::END_STATION_NAME)?,
            end_latitude: typed_column(&batch, schema::END_STATION_LATITUDE)?,
            end_longitude: typed_column(&batch, schema::END_STATION_LONGITUDE)?,
            user_type: typed_column(&batch, schema::USER_TYPE)?,
            postal_code: typed_column(&batch, schema::POSTAL_CODE)?,
        };

        for timestamps in [&arrays.start_time, &arrays.stop_time] {
            if let Some(bad) = timestamps.values().iter().find(|ms| millis_to_datetime(**ms).is_none()) {
                return Err(DataError::SchemaMismatch(format!("timestamp {} ms is out of range", bad)));
            }
        }

        debug!("Trip table validated: {} rows", batch.num_rows());
        Ok(Self { batch, arrays })
    }

    /// Build a table directly from owned records
    pub fn from_records<I: IntoIterator<Item = TripRecord>>(records: I) -> Result<Self, DataError> {
        let builder: TripBatchBuilder = records.into_iter().collect();
        Self::try_new(builder.finish()?)
    }

    /// Load and validate every trip from a source
    pub async fn load(source: &dyn TripSource) -> anyhow::Result<Self> {
        info!("Loading trips from {}", source.source_name());
        let batch = source.load_batch().await?;
        let table = Self::try_new(batch)?;
        info!("Loaded {} trips from {}", table.len(), source.source_name());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// The underlying record batch
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Borrow row `index`; panics if out of bounds like slice indexing
    pub fn row(&self, index: usize) -> TripRow<'_> {
        let a = &self.arrays;
        TripRow {
            start_time: millis_to_datetime(a.start_time.value(index)).unwrap_or_default(),
            stop_time: millis_to_datetime(a.stop_time.value(index)).unwrap_or_default(),
            duration: opt_f64(&a.duration, index),
            start_station: a.start_station.value(index),
            start_point: opt_point(&a.start_latitude, &a.start_longitude, index),
            end_station: a.end_station.value(index),
            end_point: opt_point(&a.end_latitude, &a.end_longitude, index),
            user_type: opt_str(&a.user_type, index),
            postal_code: opt_str(&a.postal_code, index),
        }
    }

    /// Iterate all trips in file order
    pub fn trips(&self) -> impl Iterator<Item = TripRow<'_>> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    /// Start dates of every trip, without materializing whole rows
    fn start_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.arrays
            .start_time
            .values()
            .iter()
            .map(|ms| millis_to_datetime(*ms).unwrap_or_default().date())
    }

    /// Distinct start-station names in sorted order
    pub fn start_station_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.arrays.start_station.iter().flatten().collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Earliest and latest start date across the whole table
    pub fn date_span(&self) -> Option<DateBounds> {
        bounds_of(self.start_dates())
    }

    /// Earliest and latest start date among trips leaving `station`
    pub fn station_date_bounds(&self, station: &str) -> Option<DateBounds> {
        let stations = &self.arrays.start_station;
        bounds_of(
            self.start_dates()
                .enumerate()
                .filter(|(i, _)| stations.value(*i) == station)
                .map(|(_, date)| date),
        )
    }

    /// Trips leaving `station` whose start date lies within `range`
    ///
    /// An inverted range matches nothing.
    pub fn filter_station_dates(&self, station: &str, range: DateRange) -> Result<TripTable, DataError> {
        let stations = &self.arrays.start_station;
        let mask: BooleanArray = self
            .start_dates()
            .enumerate()
            .map(|(i, date)| Some(stations.value(i) == station && range.contains(date)))
            .collect();
        let filtered = filter_record_batch(&self.batch, &mask)?;
        debug!(
            "Filtered {} of {} trips for '{}' in {}..={}",
            filtered.num_rows(),
            self.len(),
            station,
            range.start,
            range.end
        );
        Self::try_new(filtered)
    }
}

fn typed_column<T: Array + Clone + 'static>(batch: &RecordBatch, name: &str) -> Result<T, DataError> {
    batch
        .column_by_name(name)
        .and_then(|column| column.as_any().downcast_ref::<T>())
        .cloned()
        .ok_or_else(|| DataError::SchemaMismatch(format!("column '{}' has an unexpected array type", name)))
}

fn millis_to_datetime(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

fn opt_f64(array: &Float64Array, index: usize) -> Option<f64> {
    array.is_valid(index).then(|| array.value(index))
}

fn opt_str(array: &StringArray, index: usize) -> Option<&str> {
    array.is_valid(index).then(|| array.value(index))
}

fn opt_point(lat: &Float64Array, lon: &Float64Array, index: usize) -> Option<GeoPoint> {
    Some(GeoPoint::new(opt_f64(lat, index)?, opt_f64(lon, index)?))
}

fn bounds_of(dates: impl Iterator<Item = NaiveDate>) -> Option<DateBounds> {
    dates.fold(None, |acc, date| match acc {
        None => Some(DateBounds::new(date, date)),
        Some(b) => Some(DateBounds::new(b.min.min(date), b.max.max(date))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn trip(start: &str, end: &str, when: NaiveDateTime) -> TripRecord {
        TripRecord {
            start_time: when,
            stop_time: when + chrono::Duration::minutes(12),
            duration: Some(720.0),
            start_station: start.to_string(),
            start_latitude: Some(42.36),
            start_longitude: Some(-71.10),
            end_station: end.to_string(),
            end_latitude: Some(42.35),
            end_longitude: Some(-71.06),
            user_type: Some("Subscriber".to_string()),
            postal_code: None,
        }
    }

    fn sample() -> TripTable {
        TripTable::from_records(vec![
            trip("Kendall", "MIT", at(2020, 3, 2, 8)),
            trip("Central", "MIT", at(2020, 1, 15, 9)),
            trip("Kendall", "Central", at(2020, 5, 30, 17)),
            trip("Kendall", "MIT", at(2020, 4, 10, 12)),
            trip("Central", "Kendall", at(2020, 12, 20, 7)),
        ])
        .unwrap()
    }

    #[test]
    fn test_station_names_sorted_and_distinct() {
        assert_eq!(sample().start_station_names(), vec!["Central", "Kendall"]);
    }

    #[test]
    fn test_station_bounds_ignore_global_span() {
        let table = sample();
        let span = table.date_span().unwrap();
        assert_eq!(span.min, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
        assert_eq!(span.max, NaiveDate::from_ymd_opt(2020, 12, 20).unwrap());

        let bounds = table.station_date_bounds("Kendall").unwrap();
        assert_eq!(bounds.min, NaiveDate::from_ymd_opt(2020, 3, 2).unwrap());
        assert_eq!(bounds.max, NaiveDate::from_ymd_opt(2020, 5, 30).unwrap());

        assert!(table.station_date_bounds("Nowhere").is_none());
    }

    #[test]
    fn test_filter_is_inclusive_on_both_ends() {
        let table = sample();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 4, 10).unwrap(),
        );
        let subset = table.filter_station_dates("Kendall", range).unwrap();
        assert_eq!(subset.len(), 2);
        assert!(subset.trips().all(|t| t.start_station == "Kendall"));
    }

    #[test]
    fn test_inverted_range_yields_empty_table() {
        let table = sample();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        );
        let subset = table.filter_station_dates("Kendall", range).unwrap();
        assert!(subset.is_empty());
        assert!(subset.date_span().is_none());
    }

    #[test]
    fn test_row_round_trips_nullable_fields() {
        let table = sample();
        let row = table.row(1);
        assert_eq!(row.start_station, "Central");
        assert_eq!(row.start_time, at(2020, 1, 15, 9));
        assert_eq!(row.user_type, Some("Subscriber"));
        assert_eq!(row.postal_code, None);
        assert_eq!(row.start_point, Some(GeoPoint::new(42.36, -71.10)));
    }

    #[test]
    fn test_rejects_batch_without_trip_schema() {
        use arrow::datatypes::{DataType, Field, Schema};
        use std::sync::Arc;

        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Float64, false)]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(vec![1.0]))]).unwrap();
        assert!(matches!(TripTable::try_new(batch), Err(DataError::MissingColumn(_))));
    }
}
