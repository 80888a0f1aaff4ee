//! Row-at-a-time construction of trip record batches

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder, TimestampMillisecondBuilder};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;

use crate::schema::trip_schema;
use crate::DataError;

/// One owned trip, as parsed from a source row or generated for a demo
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub stop_time: NaiveDateTime,
    pub duration: Option<f64>,
    pub start_station: String,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub end_station: String,
    pub end_latitude: Option<f64>,
    pub end_longitude: Option<f64>,
    pub user_type: Option<String>,
    pub postal_code: Option<String>,
}

/// Accumulates trip records into Arrow column builders
pub struct TripBatchBuilder {
    start_time: TimestampMillisecondBuilder,
    stop_time: TimestampMillisecondBuilder,
    duration: Float64Builder,
    start_station: StringBuilder,
    start_latitude: Float64Builder,
    start_longitude: Float64Builder,
    end_station: StringBuilder,
    end_latitude: Float64Builder,
    end_longitude: Float64Builder,
    user_type: StringBuilder,
    postal_code: StringBuilder,
    rows: usize,
}

impl Default for TripBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TripBatchBuilder {
    pub fn new() -> Self {
        Self {
            start_time: TimestampMillisecondBuilder::new(),
            stop_time: TimestampMillisecondBuilder::new(),
            duration: Float64Builder::new(),
            start_station: StringBuilder::new(),
            start_latitude: Float64Builder::new(),
            start_longitude: Float64Builder::new(),
            end_station: StringBuilder::new(),
            end_latitude: Float64Builder::new(),
            end_longitude: Float64Builder::new(),
            user_type: StringBuilder::new(),
            postal_code: StringBuilder::new(),
            rows: 0,
        }
    }

    /// Number of rows pushed so far
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn push(&mut self, trip: &TripRecord) {
        self.start_time.append_value(trip.start_time.and_utc().timestamp_millis());
        self.stop_time.append_value(trip.stop_time.and_utc().timestamp_millis());
        self.duration.append_option(trip.duration);
        self.start_station.append_value(&trip.start_station);
        self.start_latitude.append_option(trip.start_latitude);
        self.start_longitude.append_option(trip.start_longitude);
        self.end_station.append_value(&trip.end_station);
        self.end_latitude.append_option(trip.end_latitude);
        self.end_longitude.append_option(trip.end_longitude);
        self.user_type.append_option(trip.user_type.as_deref());
        self.postal_code.append_option(trip.postal_code.as_deref());
        self.rows += 1;
    }

    /// Finish all columns into a batch with the canonical schema
    pub fn finish(mut self) -> Result<RecordBatch, DataError> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(self.start_time.finish()),
            Arc::new(self.stop_time.finish()),
            Arc::new(self.duration.finish()),
            Arc::new(self.start_station.finish()),
            Arc::new(self.start_latitude.finish()),
            Arc::new(self.start_longitude.finish()),
            Arc::new(self.end_station.finish()),
            Arc::new(self.end_latitude.finish()),
            Arc::new(self.end_longitude.finish()),
            Arc::new(self.user_type.finish()),
            Arc::new(self.postal_code.finish()),
        ];
        RecordBatch::try_new(trip_schema(), columns).map_err(|e| e.into())
    }
}

impl FromIterator<TripRecord> for TripBatchBuilder {
    fn from_iter<I: IntoIterator<Item = TripRecord>>(iter: I) -> Self {
        let mut builder = TripBatchBuilder::new();
        for trip in iter {
            builder.push(&trip);
        }
        builder
    }
}
