//! Trip data loading for the dashboard
//!
//! Reads a delimited trip file once at start-up into an Arrow record batch
//! and exposes it as a read-only [`TripTable`].

pub mod config;
pub mod schema;
pub mod sources;
pub mod table;

use arrow::error::ArrowError;
use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::{NullConfig, TripColumns, TripFileConfig};
pub use sources::CsvTripSource;
pub use table::{TripBatchBuilder, TripRecord, TripRow, TripTable};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a timestamp")]
    Timestamp {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}
