//! Core vocabulary for the trip dashboard
//!
//! This crate provides the types shared by every layer: the visualization
//! kinds, the per-session selection state, the control events that drive
//! recomputation, and the trait that trip data sources implement.

pub mod events;
pub mod selection;

// Re-export commonly used types
pub use events::{ControlEvent, OutputKind};
pub use selection::{DateBounds, DateRange, ParseKindError, Selection, VisualizationKind};
pub use data::TripSource;

pub mod data {
    use arrow::record_batch::RecordBatch;

    /// Trait for trip data sources
    ///
    /// A source is read exactly once at start-up. The returned batch must carry
    /// the canonical trip schema; the data crate validates it before use.
    #[async_trait::async_trait]
    pub trait TripSource: Send + Sync {
        /// Read every trip into a single record batch
        async fn load_batch(&self) -> anyhow::Result<RecordBatch>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
