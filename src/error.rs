//! Error types for catalog loading and track sampling

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while loading a catalog or sampling satellite positions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// The catalog source could not be fetched, read or parsed into any record
    #[error("catalog unavailable from {origin}: {reason}")]
    CatalogUnavailable { origin: String, reason: String },

    /// Requested satellite count is zero or larger than the catalog
    #[error("cannot select {requested} satellite(s) from a catalog of {available}")]
    InvalidSelectionCount { requested: usize, available: usize },

    /// A time window with no sample instants
    #[error("time window must contain at least one sample (got {sample_count})")]
    InvalidWindow { sample_count: u32 },

    /// Catalog index outside [0, len)
    #[error("satellite index {index} is out of range for a catalog of {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Position evaluation failed for one record at one instant
    #[error("propagation failed for {name} (NORAD {norad}, index {index}) at {at}: {reason}")]
    Propagation {
        index: usize,
        norad: u32,
        name: String,
        at: DateTime<Utc>,
        reason: String,
    },
}

/// Result type for sampler operations
pub type Result<T> = std::result::Result<T, TrackError>;
