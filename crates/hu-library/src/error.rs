//! Error types for the catalog cache and selection store

use thiserror::Error;

use crate::table::CatalogTableKind;

/// Errors from catalog mutations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// Table already holds its maximum number of records
    #[error("{table} table full ({capacity} records)")]
    CapacityExceeded {
        table: CatalogTableKind,
        capacity: usize,
    },

    /// Value does not fit a bounded string field
    #[error("value of {len} bytes exceeds capacity of {capacity}")]
    ValueTooLong { len: usize, capacity: usize },
}

/// Errors from the persisted selection store
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored values could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No configuration directory could be determined
    #[error("could not determine config directory")]
    NoConfigDir,
}
