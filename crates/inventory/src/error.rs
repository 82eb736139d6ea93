//! Batch-store error model.

use thiserror::Error;

/// Result type used across the batch-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Policy rejection from a batch-store operation.
///
/// Every variant is a deterministic, recoverable condition; the store is left
/// unchanged when one is returned. Infrastructure failures (corrupt files)
/// live in [`StoreIoError`] instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// Quantity was zero, negative, or not a finite number.
    #[error("invalid quantity: {quantity}")]
    InvalidQuantity { quantity: f64 },

    /// The store has a whitelist and the commodity is not on it.
    #[error("commodity {commodity:?} is not allowed in this store")]
    NotAllowed { commodity: String },

    /// Admitting the quantity would exceed the capacity budget.
    #[error("no space for {requested} of {commodity:?} ({free} free)")]
    OverCapacity {
        commodity: String,
        requested: f64,
        free: f64,
    },

    /// The summed quantity across batches is less than requested.
    #[error("not enough {commodity:?}: requested {requested}, available {available}")]
    InsufficientQuantity {
        commodity: String,
        requested: f64,
        available: f64,
    },
}

/// Hard failure while loading or saving a persisted store record.
///
/// Kept separate from [`StoreError`]: a corrupt file is exceptional, not an
/// ordinary policy rejection.
#[derive(Debug, Error)]
pub enum StoreIoError {
    #[error("store file io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file parse: {0}")]
    Parse(#[from] serde_json::Error),
}
