//! FIFO batch storage for perishable commodities.
//!
//! This crate contains the batch store: per-commodity queues of aging batches
//! under a single capacity budget, implemented purely as deterministic domain
//! logic (no HTTP, no clocks — time advances only through explicit ticks).

pub mod error;
pub mod store;

pub use error::{StoreError, StoreIoError, StoreResult};
pub use store::{Batch, BatchStore, DEFAULT_OUTPUT_FRESHNESS, SPOIL_THRESHOLD};
