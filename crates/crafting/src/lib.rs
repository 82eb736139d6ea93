//! Recipe execution against a batch store.
//!
//! This crate contains the policy side of the production chain: the
//! capability gate deciding which recipe categories an owner may run, the
//! stateless transformation engine performing one consume-then-produce step,
//! and the workstation — the minimal inventory owner carrying the
//! active-recipe selection.

pub mod engine;
pub mod error;
pub mod gate;
pub mod station;

pub use engine::execute;
pub use error::{ExecutionError, ExecutionResult};
pub use gate::CapabilityGate;
pub use station::Workstation;
