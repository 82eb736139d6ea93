//! Tracing/logging setup shared by hosts.
//!
//! The domain crates only emit `tracing` events; wiring a subscriber is the
//! host's job. Call [`init`] once at startup (extra calls are no-ops).

pub mod tracing;

/// Initialize process-wide tracing/logging.
pub fn init() {
    tracing::init();
}
