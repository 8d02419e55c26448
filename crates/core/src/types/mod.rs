//! Core types for trader profiling.
//!
//! Fills are the only input to the profiling pipeline. Every source (exchange
//! wire format, fixture store) converts into these structures before handing
//! them to the session grouper.

pub mod fill;
pub mod timestamp;

// Re-export primary types for convenient access via `cm_core::types::*`.
pub use fill::{Fill, Market, Side};
pub use timestamp::{Timestamp, MILLIS_PER_MINUTE};
