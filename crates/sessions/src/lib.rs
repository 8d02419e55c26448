//! # cm-sessions
//!
//! Partitions a trader's fills into per-market trading sessions using an
//! inactivity-gap rule. A session is a maximal run of same-market fills with
//! no inter-fill gap exceeding the threshold (45 minutes by default).

pub mod grouper;
pub mod session;

pub use grouper::{SessionGrouper, DEFAULT_GAP_MINUTES};
pub use session::Session;
