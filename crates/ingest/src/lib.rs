//! # cm-ingest
//!
//! Fill sources for the profiling pipeline. Two formats are understood:
//!
//! - [`hyperliquid`]: the exchange `userFills` response, string-encoded
//!   decimals and millisecond timestamps.
//! - [`fixture`]: a JSON array of already-normalized fill records with
//!   RFC 3339 timestamps, tagged by wallet address.
//!
//! Both produce [`cm_core::types::Fill`]. [`lookback`] restricts a fill set
//! to a trailing window.

pub mod error;
pub mod fixture;
pub mod hyperliquid;
pub mod lookback;

pub use error::IngestError;
pub use fixture::{load_fixture, parse_fixture, FixtureFill};
pub use hyperliquid::{load_user_fills, parse_user_fills, HyperliquidFill};
pub use lookback::{filter_lookback, LookbackWindow};
