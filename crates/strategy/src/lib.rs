//! # cm-strategy
//!
//! Rule-based trading-style detection. Each [`StrategyRule`] inspects the
//! session list and the aggregated [`TradingStats`](cm_stats::TradingStats)
//! and may emit a named [`Strategy`] label with a human-readable reason.
//! The [`StrategyDetector`] runs every registered rule in a fixed order, so
//! output is stable for identical input.

pub mod detector;
pub mod rules;
pub mod traits;

pub use detector::StrategyDetector;
pub use traits::{RuleContext, Strategy, StrategyRule};
