//! # cm-stats
//!
//! Reduces a session collection into a fixed statistical summary: top
//! markets, median position size and leverage, average hold time, win rate,
//! and the most active hours of the day.

pub mod aggregator;
pub mod math;

pub use aggregator::{hour_window_label, StatsAggregator, TradingStats};
