//! Session statistics aggregation.
//!
//! [`StatsAggregator::aggregate`] is a pure function of its session slice:
//! stats are recomputed from scratch on every call, never updated
//! incrementally. Empty input yields [`TradingStats::default`] (all zeros,
//! empty lists).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cm_core::config::StatsConfig;
use cm_core::types::*;
use cm_sessions::Session;

use crate::math::{median, ratio};

/// Fixed statistical summary of a trader's sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingStats {
    /// Most-traded markets by session count, most frequent first.
    pub top_markets: Vec<Market>,
    /// Median of per-session `position_size_usd`.
    pub median_position_size_usd: f64,
    /// Median leverage over sessions with known leverage; `0` if none.
    pub median_leverage: f64,
    /// Mean session duration in minutes.
    pub avg_hold_minutes: f64,
    /// Fraction of sessions with positive PnL, in `0..=1`.
    pub win_rate: f64,
    /// Most active hours of day as labels like `"14–15h"`.
    pub time_windows: Vec<String>,
}

/// Reduces sessions into [`TradingStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsAggregator {
    /// Maximum entries in `top_markets` and `time_windows`.
    top_n: usize,
    /// Fixed UTC offset for hour-of-day bucketing.
    utc_offset_minutes: i32,
}

impl StatsAggregator {
    /// Create an aggregator reporting `top_n` entries, bucketing hours with
    /// the given UTC offset.
    pub fn new(top_n: usize, utc_offset_minutes: i32) -> Self {
        Self {
            top_n,
            utc_offset_minutes,
        }
    }

    /// Create an aggregator from the `[stats]` configuration section.
    pub fn from_config(config: &StatsConfig) -> Self {
        Self::new(config.top_n, config.utc_offset_minutes)
    }

    /// Compute the full statistics snapshot.
    pub fn aggregate(&self, sessions: &[Session]) -> TradingStats {
        if sessions.is_empty() {
            return TradingStats::default();
        }

        let position_sizes: Vec<f64> = sessions.iter().map(|s| s.position_size_usd).collect();
        let leverages: Vec<f64> = sessions.iter().filter_map(Session::known_leverage).collect();
        let total_minutes: f64 = sessions.iter().map(|s| s.duration_minutes).sum();
        let winners = sessions.iter().filter(|s| s.is_winning()).count();

        let stats = TradingStats {
            top_markets: self.top_markets(sessions),
            median_position_size_usd: median(&position_sizes),
            median_leverage: median(&leverages),
            avg_hold_minutes: total_minutes / sessions.len() as f64,
            win_rate: ratio(winners, sessions.len()),
            time_windows: self.time_windows(sessions),
        };

        tracing::debug!(
            sessions = sessions.len(),
            top_markets = ?stats.top_markets,
            win_rate = stats.win_rate,
            "aggregated session stats"
        );

        stats
    }

    /// Markets ranked by session count. Ties keep first-encountered order.
    pub fn top_markets(&self, sessions: &[Session]) -> Vec<Market> {
        let mut counts: Vec<(&Market, usize)> = Vec::new();
        let mut index: HashMap<&Market, usize> = HashMap::new();

        for session in sessions {
            match index.get(&session.market) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(&session.market, counts.len());
                    counts.push((&session.market, 1));
                }
            }
        }

        // Stable sort: equal counts stay in insertion order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(self.top_n)
            .map(|(market, _)| market.clone())
            .collect()
    }

    /// Most active start hours, descending by count, ties by ascending hour.
    pub fn time_windows(&self, sessions: &[Session]) -> Vec<String> {
        let mut hour_counts = [0usize; 24];
        for session in sessions {
            let hour = session.start_time.hour_of_day(self.utc_offset_minutes) as usize;
            hour_counts[hour] += 1;
        }

        let mut active: Vec<(u32, usize)> = hour_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(hour, &count)| (hour as u32, count))
            .collect();
        active.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        active
            .into_iter()
            .take(self.top_n)
            .map(|(hour, _)| hour_window_label(hour))
            .collect()
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::from_config(&StatsConfig::default())
    }
}

/// Format an hour bucket as a half-open range label, e.g. `"9–10h"`.
pub fn hour_window_label(hour: u32) -> String {
    format!("{}–{}h", hour, hour + 1)
}
