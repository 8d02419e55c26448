//! Trailing lookback window over fills.

use serde::{Deserialize, Serialize};

use cm_core::types::{Fill, Timestamp, MILLIS_PER_MINUTE};

const MILLIS_PER_DAY: i64 = 24 * 60 * MILLIS_PER_MINUTE;

/// Time window a profile covers; `from` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    /// Earliest included timestamp.
    pub from: Timestamp,
    /// Reference time the window trails.
    pub to: Timestamp,
}

impl LookbackWindow {
    /// Window covering the `days` days before `now`.
    pub fn trailing(now: Timestamp, days: u32) -> Self {
        Self {
            from: now.saturating_add_millis(-(i64::from(days) * MILLIS_PER_DAY)),
            to: now,
        }
    }

    /// `true` if `ts` is at or after the window start.
    ///
    /// Fills after `to` are kept: exchange clocks can run slightly ahead.
    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.from
    }
}

/// Keep fills with a timestamp at or after `now - days`.
pub fn filter_lookback(fills: Vec<Fill>, now: Timestamp, days: u32) -> Vec<Fill> {
    let window = LookbackWindow::trailing(now, days);
    let before = fills.len();
    let kept: Vec<Fill> = fills
        .into_iter()
        .filter(|f| window.contains(f.timestamp))
        .collect();
    tracing::debug!(before, kept = kept.len(), days, "applied lookback filter");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_core::types::Side;

    fn fill_at(ms: i64) -> Fill {
        Fill::new("BTC", Side::Buy, 1.0, 1.0, Timestamp(ms))
    }

    #[test]
    fn test_trailing_window() {
        let now = Timestamp(40 * MILLIS_PER_DAY);
        let window = LookbackWindow::trailing(now, 30);
        assert_eq!(window.from, Timestamp(10 * MILLIS_PER_DAY));
        assert_eq!(window.to, now);
    }

    #[test]
    fn test_filter_boundary_inclusive() {
        let now = Timestamp(40 * MILLIS_PER_DAY);
        let cutoff = 10 * MILLIS_PER_DAY;
        let fills = vec![fill_at(cutoff - 1), fill_at(cutoff), fill_at(cutoff + 1)];
        let kept = filter_lookback(fills, now, 30);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].timestamp, Timestamp(cutoff));
    }

    #[test]
    fn test_filter_keeps_future_fills() {
        let now = Timestamp(40 * MILLIS_PER_DAY);
        let kept = filter_lookback(vec![fill_at(41 * MILLIS_PER_DAY)], now, 30);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_zero_days_keeps_only_now_onwards() {
        let now = Timestamp(1_000);
        let kept = filter_lookback(vec![fill_at(999), fill_at(1_000)], now, 0);
        assert_eq!(kept.len(), 1);
    }
}
