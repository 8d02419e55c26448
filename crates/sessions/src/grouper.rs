//! Inactivity-gap session grouping.
//!
//! Fills are processed in timestamp order. Each market has at most one open
//! session at a time; a fill joins it when the gap to the session's last fill
//! is within the threshold, otherwise it opens a fresh session and the old
//! one is finalized. Lookup is keyed by market, so grouping is O(n) after the
//! initial sort and never rescans finalized sessions.

use std::collections::HashMap;

use cm_core::config::SessionConfig;
use cm_core::types::*;

use crate::session::Session;

/// Default inactivity threshold: 45 minutes.
pub const DEFAULT_GAP_MINUTES: u64 = 45;

/// Groups fills into per-market sessions.
///
/// Holds only the gap policy. All grouping state lives inside a single
/// [`group`](SessionGrouper::group) call, so one grouper can be reused across
/// traders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGrouper {
    /// Maximum inactivity gap in milliseconds (inclusive).
    gap_ms: i64,
}

impl SessionGrouper {
    /// Create a grouper with the given inactivity gap in minutes.
    pub fn new(gap_minutes: u64) -> Self {
        let gap_ms = i64::try_from(gap_minutes)
            .unwrap_or(i64::MAX)
            .saturating_mul(MILLIS_PER_MINUTE);
        Self { gap_ms }
    }

    /// Create a grouper from the `[sessions]` configuration section.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.gap_minutes)
    }

    /// The inactivity gap in milliseconds.
    pub fn gap_millis(&self) -> i64 {
        self.gap_ms
    }

    /// Partition `fills` into sessions ordered by start time.
    ///
    /// Input order does not matter: fills are stable-sorted by timestamp
    /// first, so equal timestamps keep their input order. Empty input yields
    /// an empty list.
    pub fn group(&self, mut fills: Vec<Fill>) -> Vec<Session> {
        if fills.is_empty() {
            return Vec::new();
        }

        let fill_count = fills.len();
        fills.sort_by_key(|f| f.timestamp);

        let mut sessions: Vec<Session> = Vec::new();
        // Market -> index of its open session in `sessions`.
        let mut open: HashMap<Market, usize> = HashMap::new();

        for fill in fills {
            let joinable = open.get(&fill.market).copied().filter(|&idx| {
                fill.timestamp.as_millis() - sessions[idx].end_time.as_millis() <= self.gap_ms
            });

            match joinable {
                Some(idx) => sessions[idx].push(fill),
                None => {
                    open.insert(fill.market.clone(), sessions.len());
                    sessions.push(Session::open(fill));
                }
            }
        }

        // Sessions are opened in chronological order, so `sessions` is
        // already sorted by start time; ties keep creation order.
        debug_assert!(sessions
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time));

        tracing::debug!(
            fills = fill_count,
            sessions = sessions.len(),
            markets = open.len(),
            gap_ms = self.gap_ms,
            "grouped fills into sessions"
        );

        sessions
    }
}

impl Default for SessionGrouper {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = MILLIS_PER_MINUTE;

    fn fill_at(market: &str, ms: i64) -> Fill {
        Fill::new(market, Side::Buy, 100.0, 1.0, Timestamp(ms))
    }

    fn markets(sessions: &[Session]) -> Vec<&str> {
        sessions.iter().map(|s| s.market.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(SessionGrouper::default().group(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_fill_session() {
        let sessions =
            SessionGrouper::default().group(vec![fill_at("BTC", 0).with_realized_pnl(7.0)]);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_minutes, 0.0);
        assert_eq!(sessions[0].pnl_usd, 7.0);
    }

    #[test]
    fn test_gap_exactly_45_minutes_merges() {
        let sessions =
            SessionGrouper::default().group(vec![fill_at("BTC", 0), fill_at("BTC", 45 * MIN)]);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_minutes, 45.0);
    }

    #[test]
    fn test_gap_45_minutes_and_one_second_splits() {
        let sessions = SessionGrouper::default()
            .group(vec![fill_at("BTC", 0), fill_at("BTC", 45 * MIN + 1_000)]);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].fill_count(), 1);
        assert_eq!(sessions[1].fill_count(), 1);
    }

    #[test]
    fn test_gap_measured_from_last_fill_not_start() {
        // Each step is 30 minutes; total span 90 minutes stays one session.
        let fills = (0..4).map(|i| fill_at("ETH", i * 30 * MIN)).collect();
        let sessions = SessionGrouper::default().group(fills);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration_minutes, 90.0);
    }

    #[test]
    fn test_markets_tracked_independently() {
        let fills = vec![
            fill_at("BTC", 0),
            fill_at("ETH", 10 * MIN),
            fill_at("BTC", 40 * MIN),
            fill_at("ETH", 100 * MIN),
        ];
        let sessions = SessionGrouper::default().group(fills);
        assert_eq!(markets(&sessions), vec!["BTC", "ETH", "ETH"]);
        assert_eq!(sessions[0].fill_count(), 2);
    }

    #[test]
    fn test_finalized_session_not_revisited() {
        // Third fill is within 45m of the first session's start but the
        // market's open session is now the second one.
        let fills = vec![
            fill_at("BTC", 0),
            fill_at("BTC", 60 * MIN),
            fill_at("BTC", 70 * MIN),
        ];
        let sessions = SessionGrouper::default().group(fills);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].fill_count(), 1);
        assert_eq!(sessions[1].fill_count(), 2);
    }

    #[test]
    fn test_out_of_order_input_sorted() {
        let fills = vec![
            fill_at("SOL", 50 * MIN),
            fill_at("BTC", 0),
            fill_at("SOL", 20 * MIN),
        ];
        let sessions = SessionGrouper::default().group(fills);
        assert_eq!(markets(&sessions), vec!["BTC", "SOL"]);
        assert_eq!(sessions[1].start_time, Timestamp(20 * MIN));
        assert_eq!(sessions[1].end_time, Timestamp(50 * MIN));
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let a = fill_at("BTC", 0).with_realized_pnl(1.0);
        let b = fill_at("BTC", 0).with_realized_pnl(2.0);
        let sessions = SessionGrouper::default().group(vec![a.clone(), b.clone()]);
        assert_eq!(sessions[0].fills, vec![a, b]);
    }

    #[test]
    fn test_permutation_invariance() {
        let base = vec![
            fill_at("BTC", 0).with_realized_pnl(5.0),
            fill_at("ETH", 5 * MIN).with_leverage(10.0),
            fill_at("BTC", 10 * MIN).with_notional(-30.0),
            fill_at("BTC", 120 * MIN),
            fill_at("ETH", 30 * MIN).with_realized_pnl(-1.0),
            fill_at("SOL", 200 * MIN),
        ];
        let expected = SessionGrouper::default().group(base.clone());

        let mut reversed = base.clone();
        reversed.reverse();
        assert_eq!(SessionGrouper::default().group(reversed), expected);

        for k in 1..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(k);
            assert_eq!(SessionGrouper::default().group(rotated), expected);
        }
    }

    #[test]
    fn test_custom_gap() {
        let grouper = SessionGrouper::new(10);
        assert_eq!(grouper.gap_millis(), 10 * MIN);
        let sessions = grouper.group(vec![fill_at("BTC", 0), fill_at("BTC", 11 * MIN)]);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_from_config() {
        let cfg = SessionConfig { gap_minutes: 5 };
        assert_eq!(SessionGrouper::from_config(&cfg), SessionGrouper::new(5));
    }

    #[test]
    fn test_every_fill_in_exactly_one_session() {
        let fills: Vec<Fill> = (0..50)
            .map(|i| fill_at(["BTC", "ETH", "SOL"][i % 3], (i as i64) * 17 * MIN))
            .collect();
        let sessions = SessionGrouper::default().group(fills.clone());
        let total: usize = sessions.iter().map(Session::fill_count).sum();
        assert_eq!(total, fills.len());
        for s in &sessions {
            assert!(s.fills.iter().all(|f| f.market == s.market));
            assert!(s
                .fills
                .iter()
                .all(|f| f.timestamp >= s.start_time && f.timestamp <= s.end_time));
        }
    }
}
