//! A contiguous burst of trading activity in one market.

use serde::Serialize;

use cm_core::types::*;

/// One trading session: same-market fills with no gap above the threshold.
///
/// Aggregates are maintained incrementally as fills are appended, so a
/// session is always consistent with its `fills` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Market shared by every constituent fill.
    pub market: Market,
    /// Timestamp of the first fill.
    pub start_time: Timestamp,
    /// Timestamp of the most recent fill.
    pub end_time: Timestamp,
    /// `end_time - start_time` in minutes.
    pub duration_minutes: f64,
    /// Running sum of `abs(notional)`.
    pub position_size_usd: f64,
    /// Running sum of realized PnL (absent counted as zero).
    pub pnl_usd: f64,
    /// Last known (non-zero) leverage seen in this session.
    pub leverage: Option<f64>,
    /// Constituent fills in insertion order.
    pub fills: Vec<Fill>,
}

impl Session {
    /// Open a new session whose sole member is `fill`.
    pub fn open(fill: Fill) -> Self {
        Self {
            market: fill.market.clone(),
            start_time: fill.timestamp,
            end_time: fill.timestamp,
            duration_minutes: 0.0,
            position_size_usd: fill.notional.abs(),
            pnl_usd: fill.pnl_or_zero(),
            leverage: fill.known_leverage(),
            fills: vec![fill],
        }
    }

    /// Append a fill and update every running aggregate.
    ///
    /// Leverage is sticky: a fill with unknown or zero leverage leaves the
    /// previously observed value in place.
    pub fn push(&mut self, fill: Fill) {
        debug_assert_eq!(fill.market, self.market);

        self.end_time = fill.timestamp;
        self.duration_minutes = self.end_time.minutes_since(&self.start_time);
        self.position_size_usd += fill.notional.abs();
        self.pnl_usd += fill.pnl_or_zero();
        if let Some(leverage) = fill.known_leverage() {
            self.leverage = Some(leverage);
        }
        self.fills.push(fill);
    }

    /// Leverage if known and positive.
    pub fn known_leverage(&self) -> Option<f64> {
        self.leverage.filter(|l| *l > 0.0)
    }

    /// Number of fills in the session.
    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }

    /// `true` if the session closed with positive realized PnL.
    pub fn is_winning(&self) -> bool {
        self.pnl_usd > 0.0
    }
}
