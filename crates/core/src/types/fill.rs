//! Fill-related types: market identifier, side, and the normalized fill record.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp::Timestamp;

/// Order side of an executed leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy / long.
    Buy,
    /// Sell / short.
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Instrument identifier (e.g., "BTC", "ETH-PERP").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Market(pub String);

impl Market {
    /// Create a new market identifier.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Market {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Market {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One executed trade leg, normalized from any fill source.
///
/// Optional numeric fields follow the upstream contract: a missing
/// `realized_pnl` counts as zero, and a missing or zero `leverage` means the
/// leverage is unknown (not 1x).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Instrument this leg traded.
    pub market: Market,
    /// Buy or sell.
    pub side: Side,
    /// Execution price.
    pub price: f64,
    /// Executed quantity (always positive).
    pub quantity: f64,
    /// USD value of the leg. May be signed by the source.
    pub notional: f64,
    /// Leverage multiple, if the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    /// Realized PnL in USD, if the leg closed exposure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<f64>,
    /// Execution time.
    pub timestamp: Timestamp,
}

impl Fill {
    /// Create a fill with `notional = price × quantity` and no optional fields.
    pub fn new(
        market: impl Into<Market>,
        side: Side,
        price: f64,
        quantity: f64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            market: market.into(),
            side,
            price,
            quantity,
            notional: price * quantity,
            leverage: None,
            realized_pnl: None,
            timestamp,
        }
    }

    /// Set the reported leverage.
    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.leverage = Some(leverage);
        self
    }

    /// Set the realized PnL.
    pub fn with_realized_pnl(mut self, pnl: f64) -> Self {
        self.realized_pnl = Some(pnl);
        self
    }

    /// Override the notional (e.g., when the source supplies a signed value).
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Leverage if it is a known, positive, finite number.
    pub fn known_leverage(&self) -> Option<f64> {
        self.leverage.filter(|l| l.is_finite() && *l > 0.0)
    }

    /// Realized PnL with absent treated as zero.
    pub fn pnl_or_zero(&self) -> f64 {
        self.realized_pnl.unwrap_or(0.0)
    }
}
