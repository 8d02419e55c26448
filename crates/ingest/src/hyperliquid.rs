//! Hyperliquid `userFills` wire-format types.
//!
//! These map directly to the JSON objects returned by the exchange info
//! endpoint for `{"type": "userFills"}`. Decimals arrive as strings and are
//! parsed during conversion into the normalized [`Fill`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use cm_core::types::{Fill, Side, Timestamp};

use crate::error::{parse_decimal, IngestError};

/// One fill as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperliquidFill {
    /// Asset name (e.g., "BTC").
    pub coin: String,
    /// Execution price as a string.
    pub px: String,
    /// Executed size as a string.
    pub sz: String,
    /// Book side: "B" (bid, buy) or "A" (ask, sell).
    pub side: String,
    /// Direction, e.g. "Open Long", "Close Short".
    #[serde(default)]
    pub dir: String,
    /// Realized PnL as a string.
    #[serde(default = "zero_string")]
    pub closed_pnl: String,
    /// Execution time in milliseconds.
    pub time: i64,
    /// Transaction hash.
    #[serde(default)]
    pub hash: String,
    /// Order ID.
    #[serde(default)]
    pub oid: u64,
    /// Trade ID.
    #[serde(default)]
    pub tid: u64,
    /// Fee paid as a string.
    #[serde(default = "zero_string")]
    pub fee: String,
    /// Token the fee was paid in.
    #[serde(default)]
    pub fee_token: String,
    /// Whether the fill crossed the spread.
    #[serde(default)]
    pub crossed: bool,
    /// Position size before this fill, as a string.
    #[serde(default = "zero_string")]
    pub start_position: String,
    /// Builder fee, when a builder routed the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_fee: Option<String>,
}

fn zero_string() -> String {
    "0".to_string()
}

impl HyperliquidFill {
    /// `true` for a long-opening/closing direction or a bid-side fill.
    pub fn is_buy(&self) -> bool {
        self.dir.contains("Long") || self.side == "B"
    }

    /// Convert to a normalized [`Fill`].
    ///
    /// Leverage is not reported per fill, so it stays unknown.
    pub fn to_fill(&self) -> Result<Fill, IngestError> {
        let price = parse_decimal("px", &self.px)?;
        let quantity = parse_decimal("sz", &self.sz)?;
        let pnl = parse_decimal("closedPnl", &self.closed_pnl)?;
        let side = if self.is_buy() { Side::Buy } else { Side::Sell };

        Ok(Fill::new(
            self.coin.as_str(),
            side,
            price,
            quantity,
            Timestamp::from_millis(self.time),
        )
        .with_realized_pnl(pnl))
    }
}

impl TryFrom<&HyperliquidFill> for Fill {
    type Error = IngestError;

    fn try_from(hl: &HyperliquidFill) -> Result<Self, Self::Error> {
        hl.to_fill()
    }
}

/// Parse a `userFills` JSON array into normalized fills.
pub fn parse_user_fills(json: &str) -> Result<Vec<Fill>, IngestError> {
    let raw: Vec<HyperliquidFill> = serde_json::from_str(json)?;
    let fills = raw
        .iter()
        .map(HyperliquidFill::to_fill)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = fills.len(), "parsed userFills payload");
    Ok(fills)
}

/// Read and parse a saved `userFills` response.
pub fn load_user_fills(path: &Path) -> Result<Vec<Fill>, IngestError> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_user_fills(&json)
}
