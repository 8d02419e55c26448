//! Fixture files of normalized fill records.
//!
//! A fixture is a JSON array of objects shaped like
//! `{id, user_id?, hl_address, market, side, price, qty, notional_usd,
//! leverage?, pnl_usd?, ts}` with `ts` in RFC 3339. Fills for several
//! wallets may share one file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cm_core::types::{Fill, Side, Timestamp};

use crate::error::IngestError;

/// One fixture record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureFill {
    /// Record identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Owning user, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Wallet address the fill belongs to.
    pub hl_address: String,
    pub market: String,
    pub side: Side,
    pub price: f64,
    pub qty: f64,
    /// USD notional as recorded (may be signed).
    pub notional_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl_usd: Option<f64>,
    /// Execution time.
    pub ts: DateTime<Utc>,
}

impl From<&FixtureFill> for Fill {
    fn from(ff: &FixtureFill) -> Self {
        Fill {
            market: ff.market.as_str().into(),
            side: ff.side,
            price: ff.price,
            quantity: ff.qty,
            notional: ff.notional_usd,
            leverage: ff.leverage,
            realized_pnl: ff.pnl_usd,
            timestamp: Timestamp::from_datetime(ff.ts),
        }
    }
}

/// Parse a fixture array.
///
/// Rows that do not match the record shape are skipped with a warning; a
/// payload that is not a JSON array is an error.
pub fn parse_fixture(json: &str) -> Result<Vec<FixtureFill>, IngestError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = rows.len();

    let mut records = Vec::with_capacity(total);
    for (idx, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<FixtureFill>(row) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(row = idx, error = %e, "skipping malformed fixture row"),
        }
    }

    if records.len() < total {
        tracing::warn!(
            skipped = total - records.len(),
            total,
            "fixture contained malformed rows"
        );
    }
    Ok(records)
}

/// Load fills from a fixture file.
///
/// Keeps records whose `hl_address` equals `address` (all records when
/// `address` is `None`) and whose timestamp is at or after `cutoff`.
pub fn load_fixture(
    path: &Path,
    address: Option<&str>,
    cutoff: Timestamp,
) -> Result<Vec<Fill>, IngestError> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_fixture(&json)?;
    let fills: Vec<Fill> = records
        .iter()
        .filter(|r| address.map_or(true, |a| r.hl_address == a))
        .map(Fill::from)
        .filter(|f| f.timestamp >= cutoff)
        .collect();

    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        kept = fills.len(),
        "loaded fixture"
    );
    Ok(fills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = r#"[
        {"id": "f1", "user_id": "u1", "hl_address": "0xaaa", "market": "BTC", "side": "buy",
         "price": 43000.0, "qty": 0.1, "notional_usd": 4300.0, "leverage": 10,
         "pnl_usd": 25.0, "ts": "2024-01-10T09:15:00Z"},
        {"id": "f2", "hl_address": "0xaaa", "market": "ETH", "side": "sell",
         "price": 2300.0, "qty": 1.0, "notional_usd": 2300.0,
         "ts": "2024-01-20T14:00:00Z"},
        {"id": "f3", "hl_address": "0xbbb", "market": "SOL", "side": "buy",
         "price": 100.0, "qty": 5.0, "notional_usd": 500.0,
         "ts": "2024-01-21T14:00:00Z"}
    ]"#;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn ts(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(rfc3339.parse::<DateTime<Utc>>().unwrap())
    }

    #[test]
    fn test_record_to_fill() {
        let records = parse_fixture(FIXTURE).unwrap();
        let fill = Fill::from(&records[0]);
        assert_eq!(fill.market.as_str(), "BTC");
        assert_eq!(fill.side, Side::Buy);
        assert_eq!(fill.notional, 4300.0);
        assert_eq!(fill.leverage, Some(10.0));
        assert_eq!(fill.realized_pnl, Some(25.0));
        assert_eq!(fill.timestamp, ts("2024-01-10T09:15:00Z"));

        let bare = Fill::from(&records[1]);
        assert_eq!(bare.leverage, None);
        assert_eq!(bare.realized_pnl, None);
    }

    #[test]
    fn test_load_filters_by_address() {
        let file = write_fixture(FIXTURE);
        let fills = load_fixture(file.path(), Some("0xaaa"), Timestamp(0)).unwrap();
        assert_eq!(fills.len(), 2);
        assert!(fills.iter().all(|f| f.market.as_str() != "SOL"));
    }

    #[test]
    fn test_load_without_address_keeps_all() {
        let file = write_fixture(FIXTURE);
        let fills = load_fixture(file.path(), None, Timestamp(0)).unwrap();
        assert_eq!(fills.len(), 3);
    }

    #[test]
    fn test_load_cutoff_is_inclusive() {
        let file = write_fixture(FIXTURE);
        let fills = load_fixture(file.path(), Some("0xaaa"), ts("2024-01-20T14:00:00Z")).unwrap();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].market.as_str(), "ETH");
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let json = r#"[
            {"hl_address": "0xaaa", "market": "BTC", "side": "buy", "price": 1.0,
             "qty": 1.0, "notional_usd": 1.0, "ts": "2024-01-10T09:15:00Z"},
            {"hl_address": "0xaaa", "market": "BTC", "side": "hold"},
            {"hl_address": "0xaaa", "market": "BTC", "side": "sell", "price": 1.0,
             "qty": 1.0, "notional_usd": 1.0, "ts": "yesterday"}
        ]"#;
        let records = parse_fixture(json).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_non_array_is_error() {
        assert!(matches!(
            parse_fixture(r#"{"fills": []}"#),
            Err(IngestError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_fixture(Path::new("/nonexistent/fixture.json"), None, Timestamp(0))
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
