//! cm-profile — Build a trader behavioral profile from a fill file.
//!
//! Reads fills (fixture records or a saved exchange `userFills` response),
//! keeps the lookback window, groups sessions, aggregates stats, detects
//! strategy labels and prints the profile as pretty JSON on stdout.
//!
//! Usage:
//!   cm-profile --fills fills.json --address 0xabc --lookback-days 30
//!   cm-profile --fills user_fills.json --format hyperliquid --now 2024-02-01T00:00:00Z

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};

use cm_core::config::ProfileConfig;
use cm_core::types::Timestamp;
use cm_ingest::{filter_lookback, load_fixture, load_user_fills, LookbackWindow};
use cm_profiler::Profiler;

/// Input file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// JSON array of normalized fill records tagged by `hl_address`.
    Fixture,
    /// Saved exchange `userFills` response.
    Hyperliquid,
}

#[derive(Parser, Debug)]
#[command(name = "cm-profile", about = "Trader behavioral profile from fills")]
struct Args {
    /// Path to the fills JSON file.
    #[arg(long)]
    fills: PathBuf,

    /// Layout of the fills file.
    #[arg(long, value_enum, default_value_t = InputFormat::Fixture)]
    format: InputFormat,

    /// Wallet address to profile. Fixture rows for other addresses are
    /// dropped; with no address every row is kept.
    #[arg(long)]
    address: Option<String>,

    /// Lookback in days (overrides `ingest.lookback_days`).
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Reference time for the lookback window, RFC 3339. Defaults to now.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON logs instead of pretty logs.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ProfileConfig::load(args.config.clone())?;

    cm_core::logging::init_tracing(args.json_logs);

    let now = args.now.map(Timestamp::from_datetime).unwrap_or_else(Timestamp::now);
    let lookback_days = args.lookback_days.unwrap_or(config.ingest.lookback_days);
    let window = LookbackWindow::trailing(now, lookback_days);

    tracing::info!(
        fills = %args.fills.display(),
        format = ?args.format,
        address = ?args.address,
        lookback_days,
        from = %window.from,
        to = %window.to,
        "starting cm-profile"
    );

    let fills = match args.format {
        InputFormat::Fixture => load_fixture(&args.fills, args.address.as_deref(), window.from)
            .context("failed to load fixture fills")?,
        InputFormat::Hyperliquid => {
            let fills = load_user_fills(&args.fills).context("failed to load userFills dump")?;
            filter_lookback(fills, now, lookback_days)
        }
    };

    let profile = Profiler::from_config(&config).profile(fills, args.address, Some(window));

    tracing::info!(
        fills = profile.fill_count,
        sessions = profile.session_count,
        strategies = profile.strategies.len(),
        "profile complete"
    );

    let json = serde_json::to_string_pretty(&profile).context("failed to serialize profile")?;
    println!("{json}");
    Ok(())
}
