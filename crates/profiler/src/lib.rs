//! # cm-profiler
//!
//! Runs the full profiling pipeline over one trader's fills:
//!
//! ```text
//! Vec<Fill> → SessionGrouper → Vec<Session>
//!           → StatsAggregator → TradingStats
//!           → StrategyDetector → Vec<Strategy>
//! ```
//!
//! and packages the result as a serializable [`TraderProfile`]. The pipeline
//! is pure: identical fills and configuration always yield an identical
//! profile.

use serde::{Deserialize, Serialize};

use cm_core::config::ProfileConfig;
use cm_core::types::Fill;
use cm_ingest::LookbackWindow;
use cm_sessions::SessionGrouper;
use cm_stats::{StatsAggregator, TradingStats};
use cm_strategy::{Strategy, StrategyDetector};

/// Behavioral profile of one trader over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderProfile {
    /// Trader identifier (wallet address), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Lookback window the fills were drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<LookbackWindow>,
    pub session_count: usize,
    pub fill_count: usize,
    pub stats: TradingStats,
    pub strategies: Vec<Strategy>,
}

/// The three pipeline stages, configured once and reusable across traders.
pub struct Profiler {
    grouper: SessionGrouper,
    aggregator: StatsAggregator,
    detector: StrategyDetector,
}

impl Profiler {
    /// Assemble from explicit stages.
    pub fn new(
        grouper: SessionGrouper,
        aggregator: StatsAggregator,
        detector: StrategyDetector,
    ) -> Self {
        Self {
            grouper,
            aggregator,
            detector,
        }
    }

    /// Build every stage from configuration.
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self::new(
            SessionGrouper::from_config(&config.sessions),
            StatsAggregator::from_config(&config.stats),
            StrategyDetector::from_config(&config.strategies),
        )
    }

    /// Run the pipeline over `fills`.
    pub fn profile(
        &self,
        fills: Vec<Fill>,
        address: Option<String>,
        window: Option<LookbackWindow>,
    ) -> TraderProfile {
        let fill_count = fills.len();
        let sessions = self.grouper.group(fills);
        let stats = self.aggregator.aggregate(&sessions);
        let strategies = self.detector.detect(&sessions, &stats);

        tracing::debug!(
            fills = fill_count,
            sessions = sessions.len(),
            strategies = strategies.len(),
            "built trader profile"
        );

        TraderProfile {
            address,
            window,
            session_count: sessions.len(),
            fill_count,
            stats,
            strategies,
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::from_config(&ProfileConfig::default())
    }
}

/// Build a profile with a one-off [`Profiler`] from `config`.
pub fn build_profile(
    fills: Vec<Fill>,
    config: &ProfileConfig,
    address: Option<String>,
    window: Option<LookbackWindow>,
) -> TraderProfile {
    Profiler::from_config(config).profile(fills, address, window)
}
