//! Market concentration rules: focused market and diversified.

use std::collections::HashSet;

use cm_core::config::StrategyConfig;

use crate::traits::{whole_percent, RuleContext, Strategy, StrategyRule};

/// Fires when most sessions happen in the single most-traded market.
#[derive(Debug, Clone)]
pub struct FocusedMarketRule {
    /// Required share of sessions in the top market (strictly greater), in percent.
    pub majority_pct: f64,
}

impl FocusedMarketRule {
    /// Label emitted by this rule.
    pub const NAME: &'static str = "Focused market";

    /// Build from the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            majority_pct: config.majority_pct,
        }
    }
}

impl StrategyRule for FocusedMarketRule {
    fn name(&self) -> &str {
        "focused_market"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy> {
        let top = ctx.stats.top_markets.first()?;
        let pct = ctx.share_pct(|s| &s.market == top);
        if pct <= self.majority_pct {
            return None;
        }
        Some(Strategy::new(
            Self::NAME,
            format!("{}% of sessions in {}", whole_percent(pct), top),
        ))
    }
}

/// Fires when activity spans many markets over enough sessions.
#[derive(Debug, Clone)]
pub struct DiversifiedRule {
    /// Minimum distinct markets.
    pub min_markets: usize,
    /// Minimum session count.
    pub min_sessions: usize,
}

impl DiversifiedRule {
    /// Label emitted by this rule.
    pub const NAME: &'static str = "Diversified";

    /// Build from the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            min_markets: config.diversified_markets,
            min_sessions: config.diversified_sessions,
        }
    }
}

impl StrategyRule for DiversifiedRule {
    fn name(&self) -> &str {
        "diversified"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy> {
        let distinct: HashSet<_> = ctx.sessions.iter().map(|s| &s.market).collect();
        if distinct.len() < self.min_markets || ctx.session_count() < self.min_sessions {
            return None;
        }
        Some(Strategy::new(
            Self::NAME,
            format!("Trades across {} different markets", distinct.len()),
        ))
    }
}
