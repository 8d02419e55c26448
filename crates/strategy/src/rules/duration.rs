//! Holding-time rules: quick in/out and hold-a-bit-longer.

use cm_core::config::StrategyConfig;

use crate::traits::{whole_percent, RuleContext, Strategy, StrategyRule};

/// Fires when most sessions are shorter than `max_minutes`.
#[derive(Debug, Clone)]
pub struct QuickInOutRule {
    /// Sessions strictly shorter than this count as quick.
    pub max_minutes: f64,
    /// Required share of quick sessions (strictly greater), in percent.
    pub majority_pct: f64,
}

impl QuickInOutRule {
    /// Label emitted by this rule.
    pub const NAME: &'static str = "Quick in/out";

    /// Build from the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            max_minutes: config.quick_max_minutes,
            majority_pct: config.majority_pct,
        }
    }
}

impl StrategyRule for QuickInOutRule {
    fn name(&self) -> &str {
        "quick_in_out"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy> {
        let pct = ctx.share_pct(|s| s.duration_minutes < self.max_minutes);
        if pct <= self.majority_pct {
            return None;
        }
        Some(Strategy::new(
            Self::NAME,
            format!(
                "{}% of sessions last < {} min",
                whole_percent(pct),
                self.max_minutes
            ),
        ))
    }
}

/// Fires when most sessions last between `min_minutes` and `max_minutes`
/// (both inclusive).
#[derive(Debug, Clone)]
pub struct HoldLongerRule {
    /// Lower bound of the band.
    pub min_minutes: f64,
    /// Upper bound of the band.
    pub max_minutes: f64,
    /// Required share of in-band sessions (strictly greater), in percent.
    pub majority_pct: f64,
}

impl HoldLongerRule {
    /// Label emitted by this rule.
    pub const NAME: &'static str = "Hold a bit longer";

    /// Build from the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            min_minutes: config.quick_max_minutes,
            max_minutes: config.hold_max_minutes,
            majority_pct: config.majority_pct,
        }
    }
}

impl StrategyRule for HoldLongerRule {
    fn name(&self) -> &str {
        "hold_longer"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy> {
        let pct = ctx.share_pct(|s| {
            s.duration_minutes >= self.min_minutes && s.duration_minutes <= self.max_minutes
        });
        if pct <= self.majority_pct {
            return None;
        }
        Some(Strategy::new(
            Self::NAME,
            format!(
                "{}% of sessions last {}–{} min",
                whole_percent(pct),
                self.min_minutes,
                self.max_minutes
            ),
        ))
    }
}
