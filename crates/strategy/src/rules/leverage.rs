//! High-leverage rule.

use cm_core::config::StrategyConfig;

use crate::traits::{whole_percent, RuleContext, Strategy, StrategyRule};

/// Fires when most sessions ran above a leverage multiple.
///
/// Sessions with unknown leverage count toward the denominator but never
/// toward the numerator.
#[derive(Debug, Clone)]
pub struct HighLeverageRule {
    /// Leverage strictly above this counts as high.
    pub threshold: f64,
    /// Required share of high-leverage sessions (strictly greater), in percent.
    pub majority_pct: f64,
}

impl HighLeverageRule {
    /// Label emitted by this rule.
    pub const NAME: &'static str = "High leverage";

    /// Build from the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            threshold: config.high_leverage,
            majority_pct: config.leverage_majority_pct,
        }
    }
}

impl StrategyRule for HighLeverageRule {
    fn name(&self) -> &str {
        "high_leverage"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy> {
        let pct = ctx.share_pct(|s| s.known_leverage().is_some_and(|l| l > self.threshold));
        if pct <= self.majority_pct {
            return None;
        }
        Some(Strategy::new(
            Self::NAME,
            format!(
                "{}% of sessions use >{}x leverage",
                whole_percent(pct),
                self.threshold
            ),
        ))
    }
}
