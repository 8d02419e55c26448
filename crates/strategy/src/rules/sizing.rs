//! Position sizing consistency rule.

use cm_core::config::StrategyConfig;
use cm_stats::math::{mean, population_stdev};

use crate::traits::{whole_percent, RuleContext, Strategy, StrategyRule};

/// Fires when session sizes are tightly clustered: population standard
/// deviation below `max_cv` times the mean.
#[derive(Debug, Clone)]
pub struct SimilarSizingRule {
    /// Maximum stdev / mean ratio (exclusive).
    pub max_cv: f64,
}

impl SimilarSizingRule {
    /// Label emitted by this rule.
    pub const NAME: &'static str = "Similar sizing";

    /// Build from the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            max_cv: config.sizing_cv_max,
        }
    }
}

impl StrategyRule for SimilarSizingRule {
    fn name(&self) -> &str {
        "similar_sizing"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy> {
        if ctx.session_count() <= 1 {
            return None;
        }
        let sizes: Vec<f64> = ctx.sessions.iter().map(|s| s.position_size_usd).collect();
        let avg = mean(&sizes);
        if avg <= 0.0 {
            return None;
        }
        let stdev = population_stdev(&sizes);
        if stdev >= self.max_cv * avg {
            return None;
        }
        Some(Strategy::new(
            Self::NAME,
            format!(
                "Low variance in position sizes (stdev {}% of mean)",
                whole_percent(stdev / avg * 100.0)
            ),
        ))
    }
}
