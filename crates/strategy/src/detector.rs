//! Strategy detector: runs every registered rule in insertion order.

use cm_core::config::StrategyConfig;
use cm_sessions::Session;
use cm_stats::TradingStats;

use crate::rules::*;
use crate::traits::{RuleContext, Strategy, StrategyRule};

/// Ordered collection of [`StrategyRule`]s.
///
/// Rules are evaluated independently; every rule that fires contributes one
/// label, in registration order.
pub struct StrategyDetector {
    rules: Vec<Box<dyn StrategyRule>>,
}

impl StrategyDetector {
    /// Create a detector with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a detector with the six built-in rules, thresholds taken from
    /// the `[strategies]` configuration section.
    pub fn from_config(config: &StrategyConfig) -> Self {
        let mut detector = Self::new();
        detector.add_rule(QuickInOutRule::from_config(config));
        detector.add_rule(HoldLongerRule::from_config(config));
        detector.add_rule(FocusedMarketRule::from_config(config));
        detector.add_rule(SimilarSizingRule::from_config(config));
        detector.add_rule(HighLeverageRule::from_config(config));
        detector.add_rule(DiversifiedRule::from_config(config));
        detector
    }

    /// Append a rule to the end of the evaluation order.
    pub fn add_rule(&mut self, rule: impl StrategyRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Names of the registered rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate every rule and collect the labels that fired.
    ///
    /// Returns an empty list when `sessions` is empty.
    pub fn detect(&self, sessions: &[Session], stats: &TradingStats) -> Vec<Strategy> {
        if sessions.is_empty() {
            return Vec::new();
        }

        let ctx = RuleContext::new(sessions, stats);
        let mut fired = Vec::new();
        for rule in &self.rules {
            if let Some(strategy) = rule.evaluate(&ctx) {
                tracing::debug!(rule = rule.name(), reason = %strategy.reason, "strategy rule fired");
                fired.push(strategy);
            }
        }
        fired
    }
}

impl Default for StrategyDetector {
    fn default() -> Self {
        Self::from_config(&StrategyConfig::default())
    }
}
