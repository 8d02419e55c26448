//! Strategy label type and the rule trait.

use serde::{Deserialize, Serialize};

use cm_sessions::Session;
use cm_stats::math::percentage;
use cm_stats::TradingStats;

/// A matched trading-style heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    /// Label, e.g. "Quick in/out".
    pub name: String,
    /// Justification carrying the figure that triggered the rule.
    pub reason: String,
}

impl Strategy {
    /// Create a new strategy label.
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Inputs available to every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// All sessions, ordered by start time. Never empty when a rule runs.
    pub sessions: &'a [Session],
    /// Stats aggregated from the same sessions.
    pub stats: &'a TradingStats,
}

impl<'a> RuleContext<'a> {
    /// Create a context over the given sessions and stats.
    pub fn new(sessions: &'a [Session], stats: &'a TradingStats) -> Self {
        Self { sessions, stats }
    }

    /// Number of sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Percentage (0–100) of sessions matching `pred`; `0` with no sessions.
    pub fn share_pct<F>(&self, pred: F) -> f64
    where
        F: Fn(&Session) -> bool,
    {
        let hits = self.sessions.iter().filter(|s| pred(s)).count();
        percentage(hits, self.sessions.len())
    }
}

/// Trait for individual strategy heuristics.
///
/// Rules are independent: each one sees the full context and either emits a
/// label or returns `None`. A rule whose inputs are missing (e.g., no
/// leverage data) simply does not fire.
pub trait StrategyRule: Send + Sync {
    /// Machine-friendly rule name for logging and diagnostics.
    fn name(&self) -> &str;

    /// Evaluate the rule against the sessions and stats.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Strategy>;
}

/// Round a percentage to the nearest whole number, halves away from zero.
pub(crate) fn whole_percent(pct: f64) -> i64 {
    pct.round() as i64
}
