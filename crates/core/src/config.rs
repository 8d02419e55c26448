//! Layered configuration for trader profiling.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (45-minute session gap, stock strategy thresholds)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `CM_PROFILE_`, nested with `__`)
//!
//! Every section also implements [`Default`], so library callers can run the
//! pipeline without touching the `config` crate at all.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default session inactivity gap: 45 minutes.
fn default_gap_minutes() -> u64 {
    45
}

/// Default number of top markets reported: 3.
fn default_top_n() -> usize {
    3
}

/// Default majority threshold for duration/market rules: 60 %.
fn default_majority_pct() -> f64 {
    60.0
}

/// Default "quick" session cutoff: 20 minutes.
fn default_quick_max_minutes() -> f64 {
    20.0
}

/// Default "hold longer" upper bound: 240 minutes.
fn default_hold_max_minutes() -> f64 {
    240.0
}

/// Default majority threshold for the leverage rule: 50 %.
fn default_leverage_majority_pct() -> f64 {
    50.0
}

/// Default leverage multiple considered "high": 5x.
fn default_high_leverage() -> f64 {
    5.0
}

/// Default maximum stdev / mean ratio for similar sizing: 0.5.
fn default_sizing_cv_max() -> f64 {
    0.5
}

/// Default distinct markets for the diversified rule: 5.
fn default_diversified_markets() -> usize {
    5
}

/// Default minimum sessions for the diversified rule: 10.
fn default_diversified_sessions() -> usize {
    10
}

/// Default fill lookback window: 30 days.
fn default_lookback_days() -> u32 {
    30
}

/// Largest UTC offset accepted for hour bucketing: ±14 hours.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level profiling configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProfileConfig {
    /// Session grouping parameters.
    #[serde(default)]
    pub sessions: SessionConfig,
    /// Statistics aggregation parameters.
    #[serde(default)]
    pub stats: StatsConfig,
    /// Strategy rule thresholds.
    #[serde(default)]
    pub strategies: StrategyConfig,
    /// Fill ingestion parameters.
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Session grouping configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Maximum inactivity gap (inclusive) before a market's session closes.
    #[serde(default = "default_gap_minutes")]
    pub gap_minutes: u64,
}

/// Statistics aggregation configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatsConfig {
    /// How many top markets and active hours to report.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Fixed offset from UTC, in minutes, used for hour-of-day bucketing.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Strategy rule thresholds. All percentages are in `0..=100`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StrategyConfig {
    /// Share of sessions (strictly greater) needed by the duration and
    /// focused-market rules.
    #[serde(default = "default_majority_pct")]
    pub majority_pct: f64,
    /// Sessions shorter than this many minutes count as quick.
    #[serde(default = "default_quick_max_minutes")]
    pub quick_max_minutes: f64,
    /// Upper bound (inclusive) of the "hold a bit longer" band.
    #[serde(default = "default_hold_max_minutes")]
    pub hold_max_minutes: f64,
    /// Share of sessions (strictly greater) needed by the leverage rule.
    #[serde(default = "default_leverage_majority_pct")]
    pub leverage_majority_pct: f64,
    /// Leverage strictly above this counts as high.
    #[serde(default = "default_high_leverage")]
    pub high_leverage: f64,
    /// Similar sizing fires when stdev < `sizing_cv_max` × mean.
    #[serde(default = "default_sizing_cv_max")]
    pub sizing_cv_max: f64,
    /// Distinct markets needed by the diversified rule.
    #[serde(default = "default_diversified_markets")]
    pub diversified_markets: usize,
    /// Sessions needed by the diversified rule.
    #[serde(default = "default_diversified_sessions")]
    pub diversified_sessions: usize,
}

/// Fill ingestion configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Only fills within this many days of the reference time are profiled.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap_minutes: default_gap_minutes(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            utc_offset_minutes: 0,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            majority_pct: default_majority_pct(),
            quick_max_minutes: default_quick_max_minutes(),
            hold_max_minutes: default_hold_max_minutes(),
            leverage_majority_pct: default_leverage_majority_pct(),
            high_leverage: default_high_leverage(),
            sizing_cv_max: default_sizing_cv_max(),
            diversified_markets: default_diversified_markets(),
            diversified_sessions: default_diversified_sessions(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
        }
    }
}

impl ProfileConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `CM_PROFILE_` and `__`
    ///    as the nesting separator (e.g., `CM_PROFILE_SESSIONS__GAP_MINUTES=30`).
    ///
    /// The result is validated before it is returned.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("sessions.gap_minutes", 45i64)?
            .set_default("stats.top_n", 3i64)?
            .set_default("stats.utc_offset_minutes", 0i64)?
            .set_default("strategies.majority_pct", 60.0)?
            .set_default("strategies.quick_max_minutes", 20.0)?
            .set_default("strategies.hold_max_minutes", 240.0)?
            .set_default("strategies.leverage_majority_pct", 50.0)?
            .set_default("strategies.high_leverage", 5.0)?
            .set_default("strategies.sizing_cv_max", 0.5)?
            .set_default("strategies.diversified_markets", 5i64)?
            .set_default("strategies.diversified_sessions", 10i64)?
            .set_default("ingest.lookback_days", 30i64)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path
                .to_str()
                .context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (CM_PROFILE_ prefix) ────────
        // The prefix separator is pinned to `_`; otherwise the `config`
        // crate reuses the `__` nesting separator after the prefix.
        builder = builder.add_source(
            Environment::with_prefix("CM_PROFILE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: ProfileConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> Result<()> {
        if self.sessions.gap_minutes == 0 {
            bail!("sessions.gap_minutes must be positive");
        }
        if self.stats.top_n == 0 {
            bail!("stats.top_n must be at least 1");
        }
        if self.stats.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            bail!(
                "stats.utc_offset_minutes {} is outside ±{}",
                self.stats.utc_offset_minutes,
                MAX_UTC_OFFSET_MINUTES
            );
        }
        let s = &self.strategies;
        for (name, pct) in [
            ("majority_pct", s.majority_pct),
            ("leverage_majority_pct", s.leverage_majority_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                bail!("strategies.{} must be within 0..=100, got {}", name, pct);
            }
        }
        if s.hold_max_minutes < s.quick_max_minutes {
            bail!(
                "strategies.hold_max_minutes ({}) must not be below quick_max_minutes ({})",
                s.hold_max_minutes,
                s.quick_max_minutes
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Serializes tests that manipulate environment variables. Recovers from
    /// a poisoned lock so one failing test does not cascade.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clear all env vars that could interfere with config loading.
    fn clear_env() {
        std::env::remove_var("CM_PROFILE_SESSIONS__GAP_MINUTES");
        std::env::remove_var("CM_PROFILE_STATS__UTC_OFFSET_MINUTES");
        std::env::remove_var("CM_PROFILE_STRATEGIES__HIGH_LEVERAGE");
    }

    /// Helper: create a temporary TOML config file and return its path.
    ///
    /// Uses `.toml` suffix so the `config` crate auto-detects the format.
    fn write_temp_toml(content: &str) -> (tempfile::NamedTempFile, PathBuf) {
        let mut f = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        write!(f, "{}", content).expect("write temp file");
        let path = f.path().to_path_buf();
        (f, path)
    }

    #[test]
    fn test_load_defaults_only() {
        let _lock = lock_env();
        clear_env();

        let cfg = ProfileConfig::load(None).expect("load defaults");
        assert_eq!(cfg, ProfileConfig::default());
        assert_eq!(cfg.sessions.gap_minutes, 45);
        assert_eq!(cfg.stats.top_n, 3);
        assert_eq!(cfg.strategies.majority_pct, 60.0);
        assert_eq!(cfg.strategies.diversified_sessions, 10);
        assert_eq!(cfg.ingest.lookback_days, 30);
    }

    #[test]
    fn test_load_from_toml() {
        let _lock = lock_env();
        clear_env();

        let toml_content = r#"
[sessions]
gap_minutes = 30

[stats]
utc_offset_minutes = -300

[strategies]
high_leverage = 10.0
diversified_markets = 3

[ingest]
lookback_days = 7
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let cfg = ProfileConfig::load(Some(path)).expect("load from toml");

        assert_eq!(cfg.sessions.gap_minutes, 30);
        assert_eq!(cfg.stats.utc_offset_minutes, -300);
        assert_eq!(cfg.stats.top_n, 3);
        assert_eq!(cfg.strategies.high_leverage, 10.0);
        assert_eq!(cfg.strategies.diversified_markets, 3);
        assert_eq!(cfg.strategies.quick_max_minutes, 20.0);
        assert_eq!(cfg.ingest.lookback_days, 7);
    }

    #[test]
    fn test_env_var_overrides() {
        let _lock = lock_env();
        clear_env();
        std::env::set_var("CM_PROFILE_SESSIONS__GAP_MINUTES", "15");

        let cfg = ProfileConfig::load(None).expect("load with env override");
        assert_eq!(cfg.sessions.gap_minutes, 15);

        clear_env();
    }

    #[test]
    fn test_env_overrides_toml() {
        let _lock = lock_env();
        clear_env();
        std::env::set_var("CM_PROFILE_STRATEGIES__HIGH_LEVERAGE", "20");

        let (_f, path) = write_temp_toml("[strategies]\nhigh_leverage = 10.0\n");
        let cfg = ProfileConfig::load(Some(path)).expect("load");
        assert_eq!(cfg.strategies.high_leverage, 20.0);

        clear_env();
    }

    #[test]
    fn test_zero_gap_rejected() {
        let _lock = lock_env();
        clear_env();

        let (_f, path) = write_temp_toml("[sessions]\ngap_minutes = 0\n");
        let result = ProfileConfig::load(Some(path));
        assert!(result.is_err());
        let err_msg = format!("{}", result.unwrap_err());
        assert!(err_msg.contains("gap_minutes"));
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let mut cfg = ProfileConfig::default();
        cfg.stats.utc_offset_minutes = 15 * 60;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_inverted_duration_bands_rejected() {
        let mut cfg = ProfileConfig::default();
        cfg.strategies.hold_max_minutes = 10.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_majority_out_of_range_rejected() {
        let mut cfg = ProfileConfig::default();
        cfg.strategies.majority_pct = 120.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let _lock = lock_env();
        clear_env();

        let result = ProfileConfig::load(Some(PathBuf::from("/nonexistent/profile.toml")));
        assert!(result.is_err());
    }
}
