//! Millisecond-precision wall-clock timestamps.
//!
//! [`Timestamp`] wraps an `i64` representing milliseconds since the Unix
//! epoch. Exchanges report fill times in milliseconds, so this is the finest
//! resolution the profiling pipeline ever needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds in one minute.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Millisecond-precision timestamp.
///
/// Internally stores milliseconds since the Unix epoch as an `i64`.
/// Serializes as the raw millisecond integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Capture the current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Create a timestamp from milliseconds since the epoch.
    #[inline]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Returns the raw millisecond value.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Create a timestamp from a UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Convert to a UTC datetime, or `None` if out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Shift by a signed number of milliseconds, saturating at the `i64` bounds.
    #[inline]
    pub const fn saturating_add_millis(&self, ms: i64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Calculate the elapsed milliseconds from `earlier` to `self`.
    ///
    /// Returns `0` if `self` is before `earlier`.
    #[inline]
    pub const fn elapsed_since(&self, earlier: &Timestamp) -> i64 {
        if self.0 >= earlier.0 {
            self.0 - earlier.0
        } else {
            0
        }
    }

    /// Elapsed time from `earlier` to `self` in fractional minutes.
    #[inline]
    pub fn minutes_since(&self, earlier: &Timestamp) -> f64 {
        self.elapsed_since(earlier) as f64 / MILLIS_PER_MINUTE as f64
    }

    /// Hour of day (0–23) after applying a fixed UTC offset in minutes.
    ///
    /// Uses euclidean arithmetic so pre-epoch timestamps and negative offsets
    /// still land in `0..24`.
    pub fn hour_of_day(&self, utc_offset_minutes: i32) -> u32 {
        let local = self
            .0
            .saturating_add(i64::from(utc_offset_minutes) * MILLIS_PER_MINUTE);
        local.div_euclid(MILLIS_PER_HOUR).rem_euclid(24) as u32
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_millis() {
        let ts = Timestamp::from_millis(1000);
        assert_eq!(ts.as_millis(), 1000);
    }

    #[test]
    fn test_elapsed_since() {
        let earlier = Timestamp(1_000);
        let later = Timestamp(2_500);
        assert_eq!(later.elapsed_since(&earlier), 1_500);
    }

    #[test]
    fn test_elapsed_since_backwards() {
        let earlier = Timestamp(2_000);
        let later = Timestamp(1_000);
        assert_eq!(later.elapsed_since(&earlier), 0);
    }

    #[test]
    fn test_minutes_since() {
        let start = Timestamp(0);
        let end = Timestamp(90 * 1_000);
        assert!((end.minutes_since(&start) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_hour_of_day_utc() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 14, 59, 59).unwrap();
        assert_eq!(Timestamp::from(dt).hour_of_day(0), 14);
    }

    #[test]
    fn test_hour_of_day_with_offset_wraps() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        // UTC+2 pushes into the next day.
        assert_eq!(Timestamp::from(dt).hour_of_day(120), 1);
        // UTC-5 pulls back.
        assert_eq!(Timestamp::from(dt).hour_of_day(-300), 18);
    }

    #[test]
    fn test_hour_of_day_before_epoch() {
        // 1969-12-31T23:00:00Z
        assert_eq!(Timestamp(-3_600_000).hour_of_day(0), 23);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 23, 8, 15, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.to_datetime(), Some(dt));
    }

    #[test]
    fn test_display() {
        let ts = Timestamp(1_706_000_000_123);
        assert_eq!(format!("{}", ts), "2024-01-23T08:53:20.123Z");
    }

    #[test]
    fn test_saturating_add() {
        assert_eq!(Timestamp(10).saturating_add_millis(-20), Timestamp(-10));
        assert_eq!(Timestamp(i64::MAX).saturating_add_millis(1), Timestamp(i64::MAX));
    }

    #[test]
    fn test_serializes_as_millis() {
        let json = serde_json::to_string(&Timestamp(42)).unwrap();
        assert_eq!(json, "42");
    }
}
