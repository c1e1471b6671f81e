//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods, plus the [`Clock`]
//! port that makes deadline arithmetic testable.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(60);
//! assert!(later.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in a day, used for refund-window arithmetic.
pub const SECS_PER_DAY: i64 = 86_400;

/// A UTC timestamp with second-or-better precision.
///
/// Wraps `chrono::DateTime<Utc>` with the handful of operations the
/// settlement domain needs.
///
/// # Invariants
///
/// - Always in UTC timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of chrono's representable range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of chrono's representable range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the Unix timestamp in milliseconds.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns this timestamp advanced by the given number of seconds.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Returns this timestamp advanced by the given number of days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Returns true if this timestamp is strictly after `other`.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns true if this timestamp is strictly before `other`.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns the number of whole seconds from `earlier` to `self`.
    ///
    /// Negative if `self` is before `earlier`.
    #[must_use]
    pub fn seconds_since(&self, earlier: &Self) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Port for obtaining the current time.
///
/// Production code uses [`SystemClock`]; tests use [`FixedClock`] to
/// drive deadline windows deterministically.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current moment.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Deterministic clock for tests.
///
/// Starts at a fixed instant and only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: parking_lot::Mutex<Timestamp>,
}

impl FixedClock {
    /// Creates a fixed clock at the given instant.
    #[must_use]
    pub fn at(instant: Timestamp) -> Self {
        Self {
            now: parking_lot::Mutex::new(instant),
        }
    }

    /// Moves the clock to the given instant.
    pub fn set(&self, instant: Timestamp) {
        *self.now.lock() = instant;
    }

    /// Advances the clock by the given number of seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now = now.add_secs(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_secs_roundtrip() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        assert_eq!(ts.timestamp_secs(), 1_704_067_200);
        assert_eq!(ts.timestamp_millis(), 1_704_067_200_000);
    }

    #[test]
    fn add_days_matches_seconds() {
        let ts = Timestamp::from_secs(0).unwrap();
        assert_eq!(ts.add_days(61), ts.add_secs(61 * SECS_PER_DAY));
    }

    #[test]
    fn ordering_helpers() {
        let earlier = Timestamp::from_secs(100).unwrap();
        let later = earlier.add_secs(60);
        assert!(later.is_after(&earlier));
        assert!(earlier.is_before(&later));
        assert_eq!(later.seconds_since(&earlier), 60);
        assert_eq!(earlier.seconds_since(&later), -60);
    }

    #[test]
    fn fixed_clock_advances() {
        let start = Timestamp::from_secs(1_000).unwrap();
        let clock = FixedClock::at(start);
        assert_eq!(clock.now(), start);

        clock.advance_secs(30);
        assert_eq!(clock.now(), start.add_secs(30));

        clock.set(start.add_days(61));
        assert_eq!(clock.now().seconds_since(&start), 61 * SECS_PER_DAY);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::from_secs(1_704_067_200).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
