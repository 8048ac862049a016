//! Millisecond-based time primitives shared across the domain model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// Falls back to 0 if the system clock reports a time before the epoch.
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_else(|_| std::time::Duration::from_secs(0))
                .as_millis() as i64,
        )
    }

    /// Creates a timestamp from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since the Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs.as_millis() as i64))
    }
}

/// Duration in milliseconds
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Duration(u64);

impl Duration {
    pub const ZERO: Self = Self(0);

    /// Creates a duration from milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Creates a duration from whole seconds
    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds * 1000)
    }

    /// Creates a duration from whole minutes
    pub fn from_minutes(minutes: u64) -> Self {
        Self(minutes * 60_000)
    }

    /// Returns the duration in milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the duration in whole seconds
    pub fn as_seconds(&self) -> u64 {
        self.0 / 1000
    }

    /// Returns true if the duration is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Formats as H:MM:SS
    pub fn as_hms(&self) -> String {
        let total_seconds = self.as_seconds();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hms())
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now_is_monotonic_enough() {
        let t1 = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let t2 = Timestamp::now();
        assert!(t2 > t1);
    }

    #[test]
    fn test_timestamp_plus_duration() {
        let t = Timestamp::from_millis(1_000);
        let end = t + Duration::from_minutes(2);
        assert_eq!(end.as_millis(), 121_000);
    }

    #[test]
    fn test_duration_conversions() {
        let d = Duration::from_seconds(3665);
        assert_eq!(d.as_millis(), 3_665_000);
        assert_eq!(d.as_seconds(), 3665);
        assert_eq!(Duration::from_minutes(3).as_seconds(), 180);
    }

    #[test]
    fn test_duration_as_hms() {
        assert_eq!(Duration::from_seconds(3665).as_hms(), "1:01:05");
        assert_eq!(Duration::from_seconds(125).as_hms(), "0:02:05");
        assert_eq!(Duration::ZERO.as_hms(), "0:00:00");
    }

    #[test]
    fn test_duration_sum() {
        let total: Duration = [
            Duration::from_seconds(10),
            Duration::from_seconds(20),
            Duration::ZERO,
        ]
        .into_iter()
        .sum();
        assert_eq!(total.as_seconds(), 30);
    }

    #[test]
    fn test_duration_from_std() {
        let d: Duration = std::time::Duration::from_secs(42).into();
        assert_eq!(d.as_seconds(), 42);
    }
}
