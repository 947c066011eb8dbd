//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days. Returns `None` when the result falls
    /// outside the representable range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Creates a new timestamp by subtracting the specified number of minutes.
    pub fn minus_minutes(&self, minutes: i64) -> Option<Self> {
        Duration::try_minutes(minutes)
            .and_then(|delta| self.0.checked_sub_signed(delta))
            .map(Self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn ordering_helpers_agree_with_ord() {
        let earlier = at(2024, 1, 1);
        let later = at(2024, 1, 2);

        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
        assert!(earlier < later);
    }

    #[test]
    fn add_days_crosses_month_boundary() {
        assert_eq!(at(2024, 1, 31).add_days(30), Some(at(2024, 3, 1)));
    }

    #[test]
    fn add_days_accepts_negative_offsets() {
        assert_eq!(at(2024, 3, 1).add_days(-1), Some(at(2024, 2, 29)));
    }

    #[test]
    fn add_days_past_the_calendar_range_is_none() {
        assert_eq!(at(2024, 1, 1).add_days(i64::from(i32::MAX)), None);
        assert_eq!(at(2024, 1, 1).add_days(i64::MAX), None);
    }

    #[test]
    fn minus_minutes_moves_backwards() {
        let ts = at(2024, 5, 5);
        let earlier = ts.minus_minutes(60).unwrap();
        assert_eq!(earlier.as_datetime().timestamp(), ts.as_datetime().timestamp() - 3600);
        assert_eq!(ts.minus_minutes(i64::MAX), None);
    }
}
