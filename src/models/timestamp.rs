//! Canonical millisecond-precision UTC timestamps
//!
//! Journal timestamps are always rendered as `YYYY-MM-DDTHH:MM:SS.mmmZ`. A
//! string only parses if rendering the parsed instant reproduces it exactly,
//! so offsets, missing milliseconds, or extra precision are all rejected.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// strftime pattern of the canonical form
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A UTC instant truncated to whole milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Truncate a chrono instant to millisecond precision
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let truncated =
            DateTime::from_timestamp_millis(datetime.timestamp_millis()).unwrap_or(datetime);
        Self(truncated)
    }

    /// Parse a canonical timestamp, returning `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        let parsed = DateTime::parse_from_rfc3339(s).ok()?;
        // chrono encodes a leap second as nanoseconds past 1e9
        if parsed.nanosecond() >= 1_000_000_000 {
            return None;
        }
        let timestamp = Self(parsed.with_timezone(&Utc));
        (timestamp.to_string() == s).then_some(timestamp)
    }

    /// Whether `s` is a canonical timestamp
    pub fn is_canonical(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// The underlying chrono value
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// This instant shifted forward by `millis` milliseconds
    pub fn plus_millis(&self, millis: i64) -> Self {
        Self(self.0 + Duration::milliseconds(millis))
    }

    /// Canonical form with `:` and `.` replaced by `-`, for file names
    pub fn file_safe(&self) -> String {
        self.to_string().replace([':', '.'], "-")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("'{}' is not a canonical ISO 8601 timestamp", s))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_canonical_round_trip() {
        let s = "2025-01-15T10:30:00.123Z";
        let ts = Timestamp::parse(s).unwrap();
        assert_eq!(ts.to_string(), s);
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        assert!(!Timestamp::is_canonical("2025-01-15T10:30:00Z"));
        assert!(!Timestamp::is_canonical("2025-01-15T10:30:00.123456Z"));
        assert!(!Timestamp::is_canonical("2025-01-15T10:30:00.123+00:00"));
        assert!(!Timestamp::is_canonical("2025-01-15"));
        assert!(!Timestamp::is_canonical("2025-02-30T10:30:00.000Z"));
        assert!(!Timestamp::is_canonical("not a date"));
    }

    #[test]
    fn test_rejects_leap_second() {
        assert!(!Timestamp::is_canonical("2016-12-31T23:59:60.000Z"));
        assert!(Timestamp::is_canonical("2016-12-31T23:59:59.999Z"));
    }

    #[test]
    fn test_now_is_canonical() {
        let now = Timestamp::now();
        assert!(Timestamp::is_canonical(&now.to_string()));
    }

    #[test]
    fn test_truncates_to_millis() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
            + Duration::microseconds(123_456);
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.to_string(), "2025-01-15T10:30:00.123Z");
    }

    #[test]
    fn test_file_safe() {
        let ts = Timestamp::parse("2025-01-15T10:30:00.123Z").unwrap();
        assert_eq!(ts.file_safe(), "2025-01-15T10-30-00-123Z");
    }

    #[test]
    fn test_serde() {
        let ts = Timestamp::parse("2025-01-15T10:30:00.123Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-01-15T10:30:00.123Z\"");

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);

        assert!(serde_json::from_str::<Timestamp>("\"2025-01-15T10:30:00Z\"").is_err());
    }
}
