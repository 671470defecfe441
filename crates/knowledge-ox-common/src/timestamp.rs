use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

/// Epoch values below this are read as seconds, anything larger as milliseconds.
pub const SECONDS_THRESHOLD: i64 = 10_000_000_000;

/// Unified timestamp type shared by file records and chat messages.
/// Internally stores as DateTime<Utc>; remote records count seconds while
/// chat messages count milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new timestamp from the current time
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a Unix timestamp in seconds
    #[must_use]
    pub fn from_unix_seconds(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Create a timestamp from a Unix timestamp in milliseconds
    #[must_use]
    pub fn from_unix_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }

    /// Create a timestamp from an epoch value of unknown unit.
    ///
    /// Values below [`SECONDS_THRESHOLD`] are seconds, larger ones milliseconds.
    #[must_use]
    pub fn from_epoch_guess(value: i64) -> Self {
        if value < SECONDS_THRESHOLD {
            Self::from_unix_seconds(value)
        } else {
            Self::from_unix_millis(value)
        }
    }

    /// Convert to Unix timestamp (seconds since epoch)
    #[must_use]
    pub fn to_unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Convert to Unix timestamp (milliseconds since epoch)
    #[must_use]
    pub fn to_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Render in the local time zone
    #[must_use]
    pub fn to_local_string(&self) -> String {
        self.0.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
    }

    /// Get the inner DateTime<Utc>
    #[must_use]
    pub fn inner(&self) -> DateTime<Utc> {
        self.0
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

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
