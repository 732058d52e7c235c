use chrono::{Local, NaiveDateTime, TimeZone, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical rendering, also the long accepted input form
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A fully specified wall-clock timestamp with second precision.
///
/// Interpreted in the local timezone of the machine running the tool, the same way the
/// Plex server interprets the values it shows in its UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateSpec(NaiveDateTime);

impl DateSpec {
    pub fn new(value: NaiveDateTime) -> Self {
        // sub-second precision is never carried
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse exactly the canonical `YYYY-MM-DD HH:MM:SS` form.
    ///
    /// Second 60 is rejected; chrono reads it as a leap second.
    pub fn parse_canonical(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text, CANONICAL_FORMAT)
            .ok()
            .filter(|value| value.nanosecond() < 1_000_000_000)
            .map(Self::new)
    }

    /// Convert a Plex `addedAt` epoch (seconds) to local wall-clock time
    pub fn from_epoch(seconds: i64) -> Option<Self> {
        Local
            .timestamp_opt(seconds, 0)
            .single()
            .map(|dt| Self::new(dt.naive_local()))
    }

    /// Epoch seconds for the local wall-clock value.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant;
    /// nonexistent ones (spring-forward gap) yield `None`.
    pub fn to_epoch(&self) -> Option<i64> {
        Local
            .from_local_datetime(&self.0)
            .earliest()
            .map(|dt| dt.timestamp())
    }
}

impl fmt::Display for DateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl Serialize for DateSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_canonical(&text)
            .ok_or_else(|| de::Error::custom(format!("expected '{}', got '{}'", CANONICAL_FORMAT, text)))
    }
}
