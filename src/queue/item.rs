//! Work items: the JSON records handed from listing to download.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Text form of a timestamp inside a queued work item.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A modification time as it reaches the transfer step: either already
/// structured (live listing) or still text (decoded from the queue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Structured(DateTime<Utc>),
    Text(String),
}

impl Timestamp {
    pub fn resolve(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        match self {
            Timestamp::Structured(dt) => Ok(*dt),
            Timestamp::Text(s) => parse_timestamp(s),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Structured(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Structured(dt) => write!(f, "{}", dt.format(WIRE_TIME_FORMAT)),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Timestamp::Text)
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS` (optionally with fractional seconds, read as
/// UTC) or a full RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
}

/// One remote file queued for transfer. Self-contained: nothing in it
/// refers back to the listing session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub path_display: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub size: u64,
    #[serde(default)]
    pub server_modified: Option<Timestamp>,
    #[serde(default)]
    pub client_modified: Option<Timestamp>,
}

impl WorkItem {
    /// Directories and empty files carry size 0 and are never transferred.
    pub fn is_transferable(&self) -> bool {
        self.size > 0
    }

    pub fn to_blob(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_blob(blob: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(blob)
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}
