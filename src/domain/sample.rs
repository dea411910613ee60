// Probe status sample domain model
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One time-stamped probe status reading, as served by the history
/// endpoint and the live feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sample {
    /// Timestamps without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    /// ISO-8601 duration, e.g. `P1DT2H3M4S`.
    pub uptime: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl Sample {
    pub fn new(
        timestamp: DateTime<Utc>,
        temperature: f64,
        uptime: String,
        rx_bytes: u64,
        tx_bytes: u64,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            uptime,
            rx_bytes,
            tx_bytes,
        }
    }
}

/// Parse an ISO-8601 date-time that carries no offset.
pub fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// RFC 3339 timestamps keep their offset; naive ones are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => parse_naive_datetime(value).map(|naive| naive.and_utc()),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}

/// Decode one history response or push message body.
pub fn parse_batch(payload: &str) -> Result<Vec<Sample>, serde_json::Error> {
    serde_json::from_str(payload)
}
