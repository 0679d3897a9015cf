use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire format of `startTime`: local wall-clock time, no zone.
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One half-hour reading: when the interval starts and its mean power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datapoint {
    #[serde(
        serialize_with = "serialize_start_time",
        deserialize_with = "deserialize_start_time"
    )]
    pub start_time: NaiveDateTime,

    pub average_power_watts: f64,
}

impl Datapoint {
    pub fn new(start_time: NaiveDateTime, average_power_watts: f64) -> Self {
        Self {
            start_time,
            average_power_watts,
        }
    }
}

/// Parse a `startTime` value. Accepts the API's zone-less form, with or
/// without fractional seconds, and RFC 3339 (offset dropped, wall-clock time kept).
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

fn serialize_start_time<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.format(START_TIME_FORMAT).to_string())
}

fn deserialize_start_time<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse_start_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid startTime '{raw}'")))
}
