//! Lenient decoders for backend payloads
//!
//! The backend is not consistent about nulls, number encodings and whether
//! related users are embedded or referenced. None of these helpers fail on a
//! merely missing or oddly shaped value.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use tracing::debug;

/// Treat an explicit `null` like an absent field
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Member {
    Id(i64),
    Embedded { id: i64 },
    Text(String),
    Other(IgnoredAny),
}

/// Role membership arrives as `[1, 2]` or `[{"id": 1, ...}, ...]`
pub fn member_ids<'de, D>(deserializer: D) -> Result<BTreeSet<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let members: Option<Vec<Member>> = Option::deserialize(deserializer)?;
    Ok(members
        .unwrap_or_default()
        .into_iter()
        .filter_map(|member| match member {
            Member::Id(id) | Member::Embedded { id } => Some(id),
            Member::Text(text) => text.trim().parse().ok(),
            Member::Other(_) => None,
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Price {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Decimal fields come back as strings (`"12.50"`), numbers or null
pub fn price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Price> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Price::Number(value)) => Some(value),
        Some(Price::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(Price::Other(_)) | None => None,
    }
    .filter(|value| value.is_finite()))
}

/// Parse RFC 3339 first, then the naive forms the event forms submit
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.as_deref().and_then(parse_timestamp))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Text(String),
    Other(IgnoredAny),
}

/// A string field, or `None` for null or any non-string value
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Text> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Text::Text(value)) => Some(value),
        Some(Text::Other(_)) | None => None,
    })
}

/// A label parsed with `FromStr`, or `None` when it is absent or unknown
pub fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    Ok(text(deserializer)?.and_then(|label| label.parse().ok()))
}

/// Like [`parsed`], falling back to the type's default
pub fn parsed_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    Ok(parsed(deserializer)?.unwrap_or_default())
}

/// A list whose undecodable entries are dropped instead of failing the parent
pub fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(error = %e, "Dropping malformed list entry");
                None
            }
        })
        .collect())
}
