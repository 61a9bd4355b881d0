//! Forgiving decoders for loosely typed spreadsheet columns.
//!
//! Malformed values never fail a load. They decode to `None`, which the
//! engine treats as "absent" (experience 0, no apply date).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
    Flag(bool),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

/// Parses a calendar timestamp from the formats seen in exported sheets.
///
/// Offsets in RFC 3339 input are kept as written; the local wall-clock date
/// is what matters for day-granular filtering.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| parse_date(raw).and_then(|day| day.and_hms_opt(0, 0, 0)))
}

/// Parses a calendar day, accepting a full timestamp and truncating it.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|parsed| parsed.naive_local().date())
        })
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|parsed| parsed.date())
        })
}

/// Parses a years-of-experience value; non-finite numbers count as absent.
pub fn parse_years(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Serde adapter for optional text cells that spreadsheets may export as
/// numbers or booleans.
///
/// Numbers keep their shortest decimal form (`42`, `2.5`), `true` becomes
/// `"true"` and `false` is treated as an empty cell. Other shapes are absent.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Number(value)) if value.is_finite() => Some(value.to_string()),
        Some(Raw::Flag(true)) => Some(true.to_string()),
        Some(Raw::Flag(false)) | None => None,
        Some(_) => {
            tracing::warn!("discarding non-scalar cell");
            None
        }
    };
    Ok(value)
}

/// Serde adapter for optional years of experience given as a number or text.
pub fn years<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) if value.is_finite() => Some(value),
        Some(Raw::Text(text)) => {
            let parsed = parse_years(&text);
            if parsed.is_none() && !text.trim().is_empty() {
                tracing::warn!(value = %text, "discarding unparsable experience value");
            }
            parsed
        }
        _ => None,
    };
    Ok(value)
}

/// Serde adapter for an optional timestamp; unparsable text becomes `None`.
pub fn date_time<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => {
            let parsed = parse_date_time(&text);
            if parsed.is_none() && !text.trim().is_empty() {
                tracing::warn!(value = %text, "discarding unparsable apply date");
            }
            parsed
        }
        _ => None,
    };
    Ok(value)
}

/// Serde adapter for an optional calendar day; unparsable text becomes `None`.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => {
            let parsed = parse_date(&text);
            if parsed.is_none() && !text.trim().is_empty() {
                tracing::warn!(value = %text, "ignoring unparsable date bound");
            }
            parsed
        }
        _ => None,
    };
    Ok(value)
}
