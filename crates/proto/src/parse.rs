//! Field-level parsers for values as the platform sends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::ParseError;

/// A statistic as sent by the platform.
///
/// The Data API encodes counts as decimal strings, but cached or proxied
/// payloads frequently carry plain JSON numbers instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl From<u64> for RawCount {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<&str> for RawCount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Convert an optional raw count to `u64`.
///
/// Missing and blank values become 0. Negative or non-numeric values are
/// rejected, since they cannot come from a well-formed payload.
pub fn parse_count(field: &'static str, raw: Option<&RawCount>) -> Result<u64, ParseError> {
    let invalid = |value: String| ParseError::InvalidCount { field, value };

    match raw {
        None => Ok(0),
        Some(RawCount::Unsigned(n)) => Ok(*n),
        Some(RawCount::Signed(n)) => u64::try_from(*n).map_err(|_| invalid(n.to_string())),
        Some(RawCount::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse::<u64>().map_err(|_| invalid(text.clone()))
        }
    }
}

/// Parse an ISO-8601 duration (`PT1H2M3S`, `P1DT2H`, `P0D`) into whole seconds.
///
/// Fractional seconds are truncated.
pub fn parse_iso8601_duration(value: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidDuration(value.to_string());

    let rest = value.trim().strip_prefix('P').ok_or_else(invalid)?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    if date_part.is_empty() && time_part.is_none_or(str::is_empty) {
        return Err(invalid());
    }

    let mut total =
        sum_components(date_part, &[('W', 604_800), ('D', 86_400)]).ok_or_else(invalid)?;

    if let Some(time) = time_part {
        if time.is_empty() {
            return Err(invalid());
        }
        let seconds =
            sum_components(time, &[('H', 3_600), ('M', 60), ('S', 1)]).ok_or_else(invalid)?;
        total = total.saturating_add(seconds);
    }

    Ok(total)
}

/// Sum `<number><unit>` components. Units must appear in the given order, each at most once.
fn sum_components(part: &str, units: &[(char, u64)]) -> Option<u64> {
    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut next_unit = 0;

    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            digits.push(if c == ',' { '.' } else { c });
            continue;
        }

        let offset = units[next_unit..].iter().position(|(unit, _)| *unit == c)?;
        let (_, multiplier) = units[next_unit + offset];
        if digits.is_empty() {
            return None;
        }

        let amount: f64 = digits.parse().ok()?;
        total = total.saturating_add((amount * multiplier as f64) as u64);
        digits.clear();
        next_unit += offset + 1;
    }

    digits.is_empty().then_some(total)
}

/// Parse an RFC-3339 timestamp (`2023-06-26T10:00:00Z`) into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ParseError::InvalidTimestamp(value.to_string()))
}

/// Parse an optional timestamp. Missing or blank values are `None`.
pub fn parse_optional_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ParseError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_timestamp(text).map(Some),
    }
}

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
