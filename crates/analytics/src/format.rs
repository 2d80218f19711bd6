//! Display formatting for counts, durations and timestamps.

use chrono::{DateTime, Utc};
use serde::Serializer;

/// Format a count with a K/M/B suffix and one decimal (`1.5K`, `2.3M`).
pub fn format_number(n: u64) -> String {
    let value = n as f64;
    if n >= 1_000_000_000 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Format a duration in seconds as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Format a timestamp relative to `now` (e.g. "3h ago").
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 30 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_days() < 365 {
        format!("{}mo ago", duration.num_days() / 30)
    } else {
        format!("{}y ago", duration.num_days() / 365)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncate to `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Serialize an `f64` rounded to two decimals.
pub(crate) fn serialize_round2<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round2(*value))
}
