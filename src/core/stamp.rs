// src/core/stamp.rs
//
// Timestamps double as identifiers: iteration ids and backup folder names
// are ISO-8601 UTC timestamps with `:` and `.` replaced by `-`, which keeps
// them filesystem-safe while preserving lexicographic = chronological order.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2026-08-30T12:34:56.789Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts an ISO-8601 timestamp into its filesystem-safe dashed form.
pub fn to_dashed(iso: &str) -> String {
    iso.replace([':', '.'], "-")
}

/// Reverses [`to_dashed`]: restores `:` separators in the time-of-day part
/// and the `.` before the fractional seconds.
///
/// Returns `None` if the input does not have the expected
/// `YYYY-MM-DDTHH-MM-SS-mmmZ` shape.
pub fn from_dashed(dashed: &str) -> Option<String> {
    let (date, time) = dashed.split_once('T')?;

    let mut restored = String::with_capacity(dashed.len());
    let mut dash_index = 0usize;
    for ch in time.chars() {
        if ch == '-' {
            restored.push(match dash_index {
                0 | 1 => ':',
                2 => '.',
                _ => return None,
            });
            dash_index += 1;
        } else {
            restored.push(ch);
        }
    }
    if dash_index != 3 {
        return None;
    }

    Some(format!("{date}T{restored}"))
}
