//! Timestamp normalization to epoch milliseconds.
//!
//! Accepts integer milliseconds, floating-point epoch seconds, or date/time
//! text in any of the layouts below. Text without an explicit offset is read
//! as UTC.

use crate::errors::{MetadataError, MetadataResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

/// Date-times carrying a numeric offset. `%z` accepts `+hhmm` and `+hh:mm`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M%z",
];

/// Date-times without an offset, or with a UTC marker chrono would not
/// otherwise accept.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f UTC",
    "%Y-%m-%dT%H:%M:%S%.f UTC",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M%SZ",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %I:%M %p",
    "%a %b %e %H:%M:%S %Y",
];

/// Date-only layouts, read as midnight UTC. Slash dates are month first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y-%b-%d",
];

/// Normalize one timestamp value found under `field`.
pub fn normalize_timestamp(field: &str, value: &Value) -> MetadataResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(millis) = n.as_i64() {
                Ok(millis)
            } else if n.is_u64() {
                Err(MetadataError::invalid(format!(
                    "\"{field}\" value {n} is out of range"
                )))
            } else {
                let secs = n.as_f64().unwrap_or(f64::NAN);
                seconds_to_millis(secs).ok_or_else(|| {
                    MetadataError::invalid(format!("\"{field}\" value {n} is out of range"))
                })
            }
        }
        Value::String(text) => parse_timestamp(text)
            .map(to_epoch_millis)
            .ok_or_else(|| MetadataError::invalid(format!("could not parse a date from {value}"))),
        other => Err(MetadataError::invalid(format!(
            "\"{field}\" must be a timestamp, found {other}"
        ))),
    }
}

/// Convert fractional epoch seconds to milliseconds, truncating toward zero.
pub fn seconds_to_millis(secs: f64) -> Option<i64> {
    let millis = (secs * 1000.0).trunc();
    // i64::MAX is not representable as f64; the bound rounds up to 2^63.
    if millis.is_finite() && millis >= i64::MIN as f64 && millis < i64::MAX as f64 {
        Some(millis as i64)
    } else {
        None
    }
}

/// Signed milliseconds between `instant` and the Unix epoch, truncated
/// toward zero.
pub fn to_epoch_millis(instant: DateTime<Utc>) -> i64 {
    instant
        .signed_duration_since(DateTime::<Utc>::UNIX_EPOCH)
        .num_milliseconds()
}

/// Parse date/time text in any supported layout.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.and_time(NaiveTime::MIN).and_utc());
        }
    }

    None
}
