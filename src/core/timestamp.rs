//! Timestamp formatting utilities
//!
//! Console headers and remote records share a single ISO 8601 rendering with
//! millisecond precision, always in UTC.

use chrono::{DateTime, Utc};

/// Source of the current time. Replaceable so tests can pin timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Default clock reading the system time
pub fn system_clock() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as `2025-01-08T10:30:45.123Z`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fanout_logger::core::timestamp::iso8601;
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(iso8601(&t), "2025-01-08T10:30:45.000Z");
/// ```
#[must_use]
pub fn iso8601(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
