//! Timestamp parsing for broker records.
//!
//! Cash movements are stamped like `2019-02-01T10:31:02+0100`, which is not
//! quite RFC 3339 (no colon in the offset). Hand-written fixtures tend to use
//! proper RFC 3339 or a bare date. All three are accepted; bare dates are
//! taken as midnight UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A point in time with the offset the broker reported.
pub type Timestamp = DateTime<FixedOffset>;

const BROKER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Error returned for unparseable timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {0:?}")]
pub struct TimestampError(pub String);

/// Parse a broker timestamp.
///
/// ```
/// use brokerpnl_core::timestamp::parse_timestamp;
///
/// let a = parse_timestamp("2019-02-01T10:31:02+0100").unwrap();
/// let b = parse_timestamp("2019-02-01T10:31:02+01:00").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimestampError> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(s, BROKER_FORMAT) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| TimestampError(s.to_string()))
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// Serde adapter for [`Timestamp`] fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Serde adapter for optional [`Timestamp`] fields.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_broker_offset_without_colon() {
        let ts = parse_timestamp("2020-03-16T09:00:01+0100").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 3600);
        assert_eq!(ts.hour(), 9);
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let ts = parse_timestamp("2019-02-01").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2019, 2, 1));
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(ts, start_of_day(NaiveDate::from_ymd_opt(2019, 2, 1).unwrap()));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(TimestampError("yesterday".to_string()))
        );
    }
}
