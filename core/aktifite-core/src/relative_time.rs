//! "How long ago" labels for feed entries and chat lists.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 60 * MINUTE_SECS;
const DAY_SECS: i64 = 24 * HOUR_SECS;
const WEEK_SECS: i64 = 7 * DAY_SECS;

/// Elapsed time bucket. `Display` renders the Turkish UI copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeAge {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
    /// A week or older: shown as the calendar date.
    Date(NaiveDate),
}

impl fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeAge::JustNow => f.write_str("Az önce"),
            RelativeAge::Minutes(n) => write!(f, "{} dakika önce", n),
            RelativeAge::Hours(n) => write!(f, "{} saat önce", n),
            RelativeAge::Days(n) => write!(f, "{} gün önce", n),
            RelativeAge::Date(date) => write!(f, "{}", date.format("%d.%m.%Y")),
        }
    }
}

/// Buckets the time elapsed between `timestamp` and `now`.
///
/// Each bucket includes its lower edge: exactly 60s is one minute, exactly
/// 3600s is one hour. Timestamps in the future read as "just now".
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> RelativeAge {
    let elapsed = (now - timestamp).num_seconds();

    if elapsed < MINUTE_SECS {
        RelativeAge::JustNow
    } else if elapsed < HOUR_SECS {
        RelativeAge::Minutes(elapsed / MINUTE_SECS)
    } else if elapsed < DAY_SECS {
        RelativeAge::Hours(elapsed / HOUR_SECS)
    } else if elapsed < WEEK_SECS {
        RelativeAge::Days(elapsed / DAY_SECS)
    } else {
        RelativeAge::Date(timestamp.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 8, 12, 0, 0).unwrap()
    }

    fn ago(secs: i64) -> RelativeAge {
        relative_age(now() - Duration::seconds(secs), now())
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(ago(0), RelativeAge::JustNow);
        assert_eq!(ago(59), RelativeAge::JustNow);
        assert_eq!(ago(60), RelativeAge::Minutes(1));
        assert_eq!(ago(3599), RelativeAge::Minutes(59));
        assert_eq!(ago(3600), RelativeAge::Hours(1));
        assert_eq!(ago(86_399), RelativeAge::Hours(23));
        assert_eq!(ago(86_400), RelativeAge::Days(1));
        assert_eq!(ago(604_799), RelativeAge::Days(6));
        assert_eq!(
            ago(604_800),
            RelativeAge::Date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
        );
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(ago(-30), RelativeAge::JustNow);
    }

    #[test]
    fn test_display_copy() {
        assert_eq!(ago(10).to_string(), "Az önce");
        assert_eq!(ago(5 * 60).to_string(), "5 dakika önce");
        assert_eq!(ago(3 * 3600).to_string(), "3 saat önce");
        assert_eq!(ago(2 * 86_400).to_string(), "2 gün önce");
        assert_eq!(ago(30 * 86_400).to_string(), "09.01.2025");
    }
}
