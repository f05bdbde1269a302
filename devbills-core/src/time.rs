//! Time utilities: timezone-aware "today" and the API's timestamp shape.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone like "America/Sao_Paulo".
pub fn parse_tz(tz: &str) -> Option<Tz> {
    tz.parse().ok()
}

/// Today's calendar date as seen in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Pin a picked calendar date to 12:00 UTC.
///
/// The API stores a full timestamp; noon keeps the date stable for any
/// viewer within ±11 hours of UTC.
pub fn midday_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap_or_default())
}

/// RFC3339 with millisecond precision and a `Z` suffix, e.g.
/// `2024-03-10T12:00:00.000Z`.
pub fn to_rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
