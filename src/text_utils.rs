use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::{ConvertError, Result};

/// `pubDate` as written by WordPress, e.g. `Fri, 01 Jan 2021 12:00:00 +0000`
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";
/// `wp:comment_date` / `wp:comment_date_gmt`, e.g. `2021-01-02 18:05:00`
pub const COMMENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const LONG_DATE_TIME_FORMAT: &str = "%A, %B %-d, %Y @ %-I:%M %p";
const RANGE_DATE_FORMAT: &str = "%B %-d, %Y";

pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
/// Comment timestamps are always shown in this zone, whatever the blog timezone is.
pub const COMMENT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConvertError::UnknownTimezone(name.to_string()))
}

pub fn parse_pub_date(buf: &str, tz: &Tz) -> std::result::Result<DateTime<Tz>, String> {
    match DateTime::parse_from_str(buf.trim(), PUB_DATE_FORMAT) {
        Ok(dt) => Ok(dt.with_timezone(tz)),
        Err(e) => Err(format!("Unable to parse date time {}: {}", buf, e)),
    }
}

pub fn parse_comment_date(buf: &str) -> std::result::Result<DateTime<Utc>, String> {
    match NaiveDateTime::parse_from_str(buf.trim(), COMMENT_DATE_FORMAT) {
        Ok(dt) => Ok(dt.and_utc()),
        Err(e) => Err(format!("Unable to parse date time {}: {}", buf, e)),
    }
}

pub fn format_long_date_time(date_time: &DateTime<Tz>) -> String {
    date_time.format(LONG_DATE_TIME_FORMAT).to_string()
}

pub fn format_date_range(range: Option<&(DateTime<Tz>, DateTime<Tz>)>) -> String {
    match range {
        Some((first, last)) => format!(
            "{} - {}",
            first.format(RANGE_DATE_FORMAT),
            last.format(RANGE_DATE_FORMAT)
        ),
        None => "N/A".to_string(),
    }
}
