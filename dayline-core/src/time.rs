//! Clock-time helpers: `"HH:MM"` strings <-> minutes since midnight.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;

use crate::error::{Error, Result};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("static regex"));

/// Parse `"HH:MM"` into minutes since midnight (0..=1439).
pub fn time_to_minutes(s: &str) -> Result<u32> {
    let caps = CLOCK_RE
        .captures(s.trim())
        .ok_or_else(|| Error::validation(format!("invalid time '{s}', expected HH:MM")))?;

    let hours: u32 = caps[1]
        .parse()
        .map_err(|_| Error::validation(format!("invalid hour in '{s}'")))?;
    let minutes: u32 = caps[2]
        .parse()
        .map_err(|_| Error::validation(format!("invalid minute in '{s}'")))?;

    if hours > 23 || minutes > 59 {
        return Err(Error::validation(format!("time out of range: '{s}'")));
    }

    Ok(hours * 60 + minutes)
}

/// 24-hour `"HH:MM"`.
pub fn minutes_to_time(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// 12-hour `"h:mm AM/PM"`. Values past midnight wrap around.
pub fn format_time(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    let hours = m / 60;
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, m % 60, period)
}

/// Full English weekday name ("Monday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday name. Accepts full names and three-letter abbreviations,
/// case-insensitive.
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| Error::validation(format!("unknown week day '{s}'")))
}

pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Parse an ISO date. A full timestamp ("2026-03-01T08:00:00.000Z" or
/// "2026-03-01 08:00") is truncated to its date part; any other trailing
/// text is rejected.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let head = match (s.get(..10), s.get(10..)) {
        (Some(date), Some(rest)) if rest.is_empty() || rest.starts_with(['T', ' ']) => date,
        (Some(_), Some(_)) => return Err(Error::validation(format!("invalid date '{s}'"))),
        _ => s,
    };
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| Error::validation(format!("invalid date '{s}': {e}")))
}

/// Serde adapters for the persisted shapes (weekday names, lenient dates).
pub mod serde_helpers {
    use chrono::{NaiveDate, Weekday};
    use serde::{Deserialize, Deserializer, Serializer};

    pub mod weekday_opt {
        use super::*;

        pub fn serialize<S: Serializer>(v: &Option<Weekday>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(day) => s.serialize_str(crate::time::weekday_name(*day)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Weekday>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(name) => crate::time::parse_weekday(name)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }

    pub mod lenient_date {
        use super::*;

        pub fn serialize<S: Serializer>(v: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(&v.format("%Y-%m-%d"))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
            let raw = String::deserialize(d)?;
            crate::time::parse_iso_date(&raw).map_err(serde::de::Error::custom)
        }
    }

    pub mod lenient_date_opt {
        use super::*;

        pub fn serialize<S: Serializer>(v: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(date) => s.collect_str(&date.format("%Y-%m-%d")),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => crate::time::parse_iso_date(s)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}
