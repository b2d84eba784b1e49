//! Fixed calendar blocks and the per-day block selector.
//!
//! On disk a block is a flat record (`recurrence` plus an optional `weekDay`
//! or `date`). Older files carry `recurring: bool` instead. Both shapes go
//! through [`RawFixedBlock::normalize`] so the scheduler only sees
//! [`FixedBlock`].

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::{self, time_to_minutes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Daily,
    Weekly(Weekday),
    OneTime(NaiveDate),
}

impl Recurrence {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        match self {
            Recurrence::Daily => true,
            Recurrence::Weekly(day) => *day == time::weekday_of(date),
            Recurrence::OneTime(on) => *on == date,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Recurrence::Daily => "daily".to_string(),
            Recurrence::Weekly(day) => format!("weekly ({})", time::weekday_name(*day)),
            Recurrence::OneTime(date) => format!("one-time ({date})"),
        }
    }
}

/// A validated block. `start < end`, both in minutes since midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFixedBlock", into = "RawFixedBlock")]
pub struct FixedBlock {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub recurrence: Recurrence,
}

impl FixedBlock {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

/// Wire shape of a block, including the legacy `recurring` flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFixedBlock {
    #[serde(default)]
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub week_day: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl RawFixedBlock {
    /// Canonicalize and validate.
    ///
    /// Returns `Ok(None)` for legacy blocks that never applied to any day
    /// (`recurring: false` or no recurrence information at all).
    pub fn normalize(&self) -> Result<Option<FixedBlock>> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("fixed block needs a name"));
        }

        let start = time_to_minutes(&self.start_time)?;
        let end = time_to_minutes(&self.end_time)?;
        if start >= end {
            return Err(Error::validation(format!(
                "fixed block '{name}' must start before it ends ({} >= {})",
                self.start_time, self.end_time
            )));
        }

        let recurrence = match self.recurrence.as_deref().map(|r| r.trim().to_lowercase()) {
            Some(kind) if kind == "daily" => Recurrence::Daily,
            Some(kind) if kind == "weekly" => {
                let day = self
                    .week_day
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        Error::validation(format!("weekly block '{name}' requires a weekDay"))
                    })?;
                Recurrence::Weekly(time::parse_weekday(day)?)
            }
            Some(kind) if kind == "one-time" => {
                let date = self
                    .date
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        Error::validation(format!("one-time block '{name}' requires a date"))
                    })?;
                Recurrence::OneTime(time::parse_iso_date(date)?)
            }
            Some(other) => {
                return Err(Error::validation(format!(
                    "unknown recurrence '{other}' (expected daily, weekly or one-time)"
                )));
            }
            None => match self.recurring {
                Some(true) => Recurrence::Daily,
                _ => return Ok(None),
            },
        };

        Ok(Some(FixedBlock {
            name: name.to_string(),
            start,
            end,
            recurrence,
        }))
    }
}

impl TryFrom<RawFixedBlock> for FixedBlock {
    type Error = Error;

    fn try_from(raw: RawFixedBlock) -> Result<Self> {
        raw.normalize()?
            .ok_or_else(|| Error::validation(format!("block '{}' has no recurrence", raw.name)))
    }
}

impl From<FixedBlock> for RawFixedBlock {
    fn from(block: FixedBlock) -> Self {
        let (recurrence, week_day, date) = match block.recurrence {
            Recurrence::Daily => ("daily", None, None),
            Recurrence::Weekly(day) => ("weekly", Some(time::weekday_name(day).to_string()), None),
            Recurrence::OneTime(on) => ("one-time", None, Some(on.format("%Y-%m-%d").to_string())),
        };
        RawFixedBlock {
            name: block.name,
            start_time: time::minutes_to_time(block.start),
            end_time: time::minutes_to_time(block.end),
            recurrence: Some(recurrence.to_string()),
            week_day,
            date,
            recurring: None,
        }
    }
}

/// A block occurring on the evaluated day, as a minute interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBlock {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

/// Blocks active on `date`, ascending by start time.
pub fn blocks_for_day(blocks: &[FixedBlock], date: NaiveDate) -> Vec<ActiveBlock> {
    let mut active: Vec<ActiveBlock> = blocks
        .iter()
        .filter(|b| b.recurrence.is_active_on(date))
        .map(|b| ActiveBlock {
            name: b.name.clone(),
            start: b.start,
            end: b.end,
        })
        .collect();
    active.sort_by_key(|b| b.start);
    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, start: &str, end: &str) -> RawFixedBlock {
        RawFixedBlock {
            name: name.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    fn block(name: &str, start: &str, end: &str, recurrence: Recurrence) -> FixedBlock {
        FixedBlock {
            name: name.to_string(),
            start: time_to_minutes(start).unwrap(),
            end: time_to_minutes(end).unwrap(),
            recurrence,
        }
    }

    // 2026-03-04 is a Wednesday.
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    #[test]
    fn selects_blocks_for_the_day_sorted() {
        let blocks = vec![
            block("Standup", "15:00", "15:15", Recurrence::Daily),
            block("Gym", "07:00", "08:00", Recurrence::Weekly(Weekday::Wed)),
            block("Review", "10:00", "11:00", Recurrence::Weekly(Weekday::Thu)),
            block("Dentist", "11:00", "12:00", Recurrence::OneTime(wednesday())),
            block(
                "Flight",
                "13:00",
                "14:00",
                Recurrence::OneTime(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()),
            ),
        ];

        let active = blocks_for_day(&blocks, wednesday());
        let names: Vec<&str> = active.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Gym", "Dentist", "Standup"]);
        assert_eq!(active[0].start, 420);
    }

    #[test]
    fn weekly_block_without_week_day_is_rejected() {
        let mut r = raw("Team sync", "10:00", "11:00");
        r.recurrence = Some("weekly".to_string());
        assert!(matches!(r.normalize(), Err(Error::Validation(_))));
    }

    #[test]
    fn one_time_block_without_date_is_rejected() {
        let mut r = raw("Dentist", "10:00", "11:00");
        r.recurrence = Some("one-time".to_string());
        assert!(r.normalize().is_err());
    }

    #[test]
    fn block_must_start_before_it_ends() {
        let mut r = raw("Backwards", "13:00", "12:00");
        r.recurrence = Some("daily".to_string());
        assert!(r.normalize().is_err());
        r.end_time = "13:00".to_string();
        assert!(r.normalize().is_err());
    }

    #[test]
    fn legacy_recurring_flag_maps_to_daily() {
        let mut r = raw("Lunch", "12:00", "13:00");
        r.recurring = Some(true);
        let b = r.normalize().unwrap().unwrap();
        assert_eq!(b.recurrence, Recurrence::Daily);

        r.recurring = Some(false);
        assert_eq!(r.normalize().unwrap(), None);

        r.recurring = None;
        assert_eq!(r.normalize().unwrap(), None);
    }

    #[test]
    fn serializes_to_canonical_shape() {
        let b = block("Gym", "07:00", "08:00", Recurrence::Weekly(Weekday::Wed));
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["startTime"], "07:00");
        assert_eq!(v["recurrence"], "weekly");
        assert_eq!(v["weekDay"], "Wednesday");
        assert!(v["date"].is_null());
        assert!(v.get("recurring").is_none());
    }
}
