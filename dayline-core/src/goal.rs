//! Goal model: recurring or one-time objectives with a planned duration.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::serde_helpers::{lenient_date, lenient_date_opt, weekday_opt};

/// Goal identifier: a millisecond timestamp taken at creation.
pub type GoalId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    OneTime,
}

impl Frequency {
    pub fn is_recurring(self) -> bool {
        !matches!(self, Frequency::OneTime)
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "one-time" | "onetime" | "once" => Ok(Self::OneTime),
            other => Err(Error::validation(format!(
                "unknown frequency '{other}' (expected daily, weekly or one-time)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::OneTime => "one-time",
        }
    }
}

/// Ordering is by importance: `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Self::High),
            "medium" | "med" | "m" => Ok(Self::Medium),
            "low" | "l" => Ok(Self::Low),
            other => Err(Error::validation(format!(
                "unknown priority '{other}' (expected high, medium or low)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Skipped,
}

/// One completion or skip, appended in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(with = "lenient_date")]
    pub date: NaiveDate,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Planned minutes per occurrence.
    pub daily_minutes: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default = "one")]
    pub expected_completions: u32,
    #[serde(default)]
    pub progress_percentage: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, with = "lenient_date_opt")]
    pub last_completed: Option<NaiveDate>,
}

fn one() -> u32 {
    1
}

impl Metric {
    pub fn new(daily_minutes: u32) -> Self {
        Self {
            daily_minutes,
            completed: 0,
            expected_completions: 1,
            progress_percentage: 0,
            streak: 0,
            last_completed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub description: String,
    pub frequency: Frequency,
    #[serde(default, with = "weekday_opt")]
    pub week_day: Option<Weekday>,
    #[serde(with = "lenient_date")]
    pub target_date: NaiveDate,
    pub priority: Priority,
    #[serde(with = "lenient_date")]
    pub created_date: NaiveDate,
    pub metric: Metric,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Goal {
    /// Re-check the shape invariants of a goal that came from disk or a patch.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::validation("goal description must not be empty"));
        }
        check_daily_minutes(i64::from(self.metric.daily_minutes))?;
        match (self.frequency, self.week_day) {
            (Frequency::Weekly, None) => Err(Error::validation("weekly goals require a weekDay")),
            (Frequency::Daily | Frequency::OneTime, Some(_)) => Err(Error::validation(
                "weekDay is only allowed on weekly goals",
            )),
            _ => Ok(()),
        }
    }
}

/// Upper bound on planned minutes per occurrence: one whole day.
pub const MAX_DAILY_MINUTES: u32 = 24 * 60;

fn check_daily_minutes(minutes: i64) -> Result<u32> {
    if minutes <= 0 {
        return Err(Error::validation("dailyMinutes must be a positive number"));
    }
    match u32::try_from(minutes) {
        Ok(m) if m <= MAX_DAILY_MINUTES => Ok(m),
        _ => Err(Error::validation(format!(
            "dailyMinutes must be at most {MAX_DAILY_MINUTES}"
        ))),
    }
}

/// Draft for a new goal as entered by a user or posted to the API.
///
/// Dates and enums arrive as strings so every front end gets the same
/// validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub description: String,
    pub frequency: String,
    #[serde(default)]
    pub week_day: Option<String>,
    pub target_date: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    pub daily_minutes: i64,
}

fn default_priority() -> String {
    "medium".to_string()
}

impl NewGoal {
    /// Validate the draft and build a goal created on `today`.
    pub fn into_goal(self, id: GoalId, today: NaiveDate) -> Result<Goal> {
        let frequency = Frequency::parse(&self.frequency)?;
        let priority = Priority::parse(&self.priority)?;
        let target_date = crate::time::parse_iso_date(&self.target_date)?;

        let week_day = match frequency {
            Frequency::Weekly => {
                let name = self
                    .week_day
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| Error::validation("weekly goals require a weekDay"))?;
                Some(crate::time::parse_weekday(name)?)
            }
            // ignored for non-weekly goals
            _ => None,
        };

        let daily_minutes = check_daily_minutes(self.daily_minutes)?;

        let goal = Goal {
            id,
            description: self.description.trim().to_string(),
            frequency,
            week_day,
            target_date,
            priority,
            created_date: today,
            metric: Metric::new(daily_minutes),
            history: Vec::new(),
        };
        goal.validate()?;
        Ok(goal)
    }
}

/// Partial update. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub week_day: Option<String>,
    pub target_date: Option<String>,
    pub priority: Option<String>,
    pub daily_minutes: Option<i64>,
}

impl GoalPatch {
    /// Apply onto a copy of `goal`; the original is untouched on error.
    pub fn apply(&self, goal: &Goal) -> Result<Goal> {
        let mut next = goal.clone();

        if let Some(d) = &self.description {
            next.description = d.trim().to_string();
        }
        if let Some(f) = &self.frequency {
            next.frequency = Frequency::parse(f)?;
        }
        if let Some(day) = &self.week_day {
            next.week_day = Some(crate::time::parse_weekday(day)?);
        }
        if next.frequency != Frequency::Weekly {
            next.week_day = None;
        }
        if let Some(t) = &self.target_date {
            next.target_date = crate::time::parse_iso_date(t)?;
        }
        if let Some(p) = &self.priority {
            next.priority = Priority::parse(p)?;
        }
        if let Some(m) = self.daily_minutes {
            next.metric.daily_minutes = check_daily_minutes(m)?;
        }

        next.validate()?;
        Ok(next)
    }
}

/// Pick an id for a new goal: the creation timestamp, bumped past the
/// current maximum if two goals land in the same millisecond.
pub fn next_goal_id(existing: &[Goal], now_millis: i64) -> GoalId {
    let max = existing.iter().map(|g| g.id).max().unwrap_or(i64::MIN);
    if now_millis > max { now_millis } else { max + 1 }
}

pub fn find_goal(goals: &[Goal], id: GoalId) -> Result<&Goal> {
    goals.iter().find(|g| g.id == id).ok_or(Error::NotFound(id))
}

pub fn find_goal_mut(goals: &mut [Goal], id: GoalId) -> Result<&mut Goal> {
    goals.iter_mut().find(|g| g.id == id).ok_or(Error::NotFound(id))
}

/// Remove a goal by id and return it.
pub fn remove_goal(goals: &mut Vec<Goal>, id: GoalId) -> Result<Goal> {
    let idx = goals
        .iter()
        .position(|g| g.id == id)
        .ok_or(Error::NotFound(id))?;
    Ok(goals.remove(idx))
}
