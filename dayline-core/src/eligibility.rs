//! Which goals produce a task on a given day.

use chrono::NaiveDate;

use crate::goal::{Frequency, Goal};
use crate::time::weekday_of;

/// Whether `goal` should be scheduled on `today`.
///
/// A one-time goal completed on an earlier day is eligible again once its
/// due date has passed; only a same-day completion hides it.
pub fn should_generate_task_today(goal: &Goal, today: NaiveDate) -> bool {
    if goal.metric.last_completed == Some(today) {
        return false;
    }

    match goal.frequency {
        Frequency::Daily => today <= goal.target_date,
        Frequency::Weekly => {
            goal.week_day == Some(weekday_of(today)) && today <= goal.target_date
        }
        Frequency::OneTime => today >= goal.target_date,
    }
}
