//! Progress percentage, expected completions and streaks.

use chrono::NaiveDate;

use crate::error::Result;
use crate::goal::{Frequency, Goal, GoalId, HistoryEntry, Outcome, find_goal_mut};

/// Result of [`calculate_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub expected_completions: u32,
    pub progress_percentage: u32,
}

/// Expected completions since creation and the resulting percentage.
pub fn calculate_progress(goal: &Goal, today: NaiveDate) -> Progress {
    let completed = goal.metric.completed;

    let expected = match goal.frequency {
        Frequency::OneTime => {
            return Progress {
                expected_completions: 1,
                progress_percentage: if completed > 0 { 100 } else { 0 },
            };
        }
        Frequency::Daily => days_between(goal.created_date, today).max(1),
        Frequency::Weekly => days_between(goal.created_date, today).div_euclid(7).max(1),
    };
    // expected is >= 1 here
    let expected = u32::try_from(expected).unwrap_or(u32::MAX);

    let pct = (100.0 * f64::from(completed) / f64::from(expected)).round();
    Progress {
        expected_completions: expected,
        progress_percentage: pct.min(100.0) as u32,
    }
}

/// The streak the goal would have after being completed on `today`.
///
/// Daily goals keep the streak when the previous completion was at most one
/// day ago, weekly goals when it was at most one week ago; otherwise the
/// streak restarts at 1.
pub fn calculate_streak(goal: &Goal, today: NaiveDate) -> u32 {
    if goal.frequency == Frequency::OneTime {
        return 0;
    }
    let Some(last) = goal.metric.last_completed else {
        return 1;
    };

    let days = days_between(last, today);
    let continues = match goal.frequency {
        Frequency::Daily => days <= 1,
        Frequency::Weekly => days.div_euclid(7) <= 1,
        Frequency::OneTime => false,
    };

    if continues { goal.metric.streak + 1 } else { 1 }
}

/// Record a completion for `id` and recompute its metrics.
pub fn complete_task(goals: &mut [Goal], id: GoalId, today: NaiveDate) -> Result<&Goal> {
    let goal = find_goal_mut(goals, id)?;

    let streak = calculate_streak(goal, today);
    goal.metric.completed += 1;
    goal.metric.last_completed = Some(today);
    goal.metric.streak = streak;

    let progress = calculate_progress(goal, today);
    goal.metric.expected_completions = progress.expected_completions;
    goal.metric.progress_percentage = progress.progress_percentage;

    goal.history.push(HistoryEntry {
        date: today,
        outcome: Outcome::Completed,
        reason: None,
    });

    Ok(&*goal)
}

/// Record a skip. Counters, streak and progress are left alone.
pub fn skip_task<'a>(
    goals: &'a mut [Goal],
    id: GoalId,
    reason: Option<&str>,
    today: NaiveDate,
) -> Result<&'a Goal> {
    let goal = find_goal_mut(goals, id)?;
    goal.history.push(HistoryEntry {
        date: today,
        outcome: Outcome::Skipped,
        reason: reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    });
    Ok(&*goal)
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
