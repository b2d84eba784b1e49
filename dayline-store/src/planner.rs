//! Planner: the read-modify-write cycles shared by every front end.
//!
//! Each method loads what it needs from the repository, runs the pure core
//! operation, and writes the result back. The scheduler never writes.

use chrono::{Local, NaiveDate};
use dayline_core::{
    DayConfig, DaySchedule, FixedBlock, Goal, GoalId, GoalPatch, NewGoal, RawFixedBlock,
    complete_task, generate_schedule, goal, next_goal_id, skip_task,
};
use tracing::info;

use crate::error::Result;
use crate::repo::{ConfigRepository, GoalRepository};

/// Source of "today" and of creation timestamps.
pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn now_millis(&self) -> i64;
}

/// Local machine time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Pinned clock for tests and for `--date` overrides.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub millis: i64,
}

impl FixedClock {
    pub fn on(today: NaiveDate) -> Self {
        let millis = today
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self { today, millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.millis
    }
}

pub struct Planner<R, C = SystemClock> {
    repo: R,
    clock: C,
}

impl<R> Planner<R, SystemClock>
where
    R: GoalRepository + ConfigRepository,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: SystemClock,
        }
    }
}

impl<R, C> Planner<R, C>
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
{
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // === Goals ===

    pub fn goals(&self) -> Result<Vec<Goal>> {
        self.repo.load_goals()
    }

    pub fn goal(&self, id: GoalId) -> Result<Goal> {
        let goals = self.repo.load_goals()?;
        Ok(goal::find_goal(&goals, id)?.clone())
    }

    pub fn add_goal(&self, draft: NewGoal) -> Result<Goal> {
        let mut goals = self.repo.load_goals()?;
        let id = next_goal_id(&goals, self.clock.now_millis());
        let goal = draft.into_goal(id, self.clock.today())?;
        goals.push(goal.clone());
        self.repo.save_goals(&goals)?;
        info!(id, description = %goal.description, "goal added");
        Ok(goal)
    }

    pub fn update_goal(&self, id: GoalId, patch: &GoalPatch) -> Result<Goal> {
        let mut goals = self.repo.load_goals()?;
        let slot = goal::find_goal_mut(&mut goals, id)?;
        let updated = patch.apply(slot)?;
        *slot = updated.clone();
        self.repo.save_goals(&goals)?;
        info!(id, "goal updated");
        Ok(updated)
    }

    pub fn delete_goal(&self, id: GoalId) -> Result<Goal> {
        let mut goals = self.repo.load_goals()?;
        let removed = goal::remove_goal(&mut goals, id)?;
        self.repo.save_goals(&goals)?;
        info!(id, "goal deleted");
        Ok(removed)
    }

    /// Mark today's task for `id` as done and persist the new metrics.
    pub fn complete(&self, id: GoalId) -> Result<Goal> {
        let mut goals = self.repo.load_goals()?;
        let updated = complete_task(&mut goals, id, self.clock.today())?.clone();
        self.repo.save_goals(&goals)?;
        info!(
            id,
            completed = updated.metric.completed,
            streak = updated.metric.streak,
            progress = updated.metric.progress_percentage,
            "goal completed"
        );
        Ok(updated)
    }

    pub fn skip(&self, id: GoalId, reason: Option<&str>) -> Result<Goal> {
        let mut goals = self.repo.load_goals()?;
        let updated = skip_task(&mut goals, id, reason, self.clock.today())?.clone();
        self.repo.save_goals(&goals)?;
        info!(id, reason = reason.unwrap_or(""), "goal skipped");
        Ok(updated)
    }

    // === Config ===

    pub fn config(&self) -> Result<DayConfig> {
        self.repo.load_config()
    }

    pub fn set_start_time(&self, start: &str) -> Result<DayConfig> {
        self.edit_config(|cfg| cfg.set_start_time(start))
    }

    pub fn set_available_hours(&self, hours: i64) -> Result<DayConfig> {
        self.edit_config(|cfg| cfg.set_available_hours(hours))
    }

    pub fn add_fixed_block(&self, raw: &RawFixedBlock) -> Result<FixedBlock> {
        let mut cfg = self.repo.load_config()?;
        let block = cfg.add_fixed_block(raw)?.clone();
        self.repo.save_config(&cfg)?;
        info!(name = %block.name, "fixed block added");
        Ok(block)
    }

    /// Remove by 0-based position in the configured list.
    pub fn remove_fixed_block(&self, index: usize) -> Result<FixedBlock> {
        let mut cfg = self.repo.load_config()?;
        let removed = cfg.remove_fixed_block(index)?;
        self.repo.save_config(&cfg)?;
        info!(name = %removed.name, "fixed block removed");
        Ok(removed)
    }

    fn edit_config<F>(&self, edit: F) -> Result<DayConfig>
    where
        F: FnOnce(&mut DayConfig) -> dayline_core::Result<()>,
    {
        let mut cfg = self.repo.load_config()?;
        edit(&mut cfg)?;
        self.repo.save_config(&cfg)?;
        Ok(cfg)
    }

    // === Schedule ===

    /// Today's timeline.
    pub fn schedule(&self) -> Result<DaySchedule> {
        self.schedule_for(self.clock.today())
    }

    pub fn schedule_for(&self, date: NaiveDate) -> Result<DaySchedule> {
        let goals = self.repo.load_goals()?;
        let cfg = self.repo.load_config()?;
        Ok(generate_schedule(&goals, &cfg, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryStore;
    use dayline_core::Error;

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    fn planner() -> Planner<MemoryStore, FixedClock> {
        Planner::with_clock(MemoryStore::new(), FixedClock::on(wednesday()))
    }

    fn draft(description: &str, priority: &str, minutes: i64) -> NewGoal {
        NewGoal {
            description: description.to_string(),
            frequency: "daily".to_string(),
            week_day: None,
            target_date: "2026-12-31".to_string(),
            priority: priority.to_string(),
            daily_minutes: minutes,
        }
    }

    #[test]
    fn add_assigns_unique_ids() {
        let p = planner();
        let a = p.add_goal(draft("a", "high", 30)).unwrap();
        let b = p.add_goal(draft("b", "low", 30)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(p.goals().unwrap().len(), 2);
    }

    #[test]
    fn invalid_draft_is_not_saved() {
        let p = planner();
        let err = p.add_goal(draft("a", "urgent", 30)).unwrap_err();
        assert!(err.is_validation());
        assert!(p.goals().unwrap().is_empty());
    }

    #[test]
    fn oversized_minutes_are_rejected_and_schedule_still_builds() {
        let p = planner();
        p.add_goal(draft("Read", "high", 30)).unwrap();
        let err = p.add_goal(draft("Marathon", "high", 4_294_967_000)).unwrap_err();
        assert!(err.is_validation());

        let s = p.schedule().unwrap();
        assert_eq!(s.tasks.len(), 1);
        assert_eq!(s.total_minutes, 30);
    }

    #[test]
    fn complete_persists_metrics_and_hides_task() {
        let p = planner();
        let g = p.add_goal(draft("Read", "high", 30)).unwrap();
        assert_eq!(p.schedule().unwrap().tasks.len(), 1);

        let done = p.complete(g.id).unwrap();
        assert_eq!(done.metric.completed, 1);
        assert_eq!(p.goal(g.id).unwrap().metric.completed, 1);
        assert!(p.schedule().unwrap().tasks.is_empty());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let p = planner();
        assert!(p.complete(1).unwrap_err().is_not_found());
        assert!(p.skip(1, None).unwrap_err().is_not_found());
        assert!(p.delete_goal(1).unwrap_err().is_not_found());
    }

    #[test]
    fn skip_keeps_task_scheduled() {
        let p = planner();
        let g = p.add_goal(draft("Run", "medium", 20)).unwrap();
        let skipped = p.skip(g.id, Some("rain")).unwrap();
        assert_eq!(skipped.metric.completed, 0);
        assert_eq!(skipped.history.len(), 1);
        assert_eq!(p.schedule().unwrap().tasks.len(), 1);
    }

    #[test]
    fn update_and_delete() {
        let p = planner();
        let g = p.add_goal(draft("Write", "low", 30)).unwrap();
        let patch = GoalPatch {
            priority: Some("high".to_string()),
            ..Default::default()
        };
        let updated = p.update_goal(g.id, &patch).unwrap();
        assert_eq!(updated.priority, dayline_core::Priority::High);

        p.delete_goal(g.id).unwrap();
        assert!(p.goals().unwrap().is_empty());
    }

    #[test]
    fn rejected_block_leaves_stored_config() {
        let p = planner();
        let raw = RawFixedBlock {
            name: "Sync".to_string(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            recurrence: Some("weekly".to_string()),
            ..Default::default()
        };
        let err = p.add_fixed_block(&raw).unwrap_err();
        assert!(matches!(err, crate::StoreError::Core(Error::Validation(_))));
        assert!(p.config().unwrap().fixed_blocks.is_empty());
    }

    #[test]
    fn config_edits_validate() {
        let p = planner();
        assert!(p.set_available_hours(30).is_err());
        assert!(p.set_start_time("7am").is_err());
        let cfg = p.set_start_time("7:30").unwrap();
        assert_eq!(cfg.start_time, "07:30");
        assert_eq!(p.config().unwrap().start_time, "07:30");
    }

    #[test]
    fn schedule_routes_around_blocks() {
        let p = planner();
        p.add_fixed_block(&RawFixedBlock {
            name: "Lunch".to_string(),
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            recurrence: Some("daily".to_string()),
            ..Default::default()
        })
        .unwrap();
        p.add_goal(draft("Deep work", "high", 240)).unwrap();

        let s = p.schedule().unwrap();
        assert_eq!(s.tasks.len(), 3);
        assert_eq!(s.tasks[2].description, "Deep work (Part 2)");
    }
}
