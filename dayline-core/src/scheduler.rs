//! Daily schedule generation.
//!
//! Eligible goals are ordered by priority then duration and laid out on a
//! single cursor starting at the configured start time. When a task would
//! run into a fixed block it is cut at the block's start, the block is
//! emitted, and the rest continues after the block as `(Part N)`.

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::block::{ActiveBlock, blocks_for_day};
use crate::config::DayConfig;
use crate::eligibility::should_generate_task_today;
use crate::goal::{Goal, GoalId, Priority};
use crate::time::format_time;

/// Gap left after every task (not after fixed blocks).
pub const TASK_BUFFER_MINUTES: u32 = 10;

/// One row of the day's timeline. Times are minutes since midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// `None` for fixed blocks.
    pub goal_id: Option<GoalId>,
    pub description: String,
    pub start: u32,
    pub end: u32,
    pub priority: Option<Priority>,
    pub is_fixed: bool,
}

impl ScheduleEntry {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }

    pub fn start_time(&self) -> String {
        format_time(self.start)
    }

    pub fn end_time(&self) -> String {
        format_time(self.end)
    }
}

impl Serialize for ScheduleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ScheduleEntry", 8)?;
        if let Some(id) = self.goal_id {
            s.serialize_field("goalId", &id)?;
        }
        s.serialize_field("description", &self.description)?;
        s.serialize_field("startTime", &format_time(self.start))?;
        s.serialize_field("endTime", &format_time(self.end))?;
        s.serialize_field("startMinutes", &self.start)?;
        s.serialize_field("endMinutes", &self.end)?;
        s.serialize_field("duration", &self.duration())?;
        if let Some(p) = self.priority {
            s.serialize_field("priority", &p)?;
        }
        s.serialize_field("isFixed", &self.is_fixed)?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub tasks: Vec<ScheduleEntry>,
    pub start: u32,
    pub end: u32,
    /// Task minutes only; fixed blocks are not counted.
    pub total_minutes: u32,
    pub available_minutes: u32,
    pub overcommitted: bool,
}

impl DaySchedule {
    pub fn start_time(&self) -> String {
        format_time(self.start)
    }

    pub fn end_time(&self) -> String {
        format_time(self.end)
    }
}

impl Serialize for DaySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DaySchedule", 6)?;
        s.serialize_field("tasks", &self.tasks)?;
        s.serialize_field("startTime", &self.start_time())?;
        s.serialize_field("endTime", &self.end_time())?;
        s.serialize_field("totalMinutes", &self.total_minutes)?;
        s.serialize_field("availableMinutes", &self.available_minutes)?;
        s.serialize_field("overcommitted", &self.overcommitted)?;
        s.end()
    }
}

/// Build `today`'s timeline with the standard buffer.
pub fn generate_schedule(goals: &[Goal], config: &DayConfig, today: NaiveDate) -> DaySchedule {
    generate_schedule_with_buffer(goals, config, TASK_BUFFER_MINUTES, today)
}

pub fn generate_schedule_with_buffer(
    goals: &[Goal],
    config: &DayConfig,
    buffer: u32,
    today: NaiveDate,
) -> DaySchedule {
    let blocks = blocks_for_day(&config.fixed_blocks, today);

    let mut ordered: Vec<&Goal> = goals
        .iter()
        .filter(|g| should_generate_task_today(g, today))
        .collect();
    // stable: equal priority + duration keeps stored order
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.metric.daily_minutes.cmp(&a.metric.daily_minutes))
    });

    let start = config.start_minutes();
    let mut timeline = Timeline::new(start, buffer);
    for goal in ordered {
        timeline.place(goal, &blocks);
    }

    let available_minutes = config.available_minutes();
    let end = match timeline.last {
        None => start + available_minutes,
        Some(Last::Task) => timeline.cursor.saturating_sub(buffer),
        Some(Last::Fixed) => timeline.cursor,
    };

    let mut tasks = timeline.entries;
    tasks.sort_by_key(|e| e.start);

    DaySchedule {
        tasks,
        start,
        end,
        total_minutes: timeline.scheduled,
        available_minutes,
        overcommitted: timeline.scheduled > available_minutes,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Task,
    Fixed,
}

struct Timeline {
    entries: Vec<ScheduleEntry>,
    cursor: u32,
    buffer: u32,
    scheduled: u32,
    /// End of the last emitted entry; nothing may start before it.
    floor: u32,
    last: Option<Last>,
}

impl Timeline {
    fn new(start: u32, buffer: u32) -> Self {
        Self {
            entries: Vec::new(),
            cursor: start,
            buffer,
            scheduled: 0,
            floor: 0,
            last: None,
        }
    }

    fn place(&mut self, goal: &Goal, blocks: &[ActiveBlock]) {
        let mut remaining = goal.metric.daily_minutes;
        let mut part = 1;

        while remaining > 0 {
            let proposed_end = self.cursor.saturating_add(remaining);
            let hit = blocks
                .iter()
                .find(|b| self.cursor < b.end && proposed_end >= b.start);

            match hit {
                Some(block) => {
                    if block.start > self.cursor {
                        let len = block.start - self.cursor;
                        self.push_task(goal, self.cursor, block.start, part);
                        remaining -= len;
                        part += 1;
                    }
                    self.push_fixed(block);
                    self.cursor = block.end;
                }
                None => {
                    let end = self.cursor.saturating_add(remaining);
                    self.push_task(goal, self.cursor, end, part);
                    self.cursor = end.saturating_add(self.buffer);
                    remaining = 0;
                }
            }
        }
    }

    fn push_task(&mut self, goal: &Goal, start: u32, end: u32, part: u32) {
        let description = if part > 1 {
            format!("{} (Part {})", goal.description, part)
        } else {
            goal.description.clone()
        };
        self.scheduled = self.scheduled.saturating_add(end - start);
        self.floor = end;
        self.last = Some(Last::Task);
        self.entries.push(ScheduleEntry {
            goal_id: Some(goal.id),
            description,
            start,
            end,
            priority: Some(goal.priority),
            is_fixed: false,
        });
    }

    fn push_fixed(&mut self, block: &ActiveBlock) {
        // overlapping configured blocks: show only the part not already covered
        let start = block.start.max(self.floor);
        if start >= block.end {
            return;
        }
        self.floor = block.end;
        self.last = Some(Last::Fixed);
        self.entries.push(ScheduleEntry {
            goal_id: None,
            description: block.name.clone(),
            start,
            end: block.end,
            priority: None,
            is_fixed: true,
        });
    }
}
