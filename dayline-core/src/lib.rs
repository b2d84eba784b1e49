//! dayline-core: goal model, daily schedule generation and progress tracking.
//!
//! Everything here is a pure function of its inputs. Loading and saving
//! goals/config is done by `dayline-store`; callers pass in the evaluation
//! date (normally the local date on the host clock).

pub mod block;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod goal;
pub mod progress;
pub mod scheduler;
pub mod time;

pub use block::{ActiveBlock, FixedBlock, RawFixedBlock, Recurrence, blocks_for_day};
pub use config::DayConfig;
pub use eligibility::should_generate_task_today;
pub use error::{Error, Result};
pub use goal::{
    Frequency, Goal, GoalId, GoalPatch, HistoryEntry, MAX_DAILY_MINUTES, Metric, NewGoal, Outcome,
    Priority, next_goal_id,
};
pub use progress::{Progress, calculate_progress, calculate_streak, complete_task, skip_task};
pub use scheduler::{
    DaySchedule, ScheduleEntry, TASK_BUFFER_MINUTES, generate_schedule,
    generate_schedule_with_buffer,
};
pub use time::{format_time, minutes_to_time, time_to_minutes};
