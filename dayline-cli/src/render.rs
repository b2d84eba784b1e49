//! Plain-text views for the CLI and the shell.

use chrono::NaiveDate;
use dayline_core::{
    DayConfig, DaySchedule, Frequency, Goal, format_time, minutes_to_time,
    should_generate_task_today, time::weekday_name,
};
use std::fmt::Write;

/// `"4h 5m"`, `"45m"`, `"2h"`.
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

pub fn render_schedule(s: &DaySchedule, date: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Schedule for {}, {}  ({} - {})\n",
        weekday_name(chrono::Datelike::weekday(&date)),
        date,
        s.start_time(),
        s.end_time()
    );

    if s.tasks.is_empty() {
        out.push_str("Nothing scheduled today.\n");
    }

    for e in &s.tasks {
        let window = format!("{} - {}", format_time(e.start), format_time(e.end));
        let tag = match e.priority {
            Some(p) if !e.is_fixed => p.as_str(),
            _ => "fixed",
        };
        let _ = writeln!(
            out,
            "  {:<20} [{:<6}] {} ({})",
            window,
            tag,
            e.description,
            format_minutes(e.duration())
        );
    }

    let _ = writeln!(
        out,
        "\nScheduled: {} of {} available",
        format_minutes(s.total_minutes),
        format_minutes(s.available_minutes)
    );
    if s.overcommitted {
        let _ = writeln!(
            out,
            "Warning: overcommitted by {}",
            format_minutes(s.total_minutes - s.available_minutes)
        );
    }
    out
}

fn frequency_label(g: &Goal) -> String {
    match (g.frequency, g.week_day) {
        (Frequency::Weekly, Some(day)) => format!("weekly on {}", weekday_name(day)),
        (Frequency::OneTime, _) => format!("one-time, due {}", g.target_date),
        (f, _) => f.as_str().to_string(),
    }
}

/// Numbered goal list. The numbers are what `complete N` / `delete N` take.
pub fn render_goals(goals: &[Goal], today: NaiveDate) -> String {
    if goals.is_empty() {
        return "No goals yet. Add one with `dayline add`.\n".to_string();
    }

    let mut out = String::new();
    for (i, g) in goals.iter().enumerate() {
        let status = if g.metric.last_completed == Some(today) {
            "done today"
        } else if should_generate_task_today(g, today) {
            "due today"
        } else {
            "-"
        };
        let _ = writeln!(
            out,
            "{:>3}. {} [{}] {} | {} | {}% | streak {} | {}",
            i + 1,
            g.description,
            g.priority.as_str(),
            frequency_label(g),
            format_minutes(g.metric.daily_minutes),
            g.metric.progress_percentage,
            g.metric.streak,
            status
        );
    }
    out
}

pub fn render_config(cfg: &DayConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Start time:      {}", cfg.start_time);
    let _ = writeln!(out, "Available hours: {}", cfg.available_hours);
    if cfg.fixed_blocks.is_empty() {
        out.push_str("Fixed blocks:    none\n");
        return out;
    }
    out.push_str("Fixed blocks:\n");
    for (i, b) in cfg.fixed_blocks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} {}-{} ({})",
            i + 1,
            b.name,
            minutes_to_time(b.start),
            minutes_to_time(b.end),
            b.recurrence.label()
        );
    }
    out
}

pub fn render_goal_line(g: &Goal) -> String {
    format!(
        "{}: completed {} | progress {}% ({} expected) | streak {}",
        g.description,
        g.metric.completed,
        g.metric.progress_percentage,
        g.metric.expected_completions,
        g.metric.streak
    )
}
