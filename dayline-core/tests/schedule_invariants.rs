//! Randomized checks over generated schedules: entries never overlap, are
//! sorted, and every goal gets exactly its planned minutes.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use dayline_core::{
    DayConfig, FixedBlock, Frequency, Goal, GoalId, Metric, Priority, Recurrence,
    generate_schedule, minutes_to_time, should_generate_task_today,
};
use proptest::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn goals() -> impl Strategy<Value = Vec<Goal>> {
    prop::collection::vec((priority(), 1u32..=240, any::<bool>()), 0..8).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (priority, minutes, done_today))| {
                let mut metric = Metric::new(minutes);
                if done_today {
                    metric.last_completed = Some(today());
                }
                Goal {
                    id: i as GoalId + 1,
                    description: format!("goal {}", i + 1),
                    frequency: Frequency::Daily,
                    week_day: None,
                    target_date: today() + Duration::days(10),
                    priority,
                    created_date: today() - Duration::days(3),
                    metric,
                    history: Vec::new(),
                }
            })
            .collect()
    })
}

fn blocks() -> impl Strategy<Value = Vec<FixedBlock>> {
    prop::collection::vec((0u32..1380, 5u32..=120), 0..5).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (start, len))| FixedBlock {
                name: format!("block {}", i + 1),
                start,
                end: (start + len).min(1439),
                recurrence: Recurrence::Daily,
            })
            .collect()
    })
}

fn config() -> impl Strategy<Value = DayConfig> {
    (0u32..=720, 1u32..=24, blocks()).prop_map(|(start, hours, fixed_blocks)| DayConfig {
        start_time: minutes_to_time(start),
        available_hours: hours,
        fixed_blocks,
    })
}

proptest! {
    #[test]
    fn entries_are_sorted_and_disjoint(goals in goals(), cfg in config()) {
        let s = generate_schedule(&goals, &cfg, today());
        for pair in s.tasks.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
            prop_assert!(
                pair[0].end <= pair[1].start,
                "{:?} overlaps {:?}", pair[0], pair[1]
            );
        }
        for e in &s.tasks {
            prop_assert!(e.start < e.end);
        }
    }

    #[test]
    fn each_goal_gets_its_planned_minutes(goals in goals(), cfg in config()) {
        let s = generate_schedule(&goals, &cfg, today());

        let mut per_goal: HashMap<GoalId, u32> = HashMap::new();
        for e in s.tasks.iter().filter(|e| !e.is_fixed) {
            *per_goal.entry(e.goal_id.unwrap()).or_default() += e.duration();
        }

        for g in &goals {
            let expected = if should_generate_task_today(g, today()) {
                g.metric.daily_minutes
            } else {
                0
            };
            prop_assert_eq!(per_goal.get(&g.id).copied().unwrap_or(0), expected);
        }

        let total: u32 = per_goal.values().sum();
        prop_assert_eq!(total, s.total_minutes);
        prop_assert_eq!(s.overcommitted, s.total_minutes > s.available_minutes);
    }

    #[test]
    fn fixed_entries_are_never_counted(goals in goals(), cfg in config()) {
        let s = generate_schedule(&goals, &cfg, today());
        for e in s.tasks.iter().filter(|e| e.is_fixed) {
            prop_assert!(e.goal_id.is_none());
            prop_assert!(e.priority.is_none());
        }
    }

    #[test]
    fn only_later_parts_are_labelled(goals in goals(), cfg in config()) {
        let s = generate_schedule(&goals, &cfg, today());
        let mut seen: HashMap<GoalId, u32> = HashMap::new();
        for e in s.tasks.iter().filter(|e| !e.is_fixed) {
            let n = seen.entry(e.goal_id.unwrap()).or_default();
            *n += 1;
            if *n == 1 {
                prop_assert!(!e.description.contains("(Part"));
            } else {
                let suffix = format!("(Part {})", n);
                prop_assert!(e.description.ends_with(&suffix));
            }
        }
    }
}
