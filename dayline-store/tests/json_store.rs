use chrono::NaiveDate;
use dayline_core::{NewGoal, RawFixedBlock, Recurrence};
use dayline_store::{ConfigRepository, FixedClock, GoalRepository, JsonStore, Planner, StoreError};
use tempfile::tempdir;

fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
}

fn draft(description: &str) -> NewGoal {
    NewGoal {
        description: description.to_string(),
        frequency: "daily".to_string(),
        week_day: None,
        target_date: "2026-12-31".to_string(),
        priority: "high".to_string(),
        daily_minutes: 45,
    }
}

#[test]
fn empty_directory_yields_defaults() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();

    assert!(store.load_goals().unwrap().is_empty());
    let cfg = store.load_config().unwrap();
    assert_eq!(cfg.start_time, "09:00");
    assert_eq!(cfg.available_hours, 8);
}

#[test]
fn goals_survive_a_reopen() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let planner = Planner::with_clock(store, FixedClock::on(wednesday()));
    let goal = planner.add_goal(draft("Read")).unwrap();
    planner.complete(goal.id).unwrap();

    let reopened = JsonStore::open(dir.path()).unwrap();
    let goals = reopened.load_goals().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].metric.completed, 1);
    assert_eq!(goals[0].metric.last_completed, Some(wednesday()));

    let raw = std::fs::read_to_string(dir.path().join("goals.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["metric"]["lastCompleted"], "2026-03-04");
    assert_eq!(value[0]["frequency"], "daily");
}

#[test]
fn legacy_config_is_normalized_on_load() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{
            "startTime": "08:00",
            "fixedBlocks": [
                { "name": "Lunch", "startTime": "12:00", "endTime": "13:00", "recurring": true },
                { "name": "Dropped", "startTime": "14:00", "endTime": "15:00", "recurring": false }
            ]
        }"#,
    )
    .unwrap();

    let store = JsonStore::open(dir.path()).unwrap();
    let cfg = store.load_config().unwrap();
    assert_eq!(cfg.start_time, "08:00");
    assert_eq!(cfg.available_hours, 8);
    assert_eq!(cfg.fixed_blocks.len(), 1);
    assert_eq!(cfg.fixed_blocks[0].recurrence, Recurrence::Daily);

    // saving writes the canonical shape
    store.save_config(&cfg).unwrap();
    let raw = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(raw.contains("\"recurrence\": \"daily\""));
    assert!(!raw.contains("recurring"));
}

#[test]
fn non_array_blocks_are_coerced() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "availableHours": 6, "fixedBlocks": "lunch at noon" }"#,
    )
    .unwrap();
    let cfg = JsonStore::open(dir.path()).unwrap().load_config().unwrap();
    assert_eq!(cfg.available_hours, 6);
    assert!(cfg.fixed_blocks.is_empty());
}

#[test]
fn corrupt_goals_file_is_reported() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("goals.json"), "[{ not json").unwrap();
    let err = JsonStore::open(dir.path()).unwrap().load_goals().unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }));
}

#[test]
fn weekly_block_without_day_is_rejected_and_file_untouched() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let planner = Planner::with_clock(store, FixedClock::on(wednesday()));
    planner
        .add_fixed_block(&RawFixedBlock {
            name: "Lunch".to_string(),
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            recurrence: Some("daily".to_string()),
            ..Default::default()
        })
        .unwrap();
    let before = std::fs::read_to_string(dir.path().join("config.json")).unwrap();

    let err = planner
        .add_fixed_block(&RawFixedBlock {
            name: "Team sync".to_string(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            recurrence: Some("weekly".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(err.is_validation());

    let after = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn invalid_stored_goals_are_reported() {
    let dir = tempdir().unwrap();
    let goal = |week_day: &str, minutes: u64| {
        format!(
            r#"[{{
                "id": 7,
                "description": "Review",
                "frequency": "weekly",
                "weekDay": {week_day},
                "targetDate": "2026-12-31",
                "priority": "medium",
                "createdDate": "2026-03-01",
                "metric": {{ "dailyMinutes": {minutes} }}
            }}]"#
        )
    };
    let store = JsonStore::open(dir.path()).unwrap();

    for (week_day, minutes) in [("null", 30), ("\"Monday\"", 0), ("\"Monday\"", 4_294_967_000)] {
        std::fs::write(dir.path().join("goals.json"), goal(week_day, minutes)).unwrap();
        let err = store.load_goals().unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidGoal { id: 7, .. }),
            "{week_day} / {minutes}: {err}"
        );
        assert!(!err.is_validation());
    }

    std::fs::write(dir.path().join("goals.json"), goal("\"Monday\"", 30)).unwrap();
    assert_eq!(store.load_goals().unwrap().len(), 1);
}
