use chrono::NaiveDate;
use taskboard_tool::{
    BoardMetadata, Priority, RescheduleError, ReschedulePolicy, Task, TaskBoard,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_task() -> Task {
    let mut task = Task::new(7, "Quarterly review", d(2025, 1, 6));
    task.category = "work".into();
    task.priority = Priority::High;
    task.estimated_minutes = Some(45);
    task
}

#[test]
fn reschedule_changes_only_the_date() {
    let mut board = TaskBoard::new();
    board.upsert_task_record(sample_task()).unwrap();

    let moved = board.reschedule_task(7, d(2025, 1, 20)).unwrap();

    assert_eq!(moved.date, d(2025, 1, 20));
    assert_eq!(moved.title, "Quarterly review");
    assert_eq!(moved.category, "work");
    assert_eq!(moved.priority, Priority::High);
    assert_eq!(moved.estimated_minutes, Some(45));
    assert!(!moved.completed);

    // The stored row agrees with the returned task.
    let stored = board.find_task(7).unwrap().expect("task 7");
    assert_eq!(stored, moved);
}

#[test]
fn reschedule_to_the_same_date_succeeds() {
    let mut board = TaskBoard::new();
    board.upsert_task_record(sample_task()).unwrap();

    let moved = board.reschedule_task(7, d(2025, 1, 6)).unwrap();
    assert_eq!(moved.date, d(2025, 1, 6));
}

#[test]
fn reschedule_missing_task_reports_not_found() {
    let mut board = TaskBoard::new();
    let err = board.reschedule_task(42, d(2025, 3, 10)).unwrap_err();

    assert!(matches!(err, RescheduleError::TaskNotFound { task_id: 42 }));
    assert_eq!(err.to_string(), "task 42 not found");
}

#[test]
fn parse_reschedule_date_accepts_iso_and_rejects_the_rest() {
    assert_eq!(
        TaskBoard::parse_reschedule_date("2025-02-01").unwrap(),
        d(2025, 2, 1)
    );
    assert_eq!(
        TaskBoard::parse_reschedule_date(" 2025-02-01 ").unwrap(),
        d(2025, 2, 1)
    );

    let err = TaskBoard::parse_reschedule_date("02/01/2025").unwrap_err();
    match err {
        RescheduleError::InvalidDate { ref input } => assert_eq!(input, "02/01/2025"),
        other => panic!("expected InvalidDate, got {other:?}"),
    }
    assert!(err.to_string().contains("expected YYYY-MM-DD"));

    assert!(TaskBoard::parse_reschedule_date("2025-02-31").is_err());
}

#[test]
fn complete_low_priority_marks_only_open_low_tasks() {
    let mut board = TaskBoard::new();

    let mut low_open_a = Task::new(1, "Tidy desk", d(2025, 1, 6));
    low_open_a.priority = Priority::Low;
    let mut low_open_b = Task::new(2, "Sort inbox", d(2025, 1, 7));
    low_open_b.priority = Priority::Low;
    let mut low_done = Task::new(3, "Water plants", d(2025, 1, 5));
    low_done.priority = Priority::Low;
    low_done.completed = true;
    let high_open = sample_task();

    for task in [low_open_a, low_open_b, low_done, high_open] {
        board.upsert_task_record(task).unwrap();
    }

    assert_eq!(board.complete_low_priority_tasks().unwrap(), 2);

    let tasks = board.tasks().unwrap();
    for task in &tasks {
        if task.priority == Priority::Low {
            assert!(task.completed, "low task {} should be complete", task.id);
        }
    }
    assert!(!board.find_task(7).unwrap().expect("task 7").completed);

    // Second run finds nothing left to mark.
    assert_eq!(board.complete_low_priority_tasks().unwrap(), 0);
}

#[test]
fn complete_low_priority_on_an_empty_board_is_zero() {
    let mut board = TaskBoard::new();
    assert_eq!(board.complete_low_priority_tasks().unwrap(), 0);
}

#[test]
fn delete_task_reports_whether_a_row_went_away() {
    let mut board = TaskBoard::new();
    board.upsert_task_record(sample_task()).unwrap();

    assert!(board.delete_task(7).unwrap());
    assert!(board.find_task(7).unwrap().is_none());
    assert!(!board.delete_task(7).unwrap());
}

#[test]
fn overdue_tasks_are_open_and_strictly_before_today() {
    let today = d(2025, 1, 10);
    let mut board = TaskBoard::new();

    board.upsert_task(1, "Yesterday", d(2025, 1, 9)).unwrap();
    board.upsert_task(2, "Today", today).unwrap();
    board.upsert_task(3, "Tomorrow", d(2025, 1, 11)).unwrap();
    let mut done = Task::new(4, "Old but done", d(2025, 1, 2));
    done.completed = true;
    board.upsert_task_record(done).unwrap();

    let overdue = board.overdue_tasks(today).unwrap();
    let ids: Vec<i32> = overdue.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn upsert_task_record_rewrites_every_field() {
    let mut board = TaskBoard::new();
    board.upsert_task_record(sample_task()).unwrap();

    let mut replacement = sample_task();
    replacement.title = "Annual review".into();
    replacement.category = "planning".into();
    replacement.date = d(2025, 2, 14);
    replacement.completed = true;
    replacement.priority = Priority::Low;
    replacement.estimated_minutes = None;
    board.upsert_task_record(replacement.clone()).unwrap();

    assert_eq!(board.dataframe().height(), 1);
    let stored = board.find_task(7).unwrap().expect("task 7");
    assert_eq!(stored, replacement);
}

#[test]
fn from_tasks_rejects_duplicate_ids() {
    let tasks = vec![
        Task::new(1, "A", d(2025, 1, 6)),
        Task::new(1, "B", d(2025, 1, 7)),
    ];
    let err = TaskBoard::from_tasks(BoardMetadata::default(), ReschedulePolicy::default(), tasks)
        .unwrap_err();
    assert!(
        err.to_string().contains("duplicate task id"),
        "unexpected message: {err}"
    );
}

#[test]
fn upsert_rejects_blank_titles() {
    let mut board = TaskBoard::new();
    let err = board.upsert_task(1, "   ", d(2025, 1, 6)).unwrap_err();
    assert!(
        err.to_string().contains("non-empty title"),
        "unexpected message: {err}"
    );
}

#[test]
fn metadata_and_policy_round_trip_through_setters() {
    let mut board = TaskBoard::new();
    assert_eq!(board.board_name(), "New Board");

    board.set_board_name("Sprint 12");
    board.set_board_description("Two week push");
    board.set_owner("dana");
    assert_eq!(board.board_name(), "Sprint 12");
    assert_eq!(board.board_description(), "Two week push");
    assert_eq!(board.owner(), "dana");

    board.set_policy(ReschedulePolicy {
        horizon_days: 7,
        ..ReschedulePolicy::default()
    });
    assert_eq!(board.policy().horizon_days, 7);

    board.reset_policy();
    assert_eq!(board.policy().horizon_days, 14);
    assert_eq!(board.policy().max_tasks_per_day, 3);
    assert_eq!(board.policy().max_hours_per_day, 5);
    assert_eq!(board.policy().day_full_hours, 4);
}
