use chrono::NaiveDate;
use taskboard_tool::{BoardMetadata, ReschedulePolicy, Task, TaskBoard, WorkloadTier};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn board_with(tasks: Vec<Task>) -> TaskBoard {
    TaskBoard::from_tasks(BoardMetadata::default(), ReschedulePolicy::default(), tasks)
        .expect("build board")
}

fn estimated(mut task: Task, minutes: i64) -> Task {
    task.estimated_minutes = Some(minutes);
    task
}

#[test]
fn tier_boundaries_follow_hour_buckets() {
    assert_eq!(WorkloadTier::from_hours(0), WorkloadTier::Light);
    assert_eq!(WorkloadTier::from_hours(2), WorkloadTier::Light);
    assert_eq!(WorkloadTier::from_hours(3), WorkloadTier::Medium);
    assert_eq!(WorkloadTier::from_hours(4), WorkloadTier::Medium);
    assert_eq!(WorkloadTier::from_hours(5), WorkloadTier::Heavy);
}

#[test]
fn empty_day_reports_light_workload() {
    let board = board_with(Vec::new());
    let workload = board.workload_for_date(d(2025, 1, 15)).unwrap();

    assert_eq!(workload.date, d(2025, 1, 15));
    assert_eq!(workload.tasks_count, 0);
    assert_eq!(workload.total_hours, 0);
    assert_eq!(workload.workload, WorkloadTier::Light);
    assert!(workload.tasks.is_empty());
}

#[test]
fn completed_tasks_never_count() {
    let mut done = estimated(Task::new(1, "Long but done", d(2025, 1, 15)), 300);
    done.completed = true;
    let board = board_with(vec![done, Task::new(2, "Open", d(2025, 1, 15))]);

    let workload = board.workload_for_date(d(2025, 1, 15)).unwrap();
    assert_eq!(workload.tasks_count, 1);
    assert_eq!(workload.total_hours, 1);
    assert_eq!(workload.workload, WorkloadTier::Light);
}

#[test]
fn missing_and_zero_estimates_default_to_one_hour() {
    let board = board_with(vec![
        Task::new(1, "No estimate", d(2025, 1, 15)),
        estimated(Task::new(2, "Zero estimate", d(2025, 1, 15)), 0),
    ]);

    let workload = board.workload_for_date(d(2025, 1, 15)).unwrap();
    assert_eq!(workload.tasks_count, 2);
    assert_eq!(workload.total_hours, 2);
    assert_eq!(workload.workload, WorkloadTier::Light);
}

#[test]
fn estimates_round_up_per_task() {
    // 90min -> 2h and 61min -> 2h, summed after rounding.
    let board = board_with(vec![
        estimated(Task::new(1, "Ninety", d(2025, 1, 15)), 90),
        estimated(Task::new(2, "Sixty-one", d(2025, 1, 15)), 61),
    ]);

    let workload = board.workload_for_date(d(2025, 1, 15)).unwrap();
    assert_eq!(workload.total_hours, 4);
    assert_eq!(workload.workload, WorkloadTier::Medium);
}

#[test]
fn heavy_day_crosses_four_hours() {
    let board = board_with(vec![
        estimated(Task::new(1, "A", d(2025, 1, 15)), 120),
        estimated(Task::new(2, "B", d(2025, 1, 15)), 120),
        estimated(Task::new(3, "C", d(2025, 1, 15)), 60),
    ]);

    let workload = board.workload_for_date(d(2025, 1, 15)).unwrap();
    assert_eq!(workload.total_hours, 5);
    assert_eq!(workload.workload, WorkloadTier::Heavy);
}

#[test]
fn other_days_do_not_leak_into_the_snapshot() {
    let board = board_with(vec![
        estimated(Task::new(1, "Target day", d(2025, 1, 15)), 120),
        estimated(Task::new(2, "Day before", d(2025, 1, 14)), 240),
        estimated(Task::new(3, "Day after", d(2025, 1, 16)), 240),
    ]);

    let workload = board.workload_for_date(d(2025, 1, 15)).unwrap();
    assert_eq!(workload.tasks_count, 1);
    assert_eq!(workload.total_hours, 2);
    assert_eq!(workload.tasks[0].id, 1);
}
