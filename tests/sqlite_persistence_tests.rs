#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use taskboard_tool::{
    BoardMetadata, BoardStore, Priority, ReschedulePolicy, SqliteBoardStore, Task, TaskBoard,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_store_round_trips_a_board() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteBoardStore::new(file.path()).unwrap();

    let metadata = BoardMetadata {
        board_name: "SQLite Board".into(),
        board_description: "Round trip".into(),
        owner: "dana".into(),
    };
    let policy = ReschedulePolicy {
        horizon_days: 7,
        ..ReschedulePolicy::default()
    };
    let mut board = TaskBoard::new_with_metadata_and_policy(metadata, policy.clone());

    let mut task1 = Task::new(1, "Design review", d(2025, 1, 6));
    task1.priority = Priority::High;
    task1.estimated_minutes = Some(120);
    board.upsert_task_record(task1).unwrap();

    let mut task2 = Task::new(2, "Water plants", d(2025, 1, 8));
    task2.priority = Priority::Low;
    task2.completed = true;
    board.upsert_task_record(task2).unwrap();

    store.save_board(&board).expect("save board");

    let loaded = store
        .load_board()
        .expect("load board")
        .expect("board exists");

    assert_eq!(loaded.board_name(), "SQLite Board");
    assert_eq!(loaded.owner(), "dana");
    assert_eq!(loaded.policy(), &policy);
    assert_eq!(loaded.dataframe().height(), 2);

    let task = loaded.find_task(1).unwrap().expect("task 1");
    assert_eq!(task.title, "Design review");
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.estimated_minutes, Some(120));

    let done = loaded.find_task(2).unwrap().expect("task 2");
    assert!(done.completed);
}

#[test]
fn sqlite_store_is_empty_until_first_save() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteBoardStore::new(file.path()).unwrap();

    assert!(store.load_board().expect("load board").is_none());
}

#[test]
fn sqlite_save_replaces_the_previous_snapshot() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteBoardStore::new(file.path()).unwrap();

    let mut board = TaskBoard::new();
    board.upsert_task(1, "First", d(2025, 1, 6)).unwrap();
    board.upsert_task(2, "Second", d(2025, 1, 7)).unwrap();
    store.save_board(&board).unwrap();

    board.delete_task(2).unwrap();
    board.set_board_name("Renamed");
    store.save_board(&board).unwrap();

    let loaded = store.load_board().unwrap().expect("board exists");
    assert_eq!(loaded.board_name(), "Renamed");
    assert_eq!(loaded.dataframe().height(), 1);
    assert!(loaded.find_task(2).unwrap().is_none());
}
