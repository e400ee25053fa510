use super::{PersistenceError, PersistenceResult};
use crate::task::Priority;
use crate::{BoardMetadata, ReschedulePolicy, Task, TaskBoard};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct BoardSnapshot {
    metadata: BoardMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    policy: Option<ReschedulePolicy>,
    tasks: Vec<Task>,
}

impl BoardSnapshot {
    fn from_board(board: &TaskBoard) -> PersistenceResult<Self> {
        let df = board.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for row_idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, row_idx)?);
        }
        super::validate_tasks(&tasks)?;
        Ok(Self {
            metadata: board.metadata().clone(),
            policy: Some(board.policy().clone()),
            tasks,
        })
    }

    fn into_board(self) -> PersistenceResult<TaskBoard> {
        super::validate_tasks(&self.tasks)?;
        let policy = self.policy.unwrap_or_default();
        let board = TaskBoard::from_tasks(self.metadata, policy, self.tasks)?;
        Ok(board)
    }
}

pub fn save_board_to_json<P: AsRef<Path>>(board: &TaskBoard, path: P) -> PersistenceResult<()> {
    let snapshot = BoardSnapshot::from_board(board)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_board_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskBoard> {
    let file = File::open(path)?;
    let snapshot: BoardSnapshot = serde_json::from_reader(file)?;
    snapshot.into_board()
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    title: String,
    category: String,
    date: String,
    completed: String,
    priority: String,
    estimated_minutes: String,
    #[serde(default)]
    metadata_json: String,
    #[serde(default)]
    policy_json: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let mut record = TaskCsvRecord::default();
        record.id = task.id;
        record.title = task.title.clone();
        record.category = task.category.clone();
        record.date = format_date(task.date);
        record.completed = task.completed.to_string();
        record.priority = task.priority.as_str().to_string();
        record.estimated_minutes = format_option_i64(task.estimated_minutes);
        record
    }
}

impl TaskCsvRecord {
    fn metadata_row(board: &TaskBoard) -> PersistenceResult<Self> {
        let metadata_json = serde_json::to_string(board.metadata())?;
        let policy_json = serde_json::to_string(board.policy())?;
        let mut record = TaskCsvRecord::default();
        record.title = "__metadata__".to_string();
        record.metadata_json = metadata_json;
        record.policy_json = policy_json;
        Ok(record)
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<Task> {
        if self.is_metadata_row() {
            return Err(PersistenceError::InvalidData(
                "metadata row cannot be converted to task".into(),
            ));
        }
        let date = parse_required_date(&self.date)?;
        let mut task = Task::new(self.id, self.title, date);
        if !self.category.trim().is_empty() {
            task.category = self.category;
        }
        task.completed = parse_bool(&self.completed)?.unwrap_or(false);
        task.priority = if self.priority.trim().is_empty() {
            Priority::default()
        } else {
            Priority::from_str(self.priority.trim()).ok_or_else(|| {
                PersistenceError::InvalidData(format!("invalid priority '{}'", self.priority))
            })?
        };
        task.estimated_minutes = parse_i64(&self.estimated_minutes)?;
        Ok(task)
    }
}

pub fn save_board_to_csv<P: AsRef<Path>>(board: &TaskBoard, path: P) -> PersistenceResult<()> {
    super::validate_board(board)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(board)?)?;
    let df = board.dataframe();
    for row_idx in 0..df.height() {
        let task = Task::from_dataframe_row(df, row_idx)?;
        writer.serialize(TaskCsvRecord::from(&task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_board_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskBoard> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    let mut metadata: Option<BoardMetadata> = None;
    let mut policy: Option<ReschedulePolicy> = None;
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if metadata.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            if !record.metadata_json.trim().is_empty() {
                metadata = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
                })?);
            }
            if !record.policy_json.trim().is_empty() {
                policy = Some(serde_json::from_str(&record.policy_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid policy json: {err}"))
                })?);
            }
            continue;
        }
        tasks.push(record.into_task()?);
    }

    if tasks.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }

    super::validate_tasks(&tasks)?;

    let metadata = metadata.unwrap_or_default();
    let policy = policy.unwrap_or_default();
    let board = TaskBoard::from_tasks(metadata, policy, tasks)?;
    Ok(board)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_required_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_option_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}
