use crate::calculations::date_ranking::{DateRanker, RescheduleSuggestion};
use crate::calculations::redistribution::{RedistributionPass, RedistributionPlan};
use crate::calculations::workload::{DailyWorkload, WorkloadCalculator};
use crate::metadata::BoardMetadata;
use crate::policy::ReschedulePolicy;
use crate::task::{Priority, Task};
use crate::task_validation::{self, TaskValidationError};
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use std::fmt;

#[derive(Debug, Clone)]
pub enum RescheduleError {
    TaskNotFound { task_id: i32 },
    InvalidDate { input: String },
    Computation(String),
}

impl fmt::Display for RescheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RescheduleError::TaskNotFound { task_id } => {
                write!(f, "task {task_id} not found")
            }
            RescheduleError::InvalidDate { input } => {
                write!(f, "invalid date '{input}', expected YYYY-MM-DD")
            }
            RescheduleError::Computation(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RescheduleError {}

#[derive(Debug)]
pub struct TaskBoard {
    df: DataFrame,
    metadata: BoardMetadata,
    policy: ReschedulePolicy,
}

impl TaskBoard {
    pub(crate) fn from_parts(metadata: BoardMetadata, policy: ReschedulePolicy) -> Self {
        let schema = Self::default_schema();
        let df = DataFrame::empty_with_schema(&schema);

        Self {
            df,
            metadata,
            policy,
        }
    }

    pub fn new() -> Self {
        Self::from_parts(BoardMetadata::default(), ReschedulePolicy::default())
    }

    pub fn new_with_metadata(metadata: BoardMetadata) -> Self {
        Self::from_parts(metadata, ReschedulePolicy::default())
    }

    pub fn new_with_metadata_and_policy(metadata: BoardMetadata, policy: ReschedulePolicy) -> Self {
        Self::from_parts(metadata, policy)
    }

    pub fn from_tasks(
        metadata: BoardMetadata,
        policy: ReschedulePolicy,
        tasks: Vec<Task>,
    ) -> Result<Self, PolarsError> {
        task_validation::validate_task_collection(&tasks).map_err(Self::validation_error)?;
        let mut board = Self::from_parts(metadata, policy);
        for task in tasks {
            let new_row = task.to_dataframe_row()?;
            board.df = board.df.vstack(&new_row)?;
        }
        Ok(board)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn metadata(&self) -> &BoardMetadata {
        &self.metadata
    }

    pub fn policy(&self) -> &ReschedulePolicy {
        &self.policy
    }

    pub fn board_name(&self) -> &str {
        &self.metadata.board_name
    }

    pub fn board_description(&self) -> &str {
        &self.metadata.board_description
    }

    pub fn owner(&self) -> &str {
        &self.metadata.owner
    }

    pub fn set_board_name(&mut self, name: impl Into<String>) {
        self.metadata.board_name = name.into();
    }

    pub fn set_board_description(&mut self, description: impl Into<String>) {
        self.metadata.board_description = description.into();
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.metadata.owner = owner.into();
    }

    pub fn set_metadata(&mut self, metadata: BoardMetadata) {
        self.metadata = metadata;
    }

    pub fn set_policy(&mut self, policy: ReschedulePolicy) {
        self.policy = policy;
    }

    pub fn reset_policy(&mut self) {
        self.policy = ReschedulePolicy::default();
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id".into(), DataType::Int32),
            Field::new("title".into(), DataType::String),
            Field::new("category".into(), DataType::String),
            Field::new("date".into(), DataType::Date),
            Field::new("completed".into(), DataType::Boolean),
            Field::new("priority".into(), DataType::String),
            Field::new("estimated_minutes".into(), DataType::Int64),
        ])
    }

    pub fn tasks(&self) -> Result<Vec<Task>, PolarsError> {
        let df = self.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, idx)?);
        }
        Ok(tasks)
    }

    pub fn find_task(&self, task_id: i32) -> Result<Option<Task>, PolarsError> {
        if self.df.height() == 0 {
            return Ok(None);
        }
        let ids = self.df.column("id")?.i32()?;
        for (idx, id_opt) in ids.into_iter().enumerate() {
            if id_opt == Some(task_id) {
                let task = Task::from_dataframe_row(self.dataframe(), idx)?;
                return Ok(Some(task));
            }
        }
        Ok(None)
    }

    pub fn delete_task(&mut self, task_id: i32) -> Result<bool, PolarsError> {
        if self.df.height() == 0 {
            return Ok(false);
        }
        let snapshot = self.df.clone();
        let mut tasks: Vec<Task> = Vec::with_capacity(snapshot.height());
        let mut found = false;
        for idx in 0..snapshot.height() {
            let task = Task::from_dataframe_row(&snapshot, idx)?;
            if task.id == task_id {
                found = true;
                continue;
            }
            tasks.push(task);
        }
        if !found {
            return Ok(false);
        }

        self.df = DataFrame::empty_with_schema(&Self::default_schema());
        for task in tasks {
            self.upsert_task_record(task)?;
        }
        Ok(true)
    }

    pub fn overdue_tasks(&self, today: NaiveDate) -> Result<Vec<Task>, PolarsError> {
        Ok(self
            .tasks()?
            .into_iter()
            .filter(|task| task.is_overdue(today))
            .collect())
    }

    /// Workload snapshot for one day, counting only incomplete tasks.
    pub fn workload_for_date(&self, date: NaiveDate) -> Result<DailyWorkload, PolarsError> {
        WorkloadCalculator::new(&self.df).for_date(date)
    }

    /// Candidate landing days after `today`, best first. Read-only.
    pub fn reschedule_suggestions(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<RescheduleSuggestion>, PolarsError> {
        DateRanker::new(&self.df, self.policy.horizon_days).execute(today)
    }

    /// Computes a redistribution plan for the overdue backlog without
    /// touching the board. Pair with [`TaskBoard::apply_redistribution`],
    /// or use [`TaskBoard::redistribute_overdue`] for both steps at once.
    pub fn plan_overdue_redistribution(
        &self,
        today: NaiveDate,
    ) -> Result<RedistributionPlan, PolarsError> {
        RedistributionPass::new(&self.df, &self.policy).execute(today)
    }

    /// Applies a previously computed plan, one date move per update.
    /// Application is not atomic across tasks: a failure partway leaves the
    /// earlier moves in place.
    pub fn apply_redistribution(
        &mut self,
        plan: &RedistributionPlan,
    ) -> Result<usize, RescheduleError> {
        for update in &plan.updates {
            self.reschedule_task(update.task_id, update.new_date)?;
        }
        Ok(plan.task_count())
    }

    pub fn redistribute_overdue(
        &mut self,
        today: NaiveDate,
    ) -> Result<RedistributionPlan, RescheduleError> {
        let plan = self
            .plan_overdue_redistribution(today)
            .map_err(Self::computation_error)?;
        self.apply_redistribution(&plan)?;
        Ok(plan)
    }

    /// Moves one task to `new_date`. Only the date changes; title, priority,
    /// completion and estimate all survive untouched.
    pub fn reschedule_task(
        &mut self,
        task_id: i32,
        new_date: NaiveDate,
    ) -> Result<Task, RescheduleError> {
        let task = self
            .find_task(task_id)
            .map_err(Self::computation_error)?
            .ok_or(RescheduleError::TaskNotFound { task_id })?;

        self.update_date_column("date", task_id, new_date)
            .map_err(Self::computation_error)?;

        Ok(Task {
            date: new_date,
            ..task
        })
    }

    /// Date parsing for callers holding user input. Failures surface as
    /// [`RescheduleError::InvalidDate`] before any mutation is attempted.
    pub fn parse_reschedule_date(input: &str) -> Result<NaiveDate, RescheduleError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
            RescheduleError::InvalidDate {
                input: input.to_string(),
            }
        })
    }

    /// Marks every incomplete low-priority task complete and reports how
    /// many changed. Zero is a valid outcome, not an error.
    pub fn complete_low_priority_tasks(&mut self) -> Result<usize, PolarsError> {
        if self.df.height() == 0 {
            return Ok(0);
        }

        let completed = self.df.column("completed")?.bool()?;
        let priorities = self.df.column("priority")?.str()?;

        let mut flags: Vec<bool> = Vec::with_capacity(self.df.height());
        let mut marked = 0usize;
        for idx in 0..self.df.height() {
            let already_done = completed.get(idx).unwrap_or(false);
            let is_low = Priority::parse_or_default(priorities.get(idx)) == Priority::Low;
            if !already_done && is_low {
                marked += 1;
                flags.push(true);
            } else {
                flags.push(already_done);
            }
        }

        if marked == 0 {
            return Ok(0);
        }

        let series = Series::new(PlSmallStr::from_static("completed"), flags);
        self.df.replace("completed", series)?;
        Ok(marked)
    }

    fn update_string_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: &str,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .str()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<StringChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_bool_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: bool,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .bool()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<BooleanChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_opt_i64_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: Option<i64>,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .i64()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| if id == Some(task_id) { new_value } else { val })
            .collect::<Int64Chunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_date_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_date: NaiveDate,
    ) -> Result<(), PolarsError> {
        self.df = self
            .df
            .clone()
            .lazy()
            .with_column(
                when(col("id").eq(lit(task_id)))
                    .then(lit(new_date).cast(DataType::Date))
                    .otherwise(col(column_name).cast(DataType::Date))
                    .alias(column_name),
            )
            .collect()?;
        Ok(())
    }

    fn validation_error(err: TaskValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    fn computation_error(err: PolarsError) -> RescheduleError {
        RescheduleError::Computation(err.to_string())
    }

    pub fn upsert_task(&mut self, id: i32, title: &str, date: NaiveDate) -> Result<(), PolarsError> {
        let id_exists = if self.df.height() == 0 {
            false
        } else {
            self.df
                .column("id")?
                .i32()?
                .into_iter()
                .any(|v| v == Some(id))
        };

        if id_exists {
            self.update_string_column("title", id, title)?;
            self.update_date_column("date", id, date)?;
            return Ok(());
        }

        let task = Task::new(id, title, date);
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    pub fn upsert_task_record(&mut self, task: Task) -> Result<(), PolarsError> {
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        let id_exists = if self.df.height() == 0 {
            false
        } else {
            self.df
                .column("id")?
                .i32()?
                .into_iter()
                .any(|v| v == Some(task.id))
        };

        if id_exists {
            self.update_string_column("title", task.id, &task.title)?;
            self.update_string_column("category", task.id, &task.category)?;
            self.update_date_column("date", task.id, task.date)?;
            self.update_bool_column("completed", task.id, task.completed)?;
            self.update_string_column("priority", task.id, task.priority.as_str())?;
            self.update_opt_i64_column("estimated_minutes", task.id, task.estimated_minutes)?;
            return Ok(());
        }

        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    // Public setters for common columns to enable CLI editing
    #[cfg(feature = "cli_api")]
    pub fn set_task_title(&mut self, task_id: i32, title: &str) -> Result<(), PolarsError> {
        self.update_string_column("title", task_id, title)
    }

    #[cfg(feature = "cli_api")]
    pub fn set_task_category(&mut self, task_id: i32, category: &str) -> Result<(), PolarsError> {
        self.update_string_column("category", task_id, category)
    }

    #[cfg(feature = "cli_api")]
    pub fn set_task_priority(
        &mut self,
        task_id: i32,
        priority: Priority,
    ) -> Result<(), PolarsError> {
        self.update_string_column("priority", task_id, priority.as_str())
    }

    #[cfg(feature = "cli_api")]
    pub fn set_task_completed(
        &mut self,
        task_id: i32,
        completed: bool,
    ) -> Result<(), PolarsError> {
        self.update_bool_column("completed", task_id, completed)
    }

    #[cfg(feature = "cli_api")]
    pub fn set_task_estimate(
        &mut self,
        task_id: i32,
        minutes: Option<i64>,
    ) -> Result<(), PolarsError> {
        let mut task = self.find_task(task_id)?.ok_or_else(|| {
            PolarsError::ComputeError(format!("task {} not found", task_id).into())
        })?;
        task.estimated_minutes = minutes;
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        self.update_opt_i64_column("estimated_minutes", task_id, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn default_schema_contains_expected_columns() {
        let schema = TaskBoard::default_schema();
        let expected = vec![
            "id",
            "title",
            "category",
            "date",
            "completed",
            "priority",
            "estimated_minutes",
        ];
        for name in expected {
            assert!(schema.contains(name.into()), "missing column {name}");
        }
    }

    #[test]
    fn upsert_task_inserts_and_updates() {
        let mut board = TaskBoard::new();
        board.upsert_task(1, "Write report", d(2025, 3, 10)).unwrap();
        assert_eq!(board.dataframe().height(), 1);

        // Update title and date in place
        board.upsert_task(1, "Write final report", d(2025, 3, 12)).unwrap();

        let df = board.dataframe();
        assert_eq!(df.height(), 1);
        let title = df.column("title").unwrap().str().unwrap().get(0).unwrap();
        assert_eq!(title, "Write final report");

        let task = board.find_task(1).unwrap().unwrap();
        assert_eq!(task.date, d(2025, 3, 12));
    }

    #[test]
    fn reschedule_task_not_found() {
        let mut board = TaskBoard::new();
        let err = board.reschedule_task(42, d(2025, 3, 10)).unwrap_err();
        assert!(matches!(err, RescheduleError::TaskNotFound { task_id: 42 }));
    }
}
