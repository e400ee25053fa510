use crate::task::Task;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Qualitative load bucket for a single day. Declaration order doubles as
/// ranking order: sorting ascending puts `Light` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadTier {
    Light,
    Medium,
    Heavy,
}

impl WorkloadTier {
    /// Bucket boundaries: up to 2 hours is light, up to 4 is medium,
    /// anything past that is heavy.
    pub fn from_hours(total_hours: i64) -> Self {
        if total_hours <= 2 {
            WorkloadTier::Light
        } else if total_hours <= 4 {
            WorkloadTier::Medium
        } else {
            WorkloadTier::Heavy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadTier::Light => "light",
            WorkloadTier::Medium => "medium",
            WorkloadTier::Heavy => "heavy",
        }
    }
}

/// Snapshot of one day's open work: the tasks due that day, their summed
/// scheduling hours, and the tier those hours fall into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyWorkload {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub tasks_count: usize,
    pub total_hours: i64,
    pub workload: WorkloadTier,
}

pub struct WorkloadCalculator<'a> {
    df: &'a DataFrame,
}

impl<'a> WorkloadCalculator<'a> {
    pub fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    /// Workload for `date`, derived from the incomplete tasks due that day.
    /// Completed tasks never count, whatever their estimates say.
    pub fn for_date(&self, date: NaiveDate) -> Result<DailyWorkload, PolarsError> {
        let tasks = self.tasks_due_on(date)?;
        let total_hours: i64 = tasks.iter().map(Task::estimated_hours).sum();

        Ok(DailyWorkload {
            date,
            tasks_count: tasks.len(),
            total_hours,
            workload: WorkloadTier::from_hours(total_hours),
            tasks,
        })
    }

    fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, PolarsError> {
        let target = date_to_days(date);
        let dates = self.df.column("date")?.date()?;
        let completed = self.df.column("completed")?.bool()?;

        let mut tasks = Vec::new();
        for idx in 0..self.df.height() {
            if completed.get(idx).unwrap_or(false) {
                continue;
            }
            if dates.get(idx) == Some(target) {
                tasks.push(Task::from_dataframe_row(self.df, idx)?);
            }
        }

        Ok(tasks)
    }
}

/// Days since the Unix epoch, the physical representation of a date column.
pub(crate) fn date_to_days(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}
