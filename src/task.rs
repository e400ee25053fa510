use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Task urgency bucket. Declaration order doubles as scheduling order:
/// sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Lenient parse used wherever task data crosses into the engine:
    /// anything unrecognized or absent collapses to `Medium`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Priority::from_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub title: String,
    #[serde(default = "Task::default_category")]
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub estimated_minutes: Option<i64>,
}

impl Task {
    /// Estimate applied when a task carries none, or an explicit zero.
    pub const DEFAULT_ESTIMATE_MINUTES: i64 = 60;

    pub fn new(id: i32, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            category: Self::default_category(),
            date,
            completed: false,
            priority: Priority::default(),
            estimated_minutes: None,
        }
    }

    fn default_category() -> String {
        "general".to_string()
    }

    /// Minutes with the missing/zero default applied. Every workload and
    /// capacity computation normalizes estimates through here.
    pub fn effective_minutes(estimated_minutes: Option<i64>) -> i64 {
        match estimated_minutes {
            Some(minutes) if minutes > 0 => minutes,
            _ => Self::DEFAULT_ESTIMATE_MINUTES,
        }
    }

    /// Whole scheduling hours for an estimate: the effective minutes rounded
    /// up, so a 61-minute task occupies 2 hours of a day's budget.
    pub fn scheduled_hours(estimated_minutes: Option<i64>) -> i64 {
        (Self::effective_minutes(estimated_minutes) + 59) / 60
    }

    pub fn estimated_hours(&self) -> i64 {
        Self::scheduled_hours(self.estimated_minutes)
    }

    /// Overdue means incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.date < today
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(7);

        let id_data: [i32; 1] = [self.id];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let title_data: [&str; 1] = [self.title.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("title"), title_data).into_column());

        let category_data: [&str; 1] = [self.category.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("category"), category_data).into_column());

        columns.push(Self::series_from_date("date", self.date)?.into_column());

        let completed_data: [bool; 1] = [self.completed];
        columns
            .push(Series::new(PlSmallStr::from_static("completed"), completed_data).into_column());

        let priority_data: [&str; 1] = [self.priority.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("priority"), priority_data).into_column());

        let estimate_data: [Option<i64>; 1] = [self.estimated_minutes];
        columns.push(
            Series::new(PlSmallStr::from_static("estimated_minutes"), estimate_data).into_column(),
        );

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let id = df
            .column("id")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing id".into()))?;

        let title = df
            .column("title")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let category = df
            .column("category")?
            .str()?
            .get(row_idx)
            .unwrap_or("general")
            .to_string();

        let date = Self::date_from_series(df.column("date")?.date()?, row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing date".into()))?;

        let completed = df
            .column("completed")?
            .bool()?
            .get(row_idx)
            .unwrap_or(false);

        let priority = Priority::parse_or_default(df.column("priority")?.str()?.get(row_idx));

        let estimated_minutes = df.column("estimated_minutes")?.i64()?.get(row_idx);

        Ok(Self {
            id,
            title,
            category,
            date,
            completed,
            priority,
            estimated_minutes,
        })
    }

    fn series_from_date(name: &str, date: NaiveDate) -> PolarsResult<Series> {
        let data: [i32; 1] = [Self::date_to_i32(date)];
        Series::new(name.into(), data).cast(&DataType::Date)
    }

    fn date_from_series(chunked: &DateChunked, row_idx: usize) -> Option<NaiveDate> {
        chunked.get(row_idx).map(Self::date_from_i32)
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    fn date_from_i32(days: i32) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        epoch + Duration::days(days as i64)
    }
}
