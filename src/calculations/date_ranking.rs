use crate::calculations::workload::{DailyWorkload, WorkloadCalculator};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// A candidate landing day for a reschedule, carrying the day's current
/// workload so a caller can show "Tue, Jan 14 (2 tasks, 3h)" style pickers.
#[derive(Debug, Clone, Serialize)]
pub struct RescheduleSuggestion {
    pub display_date: String,
    #[serde(flatten)]
    pub workload: DailyWorkload,
}

impl RescheduleSuggestion {
    fn from_workload(workload: DailyWorkload) -> Self {
        Self {
            display_date: workload.date.format("%a, %b %-d").to_string(),
            workload,
        }
    }
}

pub struct DateRanker<'a> {
    df: &'a DataFrame,
    horizon_days: i64,
}

impl<'a> DateRanker<'a> {
    pub fn new(df: &'a DataFrame, horizon_days: i64) -> Self {
        Self { df, horizon_days }
    }

    /// Ranks the days after `today` (tomorrow through `today + horizon`) by
    /// how loaded they already are: lightest tier first, earlier date first
    /// within a tier. The best suggestion sits at index 0.
    pub fn execute(&self, today: NaiveDate) -> Result<Vec<RescheduleSuggestion>, PolarsError> {
        let candidates: Vec<NaiveDate> = (1..=self.horizon_days)
            .map(|offset| today + Duration::days(offset))
            .collect();

        let calculator = WorkloadCalculator::new(self.df);
        let mut ranked: Vec<DailyWorkload> = candidates
            .par_iter()
            .map(|&date| calculator.for_date(date))
            .collect::<Result<_, _>>()?;

        ranked.sort_by(|a, b| {
            a.workload
                .cmp(&b.workload)
                .then_with(|| a.date.cmp(&b.date))
        });

        Ok(ranked
            .into_iter()
            .map(RescheduleSuggestion::from_workload)
            .collect())
    }
}
