use crate::calculations::workload::{WorkloadTier, date_to_days};
use crate::policy::ReschedulePolicy;
use crate::task::{Priority, Task};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One task's move to a new date, in the order the placer decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRescheduleUpdate {
    pub task_id: i32,
    pub new_date: NaiveDate,
}

/// A horizon day's occupancy as the placer left it. Counts and hours include
/// both the work already due that day and the tasks the plan adds to it.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDay {
    pub date: NaiveDate,
    pub tasks_count: usize,
    pub total_hours: i64,
    pub workload: WorkloadTier,
}

/// Outcome of a redistribution run. `updates` is the contract: applying them
/// in order moves every overdue task. `days` and `fallback_placements` exist
/// so callers can inspect how crowded the horizon ended up without
/// re-deriving workloads.
#[derive(Debug, Clone, Serialize)]
pub struct RedistributionPlan {
    pub updates: Vec<BulkRescheduleUpdate>,
    pub days: Vec<PlannedDay>,
    pub fallback_placements: usize,
}

impl RedistributionPlan {
    pub fn task_count(&self) -> usize {
        self.updates.len()
    }

    pub fn dates_touched(&self) -> usize {
        let unique: HashSet<NaiveDate> = self.updates.iter().map(|update| update.new_date).collect();
        unique.len()
    }

    pub fn to_cli_summary(&self) -> String {
        if self.updates.is_empty() {
            return "nothing to reschedule".to_string();
        }

        let mut parts = Vec::new();
        parts.push(format!("moved={}", self.task_count()));
        parts.push(format!("days={}", self.dates_touched()));
        if self.fallback_placements > 0 {
            parts.push(format!("forced={}", self.fallback_placements));
        }
        parts.join(", ")
    }
}

struct OverdueTask {
    id: i32,
    priority: Priority,
    minutes: i64,
    hours: i64,
}

pub struct RedistributionPass<'a> {
    df: &'a DataFrame,
    policy: &'a ReschedulePolicy,
}

impl<'a> RedistributionPass<'a> {
    pub fn new(df: &'a DataFrame, policy: &'a ReschedulePolicy) -> Self {
        Self { df, policy }
    }

    /// Plans new dates for every incomplete task due before `today`.
    ///
    /// Overdue tasks are taken highest priority first, shortest first within
    /// a priority. Horizon days are consumed emptiest first through a
    /// forward-only cursor: the cursor jumps past a day once its running
    /// total reaches the policy's full mark, and when no remaining day has
    /// capacity the task is forced onto the cursor's day regardless.
    pub fn execute(&self, today: NaiveDate) -> Result<RedistributionPlan, PolarsError> {
        let (mut overdue, mut slots) = self.survey(today)?;

        if overdue.is_empty() {
            return Ok(RedistributionPlan {
                updates: Vec::new(),
                days: slots,
                fallback_placements: 0,
            });
        }
        if slots.is_empty() {
            return Err(PolarsError::ComputeError(
                "reschedule horizon is empty".into(),
            ));
        }

        overdue.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.minutes.cmp(&b.minutes)));
        slots.sort_by(|a, b| {
            a.total_hours
                .cmp(&b.total_hours)
                .then_with(|| a.date.cmp(&b.date))
        });

        let mut updates = Vec::with_capacity(overdue.len());
        let mut fallback_placements = 0usize;
        let mut cursor = 0usize;

        for task in &overdue {
            let found = (cursor..slots.len()).find(|&idx| {
                let slot = &slots[idx];
                slot.tasks_count < self.policy.max_tasks_per_day
                    && slot.total_hours + task.hours <= self.policy.max_hours_per_day
            });

            let slot_idx = match found {
                Some(idx) => idx,
                None => {
                    fallback_placements += 1;
                    cursor.min(slots.len() - 1)
                }
            };

            let day_hours = {
                let slot = &mut slots[slot_idx];
                slot.tasks_count += 1;
                slot.total_hours += task.hours;
                slot.workload = WorkloadTier::from_hours(slot.total_hours);
                updates.push(BulkRescheduleUpdate {
                    task_id: task.id,
                    new_date: slot.date,
                });
                slot.total_hours
            };

            if found.is_some() {
                if day_hours >= self.policy.day_full_hours {
                    cursor = slot_idx + 1;
                }
            } else {
                cursor = (cursor + 1).min(slots.len());
            }
        }

        slots.sort_by_key(|slot| slot.date);

        Ok(RedistributionPlan {
            updates,
            days: slots,
            fallback_placements,
        })
    }

    /// Single scan over the frame: collects the overdue set and the current
    /// occupancy of each horizon day. Tasks due exactly on `today` belong to
    /// neither side.
    fn survey(&self, today: NaiveDate) -> Result<(Vec<OverdueTask>, Vec<PlannedDay>), PolarsError> {
        let ids = self.df.column("id")?.i32()?;
        let dates = self.df.column("date")?.date()?;
        let completed = self.df.column("completed")?.bool()?;
        let priorities = self.df.column("priority")?.str()?;
        let estimates = self.df.column("estimated_minutes")?.i64()?;

        let today_days = date_to_days(today);
        let horizon_end = today_days + self.policy.horizon_days as i32;

        let mut overdue = Vec::new();
        let mut occupancy: HashMap<i32, (usize, i64)> = HashMap::new();

        for idx in 0..self.df.height() {
            if completed.get(idx).unwrap_or(false) {
                continue;
            }
            let Some(day) = dates.get(idx) else {
                continue;
            };
            let estimate = estimates.get(idx);

            if day < today_days {
                let Some(id) = ids.get(idx) else {
                    continue;
                };
                overdue.push(OverdueTask {
                    id,
                    priority: Priority::parse_or_default(priorities.get(idx)),
                    minutes: Task::effective_minutes(estimate),
                    hours: Task::scheduled_hours(estimate),
                });
            } else if day > today_days && day <= horizon_end {
                let entry = occupancy.entry(day).or_insert((0usize, 0i64));
                entry.0 += 1;
                entry.1 += Task::scheduled_hours(estimate);
            }
        }

        let slots = (1..=self.policy.horizon_days)
            .map(|offset| {
                let (tasks_count, total_hours) = occupancy
                    .get(&(today_days + offset as i32))
                    .copied()
                    .unwrap_or((0, 0));
                PlannedDay {
                    date: today + Duration::days(offset),
                    tasks_count,
                    total_hours,
                    workload: WorkloadTier::from_hours(total_hours),
                }
            })
            .collect();

        Ok((overdue, slots))
    }
}
