use serde::{Deserialize, Serialize};

/// Knobs for the overdue redistribution pass. Defaults mirror the planner's
/// built-in behavior: a two-week candidate window and conservative per-day
/// caps so no single day absorbs the whole backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReschedulePolicy {
    /// Number of future days considered as landing slots (today excluded).
    pub horizon_days: i64,
    /// Hard cap on tasks placed onto one day by the greedy pass.
    pub max_tasks_per_day: usize,
    /// Hard cap on scheduled hours placed onto one day by the greedy pass.
    pub max_hours_per_day: i64,
    /// Once a day's total reaches this many hours the placement cursor
    /// moves on, leaving the remaining headroom for existing work.
    pub day_full_hours: i64,
}

impl Default for ReschedulePolicy {
    fn default() -> Self {
        Self {
            horizon_days: 14,
            max_tasks_per_day: 3,
            max_hours_per_day: 5,
            day_full_hours: 4,
        }
    }
}
