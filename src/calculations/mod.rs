pub mod date_ranking;
pub mod redistribution;
pub mod workload;

pub use date_ranking::{DateRanker, RescheduleSuggestion};
pub use redistribution::{
    BulkRescheduleUpdate, PlannedDay, RedistributionPass, RedistributionPlan,
};
pub use workload::{DailyWorkload, WorkloadCalculator, WorkloadTier};
