pub mod board;
pub mod calculations;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod persistence;
pub mod policy;
pub mod task;
pub(crate) mod task_validation;

pub use board::{RescheduleError, TaskBoard};
pub use calculations::{
    BulkRescheduleUpdate, DailyWorkload, DateRanker, PlannedDay, RedistributionPass,
    RedistributionPlan, RescheduleSuggestion, WorkloadCalculator, WorkloadTier,
};
pub use metadata::BoardMetadata;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBoardStore;
pub use persistence::{
    BoardStore, PersistenceError, load_board_from_csv, load_board_from_json, save_board_to_csv,
    save_board_to_json, validate_board, validate_tasks,
};
pub use policy::ReschedulePolicy;
pub use task::{Priority, Task};
