use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.title.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task {} requires a non-empty title",
            task.id
        )));
    }

    if let Some(minutes) = task.estimated_minutes {
        if minutes < 0 {
            return Err(TaskValidationError::new(format!(
                "task {} has negative estimate {} minutes",
                task.id, minutes
            )));
        }
    }

    if task.category.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task {} requires a non-empty category",
            task.id
        )));
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}
