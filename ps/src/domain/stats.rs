//! Pipeline metrics over a task list

use serde::Serialize;

use super::task::Task;

/// Workload summary shown next to the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// All tasks considered
    pub total: usize,
    /// Tasks not yet completed (current workload)
    pub pending: usize,
    /// Completed tasks
    pub completed: usize,
    /// Completed share of total, rounded to a whole percent (0 when empty)
    pub efficiency_percent: u8,
}

impl PipelineStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let efficiency_percent = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };

        Self {
            total,
            pending: total - completed,
            completed,
            efficiency_percent,
        }
    }
}
