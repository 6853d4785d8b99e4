use serde::Serialize;

use crate::model::task::Task;

/// Task counts shown in the status row and by `todo stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub remaining: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn of(tasks: &[Task]) -> Self {
        let remaining = tasks.iter().filter(|t| !t.completed).count();
        TaskStats {
            total: tasks.len(),
            remaining,
            completed: tasks.len() - remaining,
        }
    }

    /// One-line nudge based on the counts
    pub fn suggestion(&self) -> String {
        if self.total == 0 {
            "Add your first task to get started!".to_string()
        } else if self.remaining == 0 {
            "All tasks completed! Great job!".to_string()
        } else {
            format!(
                "You have {} task{} to complete. Keep going!",
                self.remaining,
                if self.remaining == 1 { "" } else { "s" }
            )
        }
    }
}
