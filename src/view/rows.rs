use chrono::NaiveDateTime;

use crate::model::task::{Category, Task, TaskId};

pub const EMPTY_STATE: &str = "No tasks found. Add a new task to get started!";
pub const NO_DUE_DATE: &str = "No due date";

/// One rendered task line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub checked: bool,
    pub title: String,
    pub due: String,
    pub category: Category,
}

impl TaskRow {
    pub fn from_task(task: &Task) -> Self {
        TaskRow {
            id: task.id.clone(),
            checked: task.completed,
            title: task.title.clone(),
            due: format_due(task.due_date.as_ref()),
            category: task.category_kind(),
        }
    }

    /// `@ Personal` style icon/label pair
    pub fn category_tag(&self) -> String {
        format!("{} {}", self.category.icon(), self.category.label())
    }

    pub fn checkbox(&self) -> &'static str {
        if self.checked { "[x]" } else { "[ ]" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Nothing to show; carries the placeholder text
    Empty(&'static str),
    Rows(Vec<TaskRow>),
}

impl ListView {
    pub fn rows(&self) -> &[TaskRow] {
        match self {
            ListView::Empty(_) => &[],
            ListView::Rows(rows) => rows,
        }
    }
}

/// Project already filtered and ordered tasks into rows
pub fn project(tasks: &[&Task]) -> ListView {
    if tasks.is_empty() {
        return ListView::Empty(EMPTY_STATE);
    }
    ListView::Rows(tasks.iter().map(|t| TaskRow::from_task(t)).collect())
}

pub fn format_due(due: Option<&NaiveDateTime>) -> String {
    match due {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => NO_DUE_DATE.to_string(),
    }
}
