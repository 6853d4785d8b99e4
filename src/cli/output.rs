use serde::Serialize;

use crate::model::dates;
use crate::model::task::{Priority, Task};
use crate::ops::stats::TaskStats;
use crate::view::rows::{ListView, TaskRow};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    pub category: String,
    pub notification: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct StatsJson {
    #[serde(flatten)]
    pub stats: TaskStats,
    pub suggestion: String,
}

#[derive(Serialize)]
pub struct MessageJson {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        title: task.title.clone(),
        completed: task.completed,
        due: task.due_date.as_ref().map(dates::format_due),
        category: task.category.clone(),
        notification: task.notification_enabled,
        priority: task.priority,
        description: task.description.clone(),
        created_at: dates::format_created(&task.created_at),
    }
}

pub fn stats_to_json(stats: TaskStats) -> StatsJson {
    StatsJson {
        stats,
        suggestion: stats.suggestion(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single row as a one-line summary
pub fn format_row(row: &TaskRow) -> String {
    format!(
        "{} {}  {}  ({})  {}",
        row.checkbox(),
        row.id,
        row.title,
        row.due,
        row.category_tag()
    )
}

pub fn format_list(view: &ListView) -> Vec<String> {
    match view {
        ListView::Empty(text) => vec![text.to_string()],
        ListView::Rows(rows) => rows.iter().map(format_row).collect(),
    }
}

pub fn format_stats(stats: &TaskStats) -> Vec<String> {
    vec![
        format!(
            "{} total, {} remaining, {} completed",
            stats.total, stats.remaining, stats.completed
        ),
        stats.suggestion(),
    ]
}
