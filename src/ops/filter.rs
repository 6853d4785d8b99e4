use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Which slice of the task list is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Whether a task belongs in this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            other => Err(format!(
                "unknown filter '{}' (expected all, active, completed)",
                other
            )),
        }
    }
}

/// How the visible list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Incomplete before completed, newest first within each group
    Local,
    /// Keep the order the backend returned
    Server,
}

/// Select the tasks for `filter`, in display order.
pub fn visible<'a>(tasks: &'a [Task], filter: Filter, ordering: Ordering) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    if ordering == Ordering::Local {
        sort_for_display(&mut out);
    }
    out
}

/// Stable sort: `completed` ascending, then `created_at` descending.
pub fn sort_for_display(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
