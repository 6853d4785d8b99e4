use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::dates;

/// Opaque task identifier.
///
/// Local tasks use a millisecond timestamp, remote tasks a server-assigned
/// string. Older local payloads stored the id as a JSON number, so both forms
/// are accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(i64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => Ok(TaskId(s)),
            Raw::Int(n) => Ok(TaskId(n.to_string())),
        }
    }
}

/// Known task categories.
///
/// The stored category string is kept verbatim on the task; this enum only
/// drives icons and labels, with unknown values shown as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    /// Resolve a stored category string, falling back to `Other`
    pub fn from_stored(s: &str) -> Category {
        match s {
            "personal" => Category::Personal,
            "work" => Category::Work,
            "shopping" => Category::Shopping,
            "health" => Category::Health,
            _ => Category::Other,
        }
    }

    /// The value written to storage and the wire
    pub fn key(self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// Single-cell glyph shown next to the label
    pub fn icon(self) -> &'static str {
        match self {
            Category::Personal => "@",
            Category::Work => "#",
            Category::Shopping => "$",
            Category::Health => "+",
            Category::Other => "*",
        }
    }

    /// Next category in display order (wraps)
    pub fn next(self) -> Category {
        let idx = Category::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }

    pub fn prev(self) -> Category {
        let idx = Category::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Category::ALL[(idx + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Priority> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

fn default_category() -> String {
    Category::Personal.key().to_string()
}

/// A single to-do item.
///
/// Field names follow the persisted layout; aliases accept the snake_case
/// names the REST backend returns and the legacy `text` title field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: TaskId,
    #[serde(alias = "text")]
    pub title: String,
    #[serde(
        rename = "dueDate",
        alias = "due_date",
        default,
        with = "dates::due_date"
    )]
    pub due_date: Option<NaiveDateTime>,
    /// Stored verbatim, see [`Task::category_kind`]
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(rename = "notification", default)]
    pub notification_enabled: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "createdAt", alias = "created_at", with = "dates::created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn category_kind(&self) -> Category {
        Category::from_stored(&self.category)
    }

    /// Apply a patch in place. `created_at` and `id` are never touched.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
        if let Some(ref category) = patch.category {
            self.category = category.clone();
        }
        if let Some(notify) = patch.notification_enabled {
            self.notification_enabled = notify;
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(rename = "dueDate", with = "dates::due_date")]
    pub due_date: Option<NaiveDateTime>,
    pub category: String,
    #[serde(rename = "notification")]
    pub notification_enabled: bool,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            due_date: None,
            category: default_category(),
            notification_enabled: false,
            description: String::new(),
            priority: Priority::default(),
        }
    }

    pub fn due(mut self, due: NaiveDateTime) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn notify(mut self, enabled: bool) -> Self {
        self.notification_enabled = enabled;
        self
    }
}

/// Partial update. `None` leaves the field untouched; `due_date: Some(None)`
/// clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(
        rename = "dueDate",
        skip_serializing_if = "Option::is_none",
        serialize_with = "dates::serialize_due_patch"
    )]
    pub due_date: Option<Option<NaiveDateTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "notification", skip_serializing_if = "Option::is_none")]
    pub notification_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        TaskPatch {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        TaskPatch {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_legacy_local_payload() {
        let json = r#"{
            "id": 1714567890123,
            "text": "Buy milk",
            "dueDate": "",
            "category": "shopping",
            "notification": false,
            "completed": false,
            "createdAt": "2024-05-01T12:51:30.123Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::new("1714567890123"));
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.due_date, None);
        assert_eq!(task.category_kind(), Category::Shopping);
        assert_eq!(
            task.created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 51, 30).unwrap()
                + chrono::TimeDelta::milliseconds(123)
        );
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn reads_remote_payload() {
        let json = r#"{
            "_id": "6632a0f1c2b5a3d4e5f60718",
            "title": "Ship report",
            "description": "",
            "due_date": "2024-05-02T09:30",
            "category": "work",
            "priority": "high",
            "completed": true,
            "notification": true,
            "user_id": "u1",
            "created_at": "2024-05-01T08:00:00.500000",
            "updated_at": "2024-05-01T08:00:00.500000"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "6632a0f1c2b5a3d4e5f60718");
        assert_eq!(
            task.due_date,
            Some(
                NaiveDate::from_ymd_opt(2024, 5, 2)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap()
            )
        );
        assert!(task.completed);
        assert!(task.notification_enabled);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn unknown_category_is_preserved_but_shown_as_other() {
        let json = r#"{"id":"1","title":"x","category":"errands","createdAt":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.category, "errands");
        assert_eq!(task.category_kind(), Category::Other);
        assert_eq!(task.category_kind().label(), "Other");

        let out = serde_json::to_string(&task).unwrap();
        assert!(out.contains(r#""category":"errands""#));
    }

    #[test]
    fn writes_canonical_field_names() {
        let task = Task {
            id: TaskId::new("42"),
            title: "Walk".into(),
            due_date: Some(
                NaiveDate::from_ymd_opt(2024, 6, 1)
                    .unwrap()
                    .and_hms_opt(18, 0, 0)
                    .unwrap(),
            ),
            category: "health".into(),
            notification_enabled: true,
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 30, 10, 0, 0).unwrap(),
            description: String::new(),
            priority: Priority::Low,
        };
        let value: serde_json::Value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "42");
        assert_eq!(value["title"], "Walk");
        assert_eq!(value["dueDate"], "2024-06-01T18:00");
        assert_eq!(value["notification"], true);
        assert_eq!(value["createdAt"], "2024-05-30T10:00:00.000Z");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn apply_patch_keeps_identity_fields() {
        let mut task = Task {
            id: TaskId::new("1"),
            title: "Old".into(),
            due_date: None,
            category: "work".into(),
            notification_enabled: false,
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            description: String::new(),
            priority: Priority::Medium,
        };
        let before = task.created_at;
        task.apply(&TaskPatch {
            title: Some("New".into()),
            completed: Some(true),
            ..Default::default()
        });
        assert_eq!(task.title, "New");
        assert!(task.completed);
        assert_eq!(task.created_at, before);
        assert_eq!(task.id.as_str(), "1");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let body = serde_json::to_value(TaskPatch::completed(true)).unwrap();
        assert_eq!(body, serde_json::json!({ "completed": true }));

        let clear_due = TaskPatch {
            due_date: Some(None),
            ..Default::default()
        };
        let body = serde_json::to_value(clear_due).unwrap();
        assert_eq!(body, serde_json::json!({ "dueDate": null }));
    }

    #[test]
    fn category_cycles() {
        assert_eq!(Category::Other.next(), Category::Personal);
        assert_eq!(Category::Personal.prev(), Category::Other);
        assert_eq!(Category::Work.next(), Category::Shopping);
    }
}
