//! Row actions and the messages they produce.
//!
//! Front-ends collect the edit text or the delete confirmation first (through
//! a [`Prompter`] or a modal), then hand a resolved [`RowAction`] to [`apply`].

use tracing::debug;

use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::store::{Backend, StoreError, TaskStore};

pub const ADDED: &str = "Task added successfully!";
pub const UPDATED: &str = "Task updated successfully!";
pub const DELETED: &str = "Task deleted successfully!";
pub const MARKED_COMPLETED: &str = "Task marked as completed!";
pub const MARKED_ACTIVE: &str = "Task marked as active!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Toggle,
    /// Replacement title. `None` means the user cancelled.
    Edit(Option<String>),
    Delete { confirmed: bool },
}

/// Collects user input for edit and delete
pub trait Prompter {
    /// Ask for a replacement title, pre-filled with `current`.
    /// `None` when the user cancels.
    fn prompt_title(&mut self, current: &str) -> Option<String>;
    fn confirm_delete(&mut self, task: &Task) -> bool;
}

impl RowAction {
    pub fn edit_with(prompter: &mut dyn Prompter, task: &Task) -> RowAction {
        RowAction::Edit(prompter.prompt_title(&task.title))
    }

    pub fn delete_with(prompter: &mut dyn Prompter, task: &Task) -> RowAction {
        RowAction::Delete {
            confirmed: prompter.confirm_delete(task),
        }
    }
}

/// Add a task, returning the success message
pub fn add<B: Backend>(store: &mut TaskStore<B>, draft: TaskDraft) -> Result<String, StoreError> {
    store.add(draft)?;
    Ok(ADDED.to_string())
}

/// Run an action against a row.
///
/// `Ok(None)` means nothing happened: a cancelled or blank edit, or an
/// unconfirmed delete.
pub fn apply<B: Backend>(
    store: &mut TaskStore<B>,
    id: &TaskId,
    action: RowAction,
) -> Result<Option<String>, StoreError> {
    match action {
        RowAction::Toggle => {
            let task = store.toggle(id)?;
            Ok(Some(
                if task.completed { MARKED_COMPLETED } else { MARKED_ACTIVE }.to_string(),
            ))
        }
        RowAction::Edit(None) => Ok(None),
        RowAction::Edit(Some(title)) => {
            if title.trim().is_empty() {
                debug!(id = %id, "blank edit ignored");
                return Ok(None);
            }
            store.update(id, TaskPatch::title(title))?;
            Ok(Some(UPDATED.to_string()))
        }
        RowAction::Delete { confirmed: false } => Ok(None),
        RowAction::Delete { confirmed: true } => {
            store.remove(id)?;
            Ok(Some(DELETED.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalBackend;
    use tempfile::TempDir;

    struct Scripted {
        title: Option<String>,
        confirm: bool,
    }

    impl Prompter for Scripted {
        fn prompt_title(&mut self, _current: &str) -> Option<String> {
            self.title.take()
        }

        fn confirm_delete(&mut self, _task: &Task) -> bool {
            self.confirm
        }
    }

    fn store_with(dir: &TempDir, title: &str) -> (TaskStore<LocalBackend>, Task) {
        let mut store = TaskStore::open(LocalBackend::open(dir.path())).unwrap();
        let task = store.add(TaskDraft::new(title)).unwrap();
        (store, task)
    }

    #[test]
    fn toggle_reports_new_state() {
        let dir = TempDir::new().unwrap();
        let (mut store, task) = store_with(&dir, "Walk");
        let msg = apply(&mut store, &task.id, RowAction::Toggle).unwrap();
        assert_eq!(msg.as_deref(), Some(MARKED_COMPLETED));
        let msg = apply(&mut store, &task.id, RowAction::Toggle).unwrap();
        assert_eq!(msg.as_deref(), Some(MARKED_ACTIVE));
    }

    #[test]
    fn cancelled_or_blank_edit_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let (mut store, task) = store_with(&dir, "Original");

        let mut cancel = Scripted { title: None, confirm: false };
        let action = RowAction::edit_with(&mut cancel, &task);
        assert_eq!(apply(&mut store, &task.id, action).unwrap(), None);

        let mut blank = Scripted { title: Some("   ".into()), confirm: false };
        let action = RowAction::edit_with(&mut blank, &task);
        assert_eq!(apply(&mut store, &task.id, action).unwrap(), None);

        assert_eq!(store.get(&task.id).unwrap().title, "Original");
    }

    #[test]
    fn edit_replaces_title() {
        let dir = TempDir::new().unwrap();
        let (mut store, task) = store_with(&dir, "Original");
        let msg = apply(&mut store, &task.id, RowAction::Edit(Some("Renamed ".into()))).unwrap();
        assert_eq!(msg.as_deref(), Some(UPDATED));
        assert_eq!(store.get(&task.id).unwrap().title, "Renamed");
    }

    #[test]
    fn delete_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let (mut store, task) = store_with(&dir, "Keep me");
        store.add(TaskDraft::new("Other")).unwrap();

        let mut no = Scripted { title: None, confirm: false };
        let action = RowAction::delete_with(&mut no, &task);
        assert_eq!(apply(&mut store, &task.id, action).unwrap(), None);
        assert_eq!(store.list().len(), 2);

        let mut yes = Scripted { title: None, confirm: true };
        let action = RowAction::delete_with(&mut yes, &task);
        assert_eq!(apply(&mut store, &task.id, action).unwrap().as_deref(), Some(DELETED));
        assert_eq!(store.list().len(), 1);
        assert!(store.get(&task.id).is_none());
    }

    #[test]
    fn add_message_and_validation() {
        let dir = TempDir::new().unwrap();
        let mut store = TaskStore::open(LocalBackend::open(dir.path())).unwrap();
        assert_eq!(add(&mut store, TaskDraft::new("x")).unwrap(), ADDED);
        let err = add(&mut store, TaskDraft::new("")).unwrap_err();
        assert_eq!(err.user_message(), "Please enter a task title");
        assert_eq!(store.list().len(), 1);
    }
}
