use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::io::slot::{JsonSlot, SlotRead};
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::ops::filter::{Filter, Ordering};
use crate::ops::task_ops;

use super::{Backend, StoreError};

/// File name of the local task slot
pub const TASKS_FILE: &str = "tasks.json";

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Keeps every task in one JSON file, rewritten on each mutation
pub struct LocalBackend {
    slot: JsonSlot,
    tasks: Vec<Task>,
    clock: Clock,
}

impl LocalBackend {
    /// Open the slot in `data_dir`, hydrating from whatever is on disk
    pub fn open(data_dir: &Path) -> Self {
        Self::open_with_clock(JsonSlot::new(data_dir.join(TASKS_FILE)), Box::new(Utc::now))
    }

    pub fn open_with_clock(slot: JsonSlot, clock: Clock) -> Self {
        let tasks = hydrate(&slot);
        LocalBackend { slot, tasks, clock }
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.slot
            .write(&self.tasks)
            .map_err(|e| StoreError::Persist {
                path: self.slot.path().to_path_buf(),
                source: e,
            })
    }

    fn position(&self, id: &TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

/// Read the slot. Missing or malformed payloads hydrate as an empty set.
fn hydrate(slot: &JsonSlot) -> Vec<Task> {
    match slot.read::<Vec<Task>>() {
        SlotRead::Loaded(tasks) => {
            debug!(count = tasks.len(), path = %slot.path().display(), "loaded tasks");
            tasks
        }
        SlotRead::Missing => Vec::new(),
        SlotRead::Corrupt(e) => {
            warn!(path = %slot.path().display(), error = %e, "task slot unreadable, starting empty");
            Vec::new()
        }
    }
}

impl Backend for LocalBackend {
    fn ordering(&self) -> Ordering {
        Ordering::Local
    }

    fn fetch(&mut self, _filter: Filter) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.clone())
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Option<Task>, StoreError> {
        let task = task_ops::create_local_task(draft, &self.tasks, (self.clock)());
        self.tasks.push(task.clone());
        if let Err(e) = self.persist() {
            self.tasks.pop();
            return Err(e);
        }
        Ok(Some(task))
    }

    fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        let previous = self.tasks[idx].clone();
        self.tasks[idx].apply(patch);
        if let Err(e) = self.persist() {
            self.tasks[idx] = previous;
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        let removed = self.tasks.remove(idx);
        if let Err(e) = self.persist() {
            self.tasks.insert(idx, removed);
            return Err(e);
        }
        Ok(())
    }
}
