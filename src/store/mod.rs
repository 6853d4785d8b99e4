//! The task store: sole owner of the in-memory task set.
//!
//! Persistence is injected as a [`Backend`]. The local backend keeps the full
//! set in a JSON slot; the remote backend forwards every mutation to the REST
//! API and re-fetches afterwards.

pub mod local;
pub mod remote;

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::api::ApiError;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::ops::filter::{self, Filter, Ordering};
use crate::ops::task_ops::{self, ValidationError};

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The remote session is gone; the user must log in again
    #[error("{0}")]
    Auth(String),
    #[error("Error connecting to server")]
    Network(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("could not save tasks to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Client(String),
}

impl StoreError {
    /// Text for a transient on-screen message
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Auth(_) => "Session expired. Please log in again.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Auth(_))
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(msg) => StoreError::Auth(msg),
            ApiError::Status { status, message } => StoreError::Server { status, message },
            ApiError::Network(msg) => StoreError::Network(msg),
            other @ (ApiError::BadBaseUrl { .. } | ApiError::Decode(_)) => {
                StoreError::Client(other.to_string())
            }
        }
    }
}

/// Persistence adapter behind the store
pub trait Backend {
    /// Whether the store should sort tasks itself or keep backend order
    fn ordering(&self) -> Ordering;
    /// Current task set. Backends that filter server-side honor `filter`.
    fn fetch(&mut self, filter: Filter) -> Result<Vec<Task>, StoreError>;
    /// Persist a new task from an already validated draft. Returns the
    /// created task when the backend reports it back.
    fn create(&mut self, draft: TaskDraft) -> Result<Option<Task>, StoreError>;
    fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError>;
    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError>;
}

/// Backend chosen at runtime from configuration
pub enum AnyBackend {
    Local(LocalBackend),
    Remote(RemoteBackend),
}

impl Backend for AnyBackend {
    fn ordering(&self) -> Ordering {
        match self {
            AnyBackend::Local(b) => b.ordering(),
            AnyBackend::Remote(b) => b.ordering(),
        }
    }

    fn fetch(&mut self, filter: Filter) -> Result<Vec<Task>, StoreError> {
        match self {
            AnyBackend::Local(b) => b.fetch(filter),
            AnyBackend::Remote(b) => b.fetch(filter),
        }
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Option<Task>, StoreError> {
        match self {
            AnyBackend::Local(b) => b.create(draft),
            AnyBackend::Remote(b) => b.create(draft),
        }
    }

    fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        match self {
            AnyBackend::Local(b) => b.update(id, patch),
            AnyBackend::Remote(b) => b.update(id, patch),
        }
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        match self {
            AnyBackend::Local(b) => b.delete(id),
            AnyBackend::Remote(b) => b.delete(id),
        }
    }
}

fn newest_unknown<'a>(tasks: &'a [Task], known: &HashSet<TaskId>, title: &str) -> Option<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.title == title && !known.contains(&t.id))
        .max_by_key(|t| t.created_at)
}

type Listener = Box<dyn FnMut(&[Task])>;

pub struct TaskStore<B: Backend> {
    backend: B,
    tasks: Vec<Task>,
    filter: Filter,
    listeners: Vec<Listener>,
}

impl<B: Backend> TaskStore<B> {
    /// Build the store and hydrate it with the `all` filter
    pub fn open(backend: B) -> Result<Self, StoreError> {
        Self::open_with_filter(backend, Filter::All)
    }

    pub fn open_with_filter(backend: B, filter: Filter) -> Result<Self, StoreError> {
        let mut store = TaskStore {
            backend,
            tasks: Vec::new(),
            filter,
            listeners: Vec::new(),
        };
        store.refresh()?;
        Ok(store)
    }

    /// Register a callback run after every refresh with the new task set
    pub fn subscribe(&mut self, listener: impl FnMut(&[Task]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Reload from the backend and notify listeners
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        self.tasks = self.backend.fetch(self.filter)?;
        debug!(count = self.tasks.len(), filter = %self.filter, "task set refreshed");
        for listener in &mut self.listeners {
            listener(&self.tasks);
        }
        Ok(())
    }

    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, StoreError> {
        let draft = task_ops::validate_draft(draft)?;
        let title = draft.title.clone();
        let known: HashSet<TaskId> = self.tasks.iter().map(|t| t.id.clone()).collect();
        let created = self.backend.create(draft)?;
        self.refresh()?;
        let task = match created {
            Some(task) => self.get(&task.id).cloned().unwrap_or(task),
            None => self.locate_created(&known, &title)?,
        };
        debug!(id = %task.id, "task added");
        Ok(task)
    }

    /// Find a task the backend created without echoing it: the newest task
    /// titled `title` that was not known before the add.
    fn locate_created(&mut self, known: &HashSet<TaskId>, title: &str) -> Result<Task, StoreError> {
        if let Some(task) = newest_unknown(&self.tasks, known, title) {
            return Ok(task.clone());
        }
        // Hidden by the current filter
        let all = self.backend.fetch(Filter::All)?;
        newest_unknown(&all, known, title)
            .cloned()
            .ok_or_else(|| StoreError::Client(format!("created task \"{}\" is missing from the task list", title)))
    }

    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let patch = task_ops::validate_patch(patch)?;
        let mut expected = self
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.backend.update(id, &patch)?;
        debug!(id = %id, "task updated");
        expected.apply(&patch);
        self.refresh()?;
        Ok(self.get(id).cloned().unwrap_or(expected))
    }

    /// Flip `completed` on a task
    pub fn toggle(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        let completed = self
            .get(id)
            .map(|t| t.completed)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.update(id, TaskPatch::completed(!completed))
    }

    pub fn remove(&mut self, id: &TaskId) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.backend.delete(id)?;
        debug!(id = %id, "task removed");
        self.refresh()
    }

    /// The full known task set, unfiltered
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Switch the filter and reload
    pub fn set_filter(&mut self, filter: Filter) -> Result<(), StoreError> {
        self.filter = filter;
        self.refresh()
    }

    /// Tasks for the current filter in display order
    pub fn visible(&self) -> Vec<&Task> {
        filter::visible(&self.tasks, self.filter, self.backend.ordering())
    }
}
