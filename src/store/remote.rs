use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::io::session::SessionSlot;
use crate::model::session::Session;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::ops::filter::{Filter, Ordering};

use super::{Backend, StoreError};

/// Forwards every operation to the REST API with the stored bearer token
pub struct RemoteBackend {
    api: ApiClient,
    sessions: SessionSlot,
    session: Option<Session>,
}

impl RemoteBackend {
    pub fn new(api: ApiClient, sessions: SessionSlot) -> Self {
        let session = sessions.load();
        RemoteBackend {
            api,
            sessions,
            session,
        }
    }

    fn token(&self) -> Result<String, StoreError> {
        self.session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| StoreError::Auth("Please log in first".to_string()))
    }

    /// Map an API error, dropping the session on 401
    fn fail(&mut self, err: ApiError) -> StoreError {
        if let ApiError::Unauthorized(ref msg) = err {
            info!(reason = %msg, "credential rejected, clearing session");
            self.session = None;
            if let Err(e) = self.sessions.clear() {
                warn!(error = %e, "could not remove session file");
            }
        }
        StoreError::from(err)
    }
}

impl Backend for RemoteBackend {
    fn ordering(&self) -> Ordering {
        Ordering::Server
    }

    fn fetch(&mut self, filter: Filter) -> Result<Vec<Task>, StoreError> {
        let token = self.token()?;
        self.api
            .list_tasks(&token, filter)
            .map_err(|e| self.fail(e))
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Option<Task>, StoreError> {
        let token = self.token()?;
        self.api
            .create_task(&token, &draft)
            .map_err(|e| self.fail(e))
    }

    fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let token = self.token()?;
        self.api
            .update_task(&token, id, patch)
            .map_err(|e| self.fail(e))
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let token = self.token()?;
        self.api.delete_task(&token, id).map_err(|e| self.fail(e))
    }
}
