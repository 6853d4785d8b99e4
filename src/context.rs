//! Resolved runtime settings shared by the CLI and the TUI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::io::config_io::{self, ConfigError};
use crate::io::session::SessionSlot;
use crate::model::config::{AppConfig, StorageMode};
use crate::store::{AnyBackend, LocalBackend, RemoteBackend, StoreError, TaskStore};

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub mode: StorageMode,
}

impl AppContext {
    /// Load config and apply command-line overrides
    pub fn load(
        config_path: Option<&Path>,
        data_dir: Option<&Path>,
        force_remote: bool,
    ) -> Result<Self, ConfigError> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_io::default_config_path);
        let config = config_io::read_config(&path)?;
        Ok(AppContext::from_config(config, data_dir, force_remote))
    }

    pub fn from_config(config: AppConfig, data_dir: Option<&Path>, force_remote: bool) -> Self {
        let data_dir = config_io::resolve_data_dir(&config, data_dir);
        let mode = if force_remote {
            StorageMode::Remote
        } else {
            config.storage.mode
        };
        debug!(data_dir = %data_dir.display(), ?mode, "context resolved");
        AppContext {
            config,
            data_dir,
            mode,
        }
    }

    pub fn sessions(&self) -> SessionSlot {
        SessionSlot::in_dir(&self.data_dir)
    }

    pub fn api(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(
            &self.config.remote.base_url,
            Duration::from_secs(self.config.remote.timeout_secs),
        )
    }

    pub fn backend(&self) -> Result<AnyBackend, StoreError> {
        Ok(match self.mode {
            StorageMode::Local => AnyBackend::Local(LocalBackend::open(&self.data_dir)),
            StorageMode::Remote => AnyBackend::Remote(RemoteBackend::new(self.api()?, self.sessions())),
        })
    }

    /// Build the store for the configured mode and load the task set
    pub fn open_store(&self) -> Result<TaskStore<AnyBackend>, StoreError> {
        TaskStore::open(self.backend()?)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("todo.log")
    }
}
