use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

/// Outcome of reading a slot
#[derive(Debug)]
pub enum SlotRead<T> {
    /// No file on disk
    Missing,
    /// File exists but could not be read or parsed
    Corrupt(String),
    Loaded(T),
}

/// A single durable JSON value stored in one file
#[derive(Debug, Clone)]
pub struct JsonSlot {
    path: PathBuf,
}

impl JsonSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSlot { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read<T: DeserializeOwned>(&self) -> SlotRead<T> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return SlotRead::Missing,
            Err(e) => return SlotRead::Corrupt(e.to_string()),
        };
        match serde_json::from_str(&content) {
            Ok(v) => SlotRead::Loaded(v),
            Err(e) => SlotRead::Corrupt(e.to_string()),
        }
    }

    /// Serialize `value` and replace the slot atomically
    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(value)?;
        atomic_write(&self.path, content.as_bytes())
    }

    /// Remove the slot. Clearing a missing slot is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
