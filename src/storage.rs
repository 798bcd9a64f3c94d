//! Persistence adapter: the whole task collection lives as one JSON blob in
//! a single file, rewritten from scratch after every mutation.

use crate::error::Result;
use crate::task::Task;
use std::fs;
use std::path::PathBuf;

/// Directory under the home directory holding the storage file and the log.
const DATA_DIR_NAME: &str = ".taskdeck";

/// The storage filename (the fixed key of the persistence slot).
pub const STORAGE_FILENAME: &str = "tasks.json";

/// `~/.taskdeck/`, or `None` if the home directory cannot be determined.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Default location of the storage file, falling back to the current
/// directory when there is no home.
pub fn default_storage_path() -> PathBuf {
    data_dir().map_or_else(|| PathBuf::from(STORAGE_FILENAME), |dir| dir.join(STORAGE_FILENAME))
}

/// Reads and writes the serialized task collection at a fixed path.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored collection. A missing file means no tasks yet; a file
    /// that fails to read or parse is logged and treated as empty rather
    /// than surfaced to the user.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(tasks) => tasks,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "stored tasks are not valid JSON, starting empty");
                    Vec::new()
                }
            },
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read stored tasks, starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize the full collection and overwrite the stored blob.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(tasks)?)?;
        Ok(())
    }
}
