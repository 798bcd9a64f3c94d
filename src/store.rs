//! The authoritative in-memory task collection. Every mutation is followed
//! by a full save of the whole collection, so memory and the storage file
//! stay in lockstep.

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{next_task_id, Task, TaskDraft};

#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Storage,
}

impl TaskStore {
    /// Open the store, loading whatever the storage file currently holds.
    pub fn open(storage: Storage) -> Self {
        let tasks = storage.load();
        Self { tasks, storage }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate the draft, assign a fresh id, append, persist.
    pub fn create(&mut self, draft: TaskDraft) -> Result<&Task> {
        if let Some(field) = draft.missing_field() {
            return Err(Error::EmptyField(field));
        }
        let task = draft.into_task(next_task_id());
        tracing::debug!(id = %task.id, name = %task.name, "task created");
        self.tasks.push(task);
        self.persist()?;
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Replace the task with this id in place, keeping its id and position.
    /// Returns `Ok(None)` without mutating anything when the id is unknown.
    pub fn update(&mut self, id: &str, draft: TaskDraft) -> Result<Option<&Task>> {
        if let Some(field) = draft.missing_field() {
            return Err(Error::EmptyField(field));
        }
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        self.tasks[index] = draft.into_task(id.to_string());
        tracing::debug!(%id, "task updated");
        self.persist()?;
        Ok(Some(&self.tasks[index]))
    }

    /// Remove the task with this id. Returns whether anything was removed;
    /// a second delete of the same id is a no-op. Confirmation is the
    /// caller's responsibility.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        tracing::debug!(%id, "task deleted");
        self.persist()?;
        Ok(true)
    }

    /// Empty the collection and persist the empty blob. The caller decides
    /// whether an already-empty collection is worth reporting.
    pub fn clear_all(&mut self) -> Result<()> {
        self.tasks.clear();
        tracing::debug!("all tasks cleared");
        self.persist()
    }

    /// Case-insensitive substring match over name, type, and description.
    /// An empty term returns everything in insertion order.
    pub fn search(&self, term: &str) -> Vec<&Task> {
        let term = term.to_lowercase();
        if term.is_empty() {
            return self.tasks.iter().collect();
        }
        self.tasks
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&term)
                    || t.kind.to_lowercase().contains(&term)
                    || t.description.to_lowercase().contains(&term)
            })
            .collect()
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.tasks)
    }
}
