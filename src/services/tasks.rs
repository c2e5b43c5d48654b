use anyhow::{Context, Result};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Category, Task, TaskDraft, TaskPatch, TaskStats};
use crate::storage::KeyValueStore;

/// Storage key holding the serialized task collection.
pub const TASKS_KEY: &str = "taskdeck-tasks";

/// Lifecycle of the in-memory collection. Reads are refused until the store
/// has gone through `load`, so "not yet loaded" is distinguishable from
/// "no tasks".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task collection has not finished loading")]
    NotReady,
}

/// Single source of truth for the task collection. Every mutation rewrites
/// the whole collection to storage before returning; unknown ids are silent
/// no-ops rather than errors.
#[derive(Debug)]
pub struct TaskStore<S> {
    storage: S,
    tasks: Vec<Task>,
    state: LoadState,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
            state: LoadState::Uninitialized,
        }
    }

    /// Read the persisted collection. Absent data yields an empty collection;
    /// present but unparseable data is logged and discarded for the session.
    /// The store is `Ready` afterwards either way.
    pub fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        let stored = self
            .storage
            .get(TASKS_KEY)
            .context("Failed to read stored tasks")?;
        self.tasks = match stored {
            Some(text) => match serde_json::from_str::<Vec<Task>>(&text) {
                Ok(tasks) => tasks,
                Err(error) => {
                    warn!(%error, "Stored task data is unparseable; starting with an empty collection");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        self.state = LoadState::Ready;
        Ok(())
    }

    pub fn load_state(&self) -> LoadState {
        self.state
    }

    /// Snapshot of the collection, newest first.
    pub fn tasks(&self) -> Result<&[Task], StoreError> {
        self.ensure_ready()?;
        Ok(&self.tasks)
    }

    pub fn task(&self, id: &str) -> Result<Option<&Task>, StoreError> {
        self.ensure_ready()?;
        Ok(self.tasks.iter().find(|task| task.id == id))
    }

    /// Aggregate counts over the in-memory collection; no persistence side effect.
    pub fn stats(&self) -> Result<TaskStats, StoreError> {
        Ok(TaskStats::compute(self.tasks()?))
    }

    /// Create a task from the draft, prepend it, and persist.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        self.ensure_ready()?;
        let task = draft.into_task(Utc::now());
        self.tasks.insert(0, task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Merge the patch over the task with the given id and persist. Unknown
    /// ids leave the collection untouched and return `None`.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        self.ensure_ready()?;
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };
        patch.apply(task);
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    pub fn set_category(&mut self, id: &str, category: Category) -> Result<Option<Task>> {
        self.update(id, TaskPatch::category(category))
    }

    /// Hard delete; returns whether a task was removed. Repeating the call is
    /// a no-op.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        self.ensure_ready()?;
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        self.persist()?;
        Ok(removed)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        match self.state {
            LoadState::Ready => Ok(()),
            LoadState::Uninitialized | LoadState::Loading => Err(StoreError::NotReady),
        }
    }

    fn persist(&mut self) -> Result<()> {
        let payload =
            serde_json::to_string(&self.tasks).context("Failed to serialize task collection")?;
        self.storage
            .set(TASKS_KEY, &payload)
            .context("Failed to write task collection")?;
        debug!(count = self.tasks.len(), "Task collection persisted");
        Ok(())
    }
}
