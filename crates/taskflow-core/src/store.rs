use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::datetime::DayZone;
use crate::kv::KeyValueStore;
use crate::task::{Category, CategoryId, Task, TaskDraft, TaskId};

pub const DEFAULT_TASKS_KEY: &str = "tasks";

/// Owned task list, mirrored to a key-value backend after every
/// mutation. Newest tasks come first.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStore<S> {
    backend: S,
    key: String,
    tasks: Vec<Task>,
    categories: Vec<Category>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Rehydrates from `key`. Missing or unreadable data yields an empty
    /// list.
    #[tracing::instrument(skip(backend, categories))]
    pub fn open(backend: S, key: &str, categories: Vec<Category>) -> Self {
        let tasks = load_tasks(&backend, key);
        info!(
            key,
            tasks = tasks.len(),
            categories = categories.len(),
            "opened task store"
        );
        Self {
            backend,
            key: key.to_string(),
            tasks,
            categories,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category reference; dangling ids resolve to `None`.
    pub fn category(&self, id: Option<&CategoryId>) -> Option<&Category> {
        let id = id?;
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    #[tracing::instrument(skip(self, draft, zone), fields(title = %draft.title))]
    pub fn create(&mut self, draft: TaskDraft, now: DateTime<Utc>, zone: &DayZone) -> TaskId {
        let mut id = TaskId::generate();
        while self.get(&id).is_some() {
            id = TaskId::generate();
        }
        let task = Task::from_draft(draft, id.clone(), now, zone);
        self.tasks.insert(0, task);
        self.persist();
        id
    }

    /// Replaces the record with the same id. Returns whether one existed.
    #[tracing::instrument(skip(self, task), fields(id = %task.id))]
    pub fn update(&mut self, task: Task) -> bool {
        let found = match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        };
        self.finish("update", found)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        let found = self.tasks.len() != before;
        self.finish("delete", found)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_completed(&mut self, id: &TaskId) -> bool {
        let found = self.modify(id, |t| t.completed = !t.completed);
        self.finish("toggle_completed", found)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_important(&mut self, id: &TaskId) -> bool {
        let found = self.modify(id, |t| t.important = !t.important);
        self.finish("toggle_important", found)
    }

    fn modify(&mut self, id: &TaskId, f: impl FnOnce(&mut Task)) -> bool {
        match self.tasks.iter_mut().find(|t| &t.id == id) {
            Some(task) => {
                f(task);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, op: &'static str, found: bool) -> bool {
        if !found {
            debug!(op, "no task with that id; nothing changed");
        }
        self.persist();
        found
    }

    /// Writes the whole list under the store key. Failures are logged;
    /// the in-memory list stays authoritative.
    pub fn persist(&mut self) {
        let json = match serde_json::to_string(&self.tasks) {
            Ok(json) => json,
            Err(err) => {
                error!(error = %err, "failed serializing tasks");
                return;
            }
        };
        match self.backend.set_item(&self.key, &json) {
            Ok(()) => debug!(key = %self.key, count = self.tasks.len(), "persisted tasks"),
            Err(err) => error!(key = %self.key, error = %err, "failed persisting tasks"),
        }
    }
}

fn load_tasks<S: KeyValueStore>(backend: &S, key: &str) -> Vec<Task> {
    let raw = match backend.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            error!(key, error = %err, "failed reading stored tasks");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            error!(key, error = %err, "stored tasks are malformed; starting empty");
            Vec::new()
        }
    }
}
