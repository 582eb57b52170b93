use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::datetime::{DayZone, DueDate};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: CategoryId::from(id),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

pub fn seed_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Work", "#3b82f6"),
        Category::new("2", "Personal", "#22c55e"),
        Category::new("3", "Shopping", "#f59e0b"),
        Category::new("4", "Health", "#f43f5e"),
        Category::new("5", "Study", "#a855f7"),
        Category::new("6", "Leisure", "#ec4899"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub important: bool,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    #[serde(default)]
    pub due_date: Option<DueDate>,

    pub created_at: DateTime<Utc>,
}

/// Form input for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub due: Option<NaiveDate>,
    pub important: bool,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Draft pre-filled from an existing record, for the edit form.
    pub fn from_task(task: &Task, zone: &DayZone) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category_id: task.category_id.clone(),
            due: task.due_day(zone),
            important: task.important,
        }
    }
}

impl Task {
    pub fn from_draft(draft: TaskDraft, id: TaskId, now: DateTime<Utc>, zone: &DayZone) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            completed: false,
            important: draft.important,
            category_id: draft.category_id,
            due_date: draft.due.map(|day| DueDate::from_local_day(day, zone)),
            created_at: now,
        }
    }

    /// Overwrites the editable fields, keeping identity, creation time
    /// and completion.
    pub fn apply_draft(&mut self, draft: TaskDraft, zone: &DayZone) {
        self.title = draft.title.trim().to_string();
        self.description = draft.description.trim().to_string();
        self.important = draft.important;
        self.category_id = draft.category_id;
        let unchanged_day = self
            .due_date
            .as_ref()
            .and_then(|due| due.local_day(zone))
            == draft.due
            && self.due_date.is_some();
        if !unchanged_day {
            self.due_date = draft.due.map(|day| DueDate::from_local_day(day, zone));
        }
    }

    pub fn due_day(&self, zone: &DayZone) -> Option<NaiveDate> {
        self.due_date.as_ref()?.local_day(zone)
    }

    pub fn is_due_on(&self, day: NaiveDate, zone: &DayZone) -> bool {
        self.due_day(zone) == Some(day)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>, zone: &DayZone) -> bool {
        if self.completed {
            return false;
        }
        self.due_date
            .as_ref()
            .and_then(|due| due.instant(zone))
            .map(|due| due < now)
            .unwrap_or(false)
    }

    pub fn matches_text(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}
