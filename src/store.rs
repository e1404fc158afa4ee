//! In-memory task store backing the HTTP API.
//!
//! Tasks live in a map keyed by id, with a separate insertion-order list so
//! `list()` returns tasks in the order they were created. Ids come from a
//! monotonic counter owned by the store and are never reused. Nothing is
//! persisted: dropping the store loses every task.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::api::TaskApi;
use crate::error::{ClientError, StoreError};
use crate::models::{DateKey, NewTask, Task, TaskPatch, TimeBlock};

/// Tasks the server starts with when sample seeding is enabled, four per block.
const SAMPLE_DAY: [(&str, TimeBlock, bool); 12] = [
    ("Morning meditation and exercise", TimeBlock::Morning, true),
    ("Review daily goals and priorities", TimeBlock::Morning, false),
    ("Deep work session - Project A", TimeBlock::Morning, true),
    ("Healthy breakfast and meal prep", TimeBlock::Morning, false),
    ("Team standup meeting", TimeBlock::Afternoon, false),
    ("Client presentation preparation", TimeBlock::Afternoon, true),
    ("Email and communication block", TimeBlock::Afternoon, false),
    ("Skill development - Online course", TimeBlock::Afternoon, false),
    ("Family dinner and quality time", TimeBlock::Evening, true),
    ("Evening walk or light exercise", TimeBlock::Evening, false),
    ("Reading and personal development", TimeBlock::Evening, false),
    ("Plan tomorrow's schedule", TimeBlock::Evening, false),
];

/// The authoritative task collection.
#[derive(Debug)]
pub struct TaskStore {
    tasks: HashMap<u64, Task>,
    order: Vec<u64>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store whose first task gets id 1.
    pub fn new() -> Self {
        TaskStore {
            tasks: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Creates a store pre-filled with a sample day of twelve tasks scheduled
    /// on `today` (ids 1 to 12).
    pub fn with_sample_day(today: NaiveDate) -> Self {
        let mut store = Self::new();
        for (title, block, is_priority) in SAMPLE_DAY {
            let fields = NewTask::titled(title)
                .in_block(block)
                .priority(is_priority)
                .on_date(today);
            // Titles above are non-empty, so creation cannot fail.
            let _ = store.create(fields);
        }
        store
    }

    /// All tasks in creation order.
    pub fn list(&self) -> Vec<Task> {
        self.order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Creates a task, assigning its id and creation time.
    ///
    /// Missing optional fields default to: morning, not priority, not
    /// completed, scheduled today. An empty date counts as missing. The title is stored trimmed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] if the title is missing or blank.
    pub fn create(&mut self, fields: NewTask) -> Result<Task, StoreError> {
        let title = match fields.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(StoreError::Validation("Title is required".into())),
        };

        let id = self.next_id;
        self.next_id += 1;

        let task = Task {
            id,
            title,
            completed: fields.completed.unwrap_or(false),
            time_block: fields.time_block.unwrap_or_default(),
            is_priority: fields.is_priority.unwrap_or(false),
            created_at: Utc::now(),
            scheduled_date: fields
                .scheduled_date
                .filter(|key| !key.as_str().is_empty())
                .unwrap_or_else(|| DateKey::from_date(Local::now().date_naive())),
        };

        self.tasks.insert(id, task.clone());
        self.order.push(id);
        tracing::info!(id, title = %task.title, date = %task.scheduled_date, "task added");
        Ok(task)
    }

    /// Overwrites the fields present in `patch`; the title is trimmed.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no task has this id. The store is left
    /// untouched.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(block) = patch.time_block {
            task.time_block = block;
        }
        if let Some(is_priority) = patch.is_priority {
            task.is_priority = is_priority;
        }

        tracing::info!(id, title = %task.title, completed = task.completed, "task updated");
        Ok(task.clone())
    }

    /// Removes a task and returns it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no task has this id.
    pub fn delete(&mut self, id: u64) -> Result<Task, StoreError> {
        let task = self.tasks.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.order.retain(|existing| *existing != id);
        tracing::info!(id, "task deleted");
        Ok(task)
    }
}

/// In-process access to a shared store, used by tests and by callers that
/// embed the store instead of talking HTTP.
#[async_trait]
impl TaskApi for RwLock<TaskStore> {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        Ok(self.read().await.list())
    }

    async fn create(&self, fields: &NewTask) -> Result<Task, ClientError> {
        Ok(self.write().await.create(fields.clone())?)
    }

    async fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError> {
        Ok(self.write().await.update(id, patch.clone())?)
    }

    async fn delete(&self, id: u64) -> Result<Task, ClientError> {
        Ok(self.write().await.delete(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut store = TaskStore::new();
        let a = store.create(NewTask::titled("First")).unwrap();
        let b = store.create(NewTask::titled("Second")).unwrap();
        store.delete(b.id).unwrap();
        let c = store.create(NewTask::titled("Third")).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);
    }

    #[test]
    fn create_applies_defaults_and_trims() {
        let mut store = TaskStore::new();
        let task = store.create(NewTask::titled("  Stretch  ")).unwrap();

        assert_eq!(task.title, "Stretch");
        assert!(!task.completed);
        assert!(!task.is_priority);
        assert_eq!(task.time_block, TimeBlock::Morning);
        assert_eq!(task.scheduled_date, DateKey::today());
    }

    #[test]
    fn empty_scheduled_date_defaults_to_today() {
        let mut store = TaskStore::new();
        let task = store.create(NewTask::titled("Water plants").on_date("")).unwrap();
        assert_eq!(task.scheduled_date, DateKey::today());
    }

    #[test]
    fn create_rejects_missing_or_blank_title() {
        let mut store = TaskStore::new();
        assert!(matches!(store.create(NewTask::default()), Err(StoreError::Validation(_))));
        assert!(matches!(store.create(NewTask::titled("   ")), Err(StoreError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn list_keeps_insertion_order_after_delete() {
        let mut store = TaskStore::new();
        for title in ["one", "two", "three", "four"] {
            store.create(NewTask::titled(title)).unwrap();
        }
        store.delete(2).unwrap();

        let titles: Vec<String> = store.list().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["one", "three", "four"]);
    }

    #[test]
    fn update_only_touches_provided_fields() {
        let mut store = TaskStore::new();
        let created = store
            .create(NewTask::titled("Walk").in_block(TimeBlock::Evening).priority(true))
            .unwrap();

        let updated = store.update(created.id, TaskPatch::title("  Long walk ")).unwrap();

        assert_eq!(updated.title, "Long walk");
        assert_eq!(updated.time_block, TimeBlock::Evening);
        assert!(updated.is_priority);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.scheduled_date, created.scheduled_date);
        assert_eq!(store.get(created.id), Some(&updated));
    }

    #[test]
    fn sample_day_has_four_tasks_per_block() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let store = TaskStore::with_sample_day(today);
        let tasks = store.list();

        assert_eq!(tasks.len(), 12);
        for block in TimeBlock::ALL {
            assert_eq!(tasks.iter().filter(|t| t.time_block == block).count(), 4);
        }
        assert!(tasks.iter().all(|t| t.scheduled_date == DateKey::from_date(today)));
        assert_eq!(tasks.last().map(|t| t.id), Some(12));
    }
}
