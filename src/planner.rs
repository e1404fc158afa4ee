//! Planner orchestration: turns user intents into store calls and merges the
//! replies into [`PlannerState`].
//!
//! No change is applied locally before the store confirms it. Failures are
//! logged and surfaced as feedback; the local state stays as it was.

use chrono::{Local, NaiveDate, Utc};

use crate::api::TaskApi;
use crate::calendar::date_key;
use crate::error::{ClientError, TitleError};
use crate::models::{NewTask, Task, TaskPatch, TimeBlock};
use crate::query::validate_new_title;
use crate::routine::{ensure_routine, RoutineOutcome};
use crate::state::{FeedbackKind, PlannerState, ServerResponse};

pub struct Planner<A> {
    api: A,
    pub state: PlannerState,
}

impl<A: TaskApi> Planner<A> {
    pub fn new(api: A, today: NaiveDate) -> Self {
        Planner {
            api,
            state: PlannerState::new(today),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the local cache with the store's full list.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "fetched tasks");
                self.state.apply(ServerResponse::Listed(tasks));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching tasks");
                Err(e)
            }
        }
    }

    pub fn select_block(&mut self, block: TimeBlock) {
        self.state.selected_block = block;
    }

    /// Validates `raw_title` and creates it in the selected block and date.
    ///
    /// Returns the created task, or `None` if validation or the request
    /// failed (the reason is left in the feedback message).
    pub async fn add_task(&mut self, raw_title: &str) -> Option<Task> {
        let title = match validate_new_title(&self.state.tasks, &self.state.selected_block, raw_title) {
            Ok(title) => title,
            Err(e) => {
                let kind = match e {
                    TitleError::Duplicate => FeedbackKind::Warning,
                    _ => FeedbackKind::Error,
                };
                self.state.notify(kind, e.to_string());
                return None;
            }
        };

        let fields = NewTask {
            title: Some(title),
            time_block: Some(self.state.selected_block.clone()),
            is_priority: Some(false),
            completed: Some(false),
            scheduled_date: Some(date_key(self.state.selected_date)),
            created_at: Some(Utc::now()),
        };

        self.state.loading = true;
        self.state.feedback = None;
        let result = self.api.create(&fields).await;
        self.state.loading = false;

        match result {
            Ok(task) => {
                self.state.apply(ServerResponse::Created(task.clone()));
                self.state.notify(FeedbackKind::Success, "Task added successfully!");
                Some(task)
            }
            Err(e) => {
                tracing::error!(error = %e, "error adding task");
                self.state.notify(FeedbackKind::Error, "Failed to add task. Please try again.");
                None
            }
        }
    }

    async fn patch(&mut self, id: u64, patch: TaskPatch) -> Option<Task> {
        match self.api.update(id, &patch).await {
            Ok(task) => {
                self.state.apply(ServerResponse::Updated(task.clone()));
                Some(task)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error updating task");
                self.state.notify(FeedbackKind::Error, "Failed to update task. Please try again.");
                None
            }
        }
    }

    pub async fn toggle_completed(&mut self, id: u64) -> Option<Task> {
        let completed = self.state.find(id)?.completed;
        self.patch(id, TaskPatch::completed(!completed)).await
    }

    pub async fn toggle_priority(&mut self, id: u64) -> Option<Task> {
        let is_priority = self.state.find(id)?.is_priority;
        self.patch(id, TaskPatch::priority(!is_priority)).await
    }

    /// Renames a task. A blank title is ignored without a request.
    pub async fn rename(&mut self, id: u64, title: &str) -> Option<Task> {
        if title.trim().is_empty() {
            return None;
        }
        self.patch(id, TaskPatch::title(title)).await
    }

    pub async fn delete(&mut self, id: u64) -> Option<Task> {
        match self.api.delete(id).await {
            Ok(task) => {
                self.state.apply(ServerResponse::Deleted(task.clone()));
                Some(task)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error deleting task");
                self.state.notify(FeedbackKind::Error, "Failed to delete task. Please try again.");
                None
            }
        }
    }

    /// Selects `date`, seeding its routine first if it is a future date.
    pub async fn select_date(&mut self, date: NaiveDate) -> RoutineOutcome {
        self.select_date_on(date, Local::now().date_naive()).await
    }

    /// [`Planner::select_date`] with an explicit "today".
    pub async fn select_date_on(&mut self, date: NaiveDate, today: NaiveDate) -> RoutineOutcome {
        self.state.selected_date = date;
        self.state.calendar_month = date;

        let existing = self.state.tasks.clone();
        let api = &self.api;
        let state = &mut self.state;

        state.generating_routine = date > today;
        let outcome = ensure_routine(api, date, today, &existing, |task| {
            state.apply(ServerResponse::Created(task));
        })
        .await;
        state.generating_routine = false;
        outcome
    }
}
