//! Client-side planner state and the reducer that keeps it in sync with the
//! store.
//!
//! The local task list is only ever changed by feeding it a
//! [`ServerResponse`]: the canonical object the store returned for a call.

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::models::{Task, TimeBlock};
use crate::query::{self, BlockStats};

/// How long a success message stays visible.
pub const SUCCESS_TTL: Duration = Duration::from_secs(2);
/// How long a warning or error message stays visible.
pub const ERROR_TTL: Duration = Duration::from_secs(3);

/// A store reply worth merging into the local cache.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerResponse {
    Listed(Vec<Task>),
    Created(Task),
    Updated(Task),
    Deleted(Task),
}

/// Applies one store reply to the cached task list.
///
/// Created tasks are appended, updated tasks replace the entry with the same
/// id in place, deleted tasks are dropped, and a full listing replaces
/// everything.
pub fn reduce(mut tasks: Vec<Task>, response: ServerResponse) -> Vec<Task> {
    match response {
        ServerResponse::Listed(all) => all,
        ServerResponse::Created(task) => {
            tasks.push(task);
            tasks
        }
        ServerResponse::Updated(task) => {
            if let Some(slot) = tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = task;
            }
            tasks
        }
        ServerResponse::Deleted(task) => {
            tasks.retain(|t| t.id != task.id);
            tasks
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
    pub expires_at: Instant,
}

impl Feedback {
    pub fn new(kind: FeedbackKind, message: impl Into<String>, now: Instant) -> Self {
        let ttl = match kind {
            FeedbackKind::Success => SUCCESS_TTL,
            FeedbackKind::Warning | FeedbackKind::Error => ERROR_TTL,
        };
        Feedback {
            message: message.into(),
            kind,
            expires_at: now + ttl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
}

/// Everything the planner UI shows, independent of how it is drawn.
#[derive(Debug, Clone)]
pub struct PlannerState {
    pub tasks: Vec<Task>,
    pub selected_date: NaiveDate,
    pub selected_block: TimeBlock,
    /// Month shown by the month view; moves independently of the selection.
    pub calendar_month: NaiveDate,
    pub calendar_view: CalendarView,
    pub feedback: Option<Feedback>,
    /// Set while a routine is being created for the selected date.
    pub generating_routine: bool,
    /// Set while a new task is being submitted.
    pub loading: bool,
}

impl PlannerState {
    pub fn new(today: NaiveDate) -> Self {
        PlannerState {
            tasks: Vec::new(),
            selected_date: today,
            selected_block: TimeBlock::Morning,
            calendar_month: today,
            calendar_view: CalendarView::Month,
            feedback: None,
            generating_routine: false,
            loading: false,
        }
    }

    pub fn apply(&mut self, response: ServerResponse) {
        let tasks = std::mem::take(&mut self.tasks);
        self.tasks = reduce(tasks, response);
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks of the selected block on the selected date.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        query::tasks_for_block_and_date(&self.tasks, &self.selected_block, self.selected_date)
    }

    pub fn block_stats(&self, block: &TimeBlock) -> BlockStats {
        query::stats(&self.tasks, block, self.selected_date)
    }

    pub fn tasks_on(&self, date: NaiveDate) -> Vec<&Task> {
        query::tasks_for_date(&self.tasks, date)
    }

    pub fn notify(&mut self, kind: FeedbackKind, message: impl Into<String>) {
        self.feedback = Some(Feedback::new(kind, message, Instant::now()));
    }

    /// Drops the feedback message once its display time is over.
    pub fn clear_expired_feedback(&mut self, now: Instant) {
        if self.feedback.as_ref().is_some_and(|f| now >= f.expires_at) {
            self.feedback = None;
        }
    }
}
