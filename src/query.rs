//! Read-only views over a flat task list.
//!
//! Nothing here mutates or re-sorts: results keep the store's insertion
//! order.

use chrono::NaiveDate;

use crate::calendar::date_key;
use crate::error::TitleError;
use crate::models::{Task, TimeBlock};

pub const MIN_TITLE_CHARS: usize = 2;
pub const MAX_TITLE_CHARS: usize = 200;

/// Completion counts for one time block of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockStats {
    pub completed: usize,
    pub total: usize,
}

/// Tasks scheduled on `date`.
pub fn tasks_for_date(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    let key = date_key(date);
    tasks.iter().filter(|t| t.scheduled_date == key).collect()
}

/// Tasks scheduled on `date` in `block`.
pub fn tasks_for_block_and_date<'a>(tasks: &'a [Task], block: &TimeBlock, date: NaiveDate) -> Vec<&'a Task> {
    let key = date_key(date);
    tasks
        .iter()
        .filter(|t| t.time_block == *block && t.scheduled_date == key)
        .collect()
}

pub fn stats(tasks: &[Task], block: &TimeBlock, date: NaiveDate) -> BlockStats {
    let block_tasks = tasks_for_block_and_date(tasks, block, date);
    BlockStats {
        completed: block_tasks.iter().filter(|t| t.completed).count(),
        total: block_tasks.len(),
    }
}

/// Whether `title` already exists in `block`, ignoring case and surrounding
/// whitespace. Tasks on every date count, not only the selected one.
pub fn is_duplicate(tasks: &[Task], block: &TimeBlock, title: &str) -> bool {
    let candidate = title.trim().to_lowercase();
    tasks
        .iter()
        .any(|t| t.time_block == *block && t.title.trim().to_lowercase() == candidate)
}

/// Checks a title typed for a new task and returns it trimmed.
///
/// # Errors
///
/// A [`TitleError`] naming the first rule the title breaks.
pub fn validate_new_title(tasks: &[Task], block: &TimeBlock, raw: &str) -> Result<String, TitleError> {
    let title = raw.trim();
    let chars = title.chars().count();
    if chars == 0 {
        return Err(TitleError::Empty);
    }
    if chars < MIN_TITLE_CHARS {
        return Err(TitleError::TooShort);
    }
    if chars > MAX_TITLE_CHARS {
        return Err(TitleError::TooLong);
    }
    if is_duplicate(tasks, block, title) {
        return Err(TitleError::Duplicate);
    }
    Ok(title.to_string())
}
