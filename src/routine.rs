//! Daily routine seeding for future dates.
//!
//! A routine is thirteen tasks: one day-of-week "main activity" flagged as a
//! priority in the morning, then four template tasks for each time block.
//! [`generate_routine`] builds the requests; [`ensure_routine`] decides
//! whether a date needs them and submits them one by one.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::api::TaskApi;
use crate::calendar::date_key;
use crate::error::ClientError;
use crate::models::{NewTask, Task, TimeBlock};

/// Main activity per weekday, indexed 0 = Sunday .. 6 = Saturday.
pub const MAIN_ACTIVITIES: [&str; 7] = [
    "Sunday: Family time and relaxation",
    "Monday: Weekly planning and goal setting",
    "Tuesday: Project deep work and focus",
    "Wednesday: Mid-week review and adjustments",
    "Thursday: Creative work and innovation",
    "Friday: Weekly wrap-up and celebration",
    "Saturday: Personal projects and hobbies",
];

const MORNING_ROUTINE: [(&str, bool); 4] = [
    ("Morning meditation and mindfulness", true),
    ("Hydration and morning stretch", false),
    ("Review daily goals and priorities", true),
    ("Healthy breakfast preparation", false),
];

const AFTERNOON_ROUTINE: [(&str, bool); 4] = [
    ("Focused deep work session", true),
    ("Team communication and updates", false),
    ("Skill development or learning", false),
    ("Email and message management", false),
];

const EVENING_ROUTINE: [(&str, bool); 4] = [
    ("Evening reflection and gratitude", true),
    ("Light exercise or walk", false),
    ("Reading or personal development", false),
    ("Plan tomorrow's schedule", false),
];

/// Number of requests in a full routine.
pub const ROUTINE_LEN: usize = 1 + MORNING_ROUTINE.len() + AFTERNOON_ROUTINE.len() + EVENING_ROUTINE.len();

/// A date that already has more than this many tasks is treated as seeded.
const SEEDED_THRESHOLD: usize = 2;

/// Template `(title, is_priority)` pairs of a block, in declared order.
pub fn routine_template(block: &TimeBlock) -> &'static [(&'static str, bool)] {
    match block {
        TimeBlock::Morning => &MORNING_ROUTINE,
        TimeBlock::Afternoon => &AFTERNOON_ROUTINE,
        TimeBlock::Evening => &EVENING_ROUTINE,
        TimeBlock::Other(_) => &[],
    }
}

pub fn main_activity(date: NaiveDate) -> &'static str {
    MAIN_ACTIVITIES[date.weekday().num_days_from_sunday() as usize]
}

/// Builds the creation requests of `date`'s routine, stamped with `now`.
pub fn generate_routine(date: NaiveDate, now: DateTime<Utc>) -> Vec<NewTask> {
    let key = date_key(date);
    let request = |title: &str, block: TimeBlock, is_priority: bool| NewTask {
        title: Some(title.to_string()),
        time_block: Some(block),
        is_priority: Some(is_priority),
        completed: Some(false),
        scheduled_date: Some(key.clone()),
        created_at: Some(now),
    };

    let mut requests = Vec::with_capacity(ROUTINE_LEN);
    requests.push(request(main_activity(date), TimeBlock::Morning, true));
    for block in TimeBlock::ALL {
        for (title, is_priority) in routine_template(&block) {
            requests.push(request(title, block.clone(), *is_priority));
        }
    }
    requests
}

/// What [`ensure_routine`] will do for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineDecision {
    /// The date already holds more than two tasks.
    AlreadySeeded,
    /// The date is today or in the past.
    NotFuture,
    Generate,
}

/// Decides whether `date` should receive a routine.
///
/// The seeded check only counts tasks; a day with one or two hand-made tasks
/// still gets a routine.
pub fn routine_decision(date: NaiveDate, today: NaiveDate, existing: &[Task]) -> RoutineDecision {
    let key = date_key(date);
    let on_date = existing.iter().filter(|t| t.scheduled_date == key).count();
    if on_date > SEEDED_THRESHOLD {
        RoutineDecision::AlreadySeeded
    } else if date <= today {
        RoutineDecision::NotFuture
    } else {
        RoutineDecision::Generate
    }
}

/// Result of an [`ensure_routine`] run.
#[derive(Debug)]
pub enum RoutineOutcome {
    Skipped(RoutineDecision),
    /// Every request was created.
    Generated { created: usize },
    /// A request failed; the ones before it stay created.
    Interrupted { created: usize, error: ClientError },
}

impl RoutineOutcome {
    pub fn created(&self) -> usize {
        match self {
            RoutineOutcome::Skipped(_) => 0,
            RoutineOutcome::Generated { created } | RoutineOutcome::Interrupted { created, .. } => *created,
        }
    }
}

/// Seeds `date` with its routine if it is a future date without one.
///
/// Requests are sent one at a time, in order, each awaited before the next.
/// Every created task is handed to `on_created` as soon as it comes back.
/// The first failure stops the sequence; nothing is retried.
pub async fn ensure_routine<A, F>(
    api: &A,
    date: NaiveDate,
    today: NaiveDate,
    existing: &[Task],
    mut on_created: F,
) -> RoutineOutcome
where
    A: TaskApi + ?Sized,
    F: FnMut(Task),
{
    let decision = routine_decision(date, today, existing);
    if decision != RoutineDecision::Generate {
        tracing::debug!(date = %date_key(date), ?decision, "routine not generated");
        return RoutineOutcome::Skipped(decision);
    }

    let mut created = 0;
    for request in generate_routine(date, Utc::now()) {
        match api.create(&request).await {
            Ok(task) => {
                created += 1;
                on_created(task);
            }
            Err(error) => {
                tracing::warn!(date = %date_key(date), created, error = %error, "routine generation stopped");
                return RoutineOutcome::Interrupted { created, error };
            }
        }
    }

    tracing::info!(date = %date_key(date), created, "generated daily routine");
    RoutineOutcome::Generated { created }
}
