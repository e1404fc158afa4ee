use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One of the three fixed parts of a day a task is assigned to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeBlock {
    #[default]
    Morning,
    Afternoon,
    Evening,
    /// Any other value a client stored. The API does not validate time blocks,
    /// so unknown values are carried through verbatim.
    #[serde(untagged)]
    Other(String),
}

impl TimeBlock {
    /// The three real blocks, in display order.
    pub const ALL: [TimeBlock; 3] = [TimeBlock::Morning, TimeBlock::Afternoon, TimeBlock::Evening];

    /// Wire name of the block (`morning`, `afternoon`, `evening`).
    pub fn as_str(&self) -> &str {
        match self {
            TimeBlock::Morning => "morning",
            TimeBlock::Afternoon => "afternoon",
            TimeBlock::Evening => "evening",
            TimeBlock::Other(s) => s,
        }
    }

    /// Heading shown above the block's task list.
    pub fn title(&self) -> &str {
        match self {
            TimeBlock::Morning => "Morning Focus (5:00 AM - 11:00 AM)",
            TimeBlock::Afternoon => "Afternoon Productivity (12:00 PM - 5:00 PM)",
            TimeBlock::Evening => "Evening Wind-down (6:00 PM - 10:00 PM)",
            TimeBlock::Other(s) => s,
        }
    }

    pub fn quote(&self) -> &'static str {
        match self {
            TimeBlock::Morning => "The early morning has gold in its mouth. - Benjamin Franklin",
            TimeBlock::Afternoon => "Focus on being productive instead of busy. - Tim Ferriss",
            TimeBlock::Evening => "The evening is the time for reflection and renewal. - Unknown",
            TimeBlock::Other(_) => "",
        }
    }

    /// The block after this one, wrapping from evening back to morning.
    pub fn next(&self) -> TimeBlock {
        match self {
            TimeBlock::Morning => TimeBlock::Afternoon,
            TimeBlock::Afternoon => TimeBlock::Evening,
            TimeBlock::Evening | TimeBlock::Other(_) => TimeBlock::Morning,
        }
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBlock {
    type Err = String;

    /// Parses one of the three real blocks; used for user input, where
    /// free-form values are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(TimeBlock::Morning),
            "afternoon" => Ok(TimeBlock::Afternoon),
            "evening" => Ok(TimeBlock::Evening),
            other => Err(format!(
                "Unknown time block '{}'. Supported: morning, afternoon, evening.",
                other
            )),
        }
    }
}

/// Calendar-day identifier (`YYYY-MM-DD`) joining tasks to calendar cells.
///
/// Two dates are the same day iff their keys are equal, whatever the time of
/// day. Keys received from clients are kept as-is even if they do not parse.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date.format("%Y-%m-%d").to_string())
    }

    /// Key of the current local calendar day.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key back into a date, if it is a well-formed key.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<&str> for DateKey {
    fn from(s: &str) -> Self {
        DateKey(s.to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single task on the daily planner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// Trimmed task description.
    pub title: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Part of the day the task belongs to.
    #[serde(default)]
    pub time_block: TimeBlock,
    /// Whether the task is flagged as a priority.
    #[serde(default)]
    pub is_priority: bool,
    /// Creation instant, set once by the store.
    pub created_at: DateTime<Utc>,
    /// Day the task is scheduled on.
    pub scheduled_date: DateKey,
}

/// Fields accepted when creating a task. Everything but the title is optional
/// and defaulted by the store.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_block: Option<TimeBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_priority: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateKey>,
    /// Client-side creation stamp. The store ignores it and assigns its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn in_block(mut self, block: TimeBlock) -> Self {
        self.time_block = Some(block);
        self
    }

    pub fn on_date(mut self, date: impl Into<DateKey>) -> Self {
        self.scheduled_date = Some(date.into());
        self
    }

    pub fn priority(mut self, is_priority: bool) -> Self {
        self.is_priority = Some(is_priority);
        self
    }
}

/// Partial update of a task: only the fields that are set are overwritten.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_block: Option<TimeBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_priority: Option<bool>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        TaskPatch {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        TaskPatch {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn priority(is_priority: bool) -> Self {
        TaskPatch {
            is_priority: Some(is_priority),
            ..Default::default()
        }
    }

    pub fn time_block(block: TimeBlock) -> Self {
        TaskPatch {
            time_block: Some(block),
            ..Default::default()
        }
    }
}
