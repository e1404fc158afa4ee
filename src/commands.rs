use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::api::TaskApi;
use crate::calendar::{self, WEEKDAY_LABELS};
use crate::models::{NewTask, Task, TaskPatch, TimeBlock};
use crate::query::{self, validate_new_title};
use crate::routine::{ensure_routine, RoutineDecision, RoutineOutcome};

/// Tasks shown per day in the week view before collapsing into "+N more".
const WEEK_PREVIEW: usize = 3;

/// Parses a `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid date '{}': {}. Use YYYY-MM-DD.", d, e)),
        None => Ok(Local::now().date_naive()),
    }
}

async fn find_task<A: TaskApi + ?Sized>(api: &A, id: u64) -> Result<Task> {
    api.list()
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("Task {} not found.", id))
}

/// Builds the table of one block's tasks.
pub fn block_table(tasks: &[&Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status = if t.completed { "Done" } else { "Pending" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(if t.is_priority { "★" } else { "" }).fg(Color::Red),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

/// Lists the tasks of a day, one table per time block with its statistics.
pub async fn cmd_list<A: TaskApi + ?Sized>(api: &A, date: NaiveDate, block: Option<TimeBlock>) -> Result<()> {
    let tasks = api.list().await?;
    let blocks = match block {
        Some(b) => vec![b],
        None => TimeBlock::ALL.to_vec(),
    };

    println!("{}", date.format("%A, %B %-d, %Y"));
    for block in blocks {
        let block_tasks = query::tasks_for_block_and_date(&tasks, &block, date);
        let stats = query::stats(&tasks, &block, date);
        println!();
        println!("{} - {}/{} done", block.title(), stats.completed, stats.total);
        if block_tasks.is_empty() {
            println!("No tasks found.");
        } else {
            println!("{}", block_table(&block_tasks));
        }
    }
    Ok(())
}

/// Validates and adds a task.
pub async fn cmd_add<A: TaskApi + ?Sized>(
    api: &A,
    title: &str,
    block: TimeBlock,
    date: NaiveDate,
    priority: bool,
) -> Result<Task> {
    let tasks = api.list().await?;
    let title = validate_new_title(&tasks, &block, title)?;
    let fields = NewTask::titled(title)
        .in_block(block)
        .on_date(date)
        .priority(priority);
    let task = api.create(&fields).await?;
    println!("Task added (id = {})", task.id);
    Ok(task)
}

/// Marks a task as done, or as pending again with `done = false`.
pub async fn cmd_complete<A: TaskApi + ?Sized>(api: &A, id: u64, done: bool) -> Result<Task> {
    let task = api.update(id, &TaskPatch::completed(done)).await.map_err(|e| not_found(e, id))?;
    if done {
        println!("Task {} marked as complete.", id);
    } else {
        println!("Task {} marked as pending.", id);
    }
    Ok(task)
}

/// Flips a task's priority flag.
pub async fn cmd_priority<A: TaskApi + ?Sized>(api: &A, id: u64) -> Result<Task> {
    let current = find_task(api, id).await?;
    let task = api
        .update(id, &TaskPatch::priority(!current.is_priority))
        .await
        .map_err(|e| not_found(e, id))?;
    println!(
        "Task {} {} priority.",
        id,
        if task.is_priority { "marked as" } else { "no longer" }
    );
    Ok(task)
}

pub async fn cmd_rename<A: TaskApi + ?Sized>(api: &A, id: u64, title: &str) -> Result<Task> {
    if title.trim().is_empty() {
        bail!("Title must not be empty.");
    }
    let task = api.update(id, &TaskPatch::title(title)).await.map_err(|e| not_found(e, id))?;
    println!("Task {} updated.", id);
    Ok(task)
}

pub async fn cmd_move<A: TaskApi + ?Sized>(api: &A, id: u64, block: TimeBlock) -> Result<Task> {
    let task = api
        .update(id, &TaskPatch::time_block(block))
        .await
        .map_err(|e| not_found(e, id))?;
    println!("Task {} moved to {}.", id, task.time_block);
    Ok(task)
}

pub async fn cmd_remove<A: TaskApi + ?Sized>(api: &A, id: u64) -> Result<Task> {
    let task = api.delete(id).await.map_err(|e| not_found(e, id))?;
    println!("Task {} removed.", id);
    Ok(task)
}

/// Seeds the routine of `date` if it is a future date without one.
pub async fn cmd_routine<A: TaskApi + ?Sized>(api: &A, date: NaiveDate) -> Result<RoutineOutcome> {
    let tasks = api.list().await?;
    let today = Local::now().date_naive();
    let outcome = ensure_routine(api, date, today, &tasks, |_| {}).await;
    match &outcome {
        RoutineOutcome::Skipped(RoutineDecision::AlreadySeeded) => {
            println!("{} already has tasks; routine not generated.", date)
        }
        RoutineOutcome::Skipped(_) => println!("Routines are only generated for future dates."),
        RoutineOutcome::Generated { created } => println!("Generated daily routine for {} ({} tasks).", date, created),
        RoutineOutcome::Interrupted { created, error } => {
            eprintln!("Routine for {} stopped after {} tasks: {}", date, created, error)
        }
    }
    Ok(outcome)
}

/// Renders the month containing `month` as text, with the number of tasks on
/// each day and markers for today (`*`) and the selected day (`[ ]`).
pub fn render_month(tasks: &[Task], month: NaiveDate, selected: NaiveDate) -> String {
    let mut out = format!("{:^56}\n", calendar::month_label(month));
    for label in WEEKDAY_LABELS {
        out.push_str(&format!("{:^8}", label));
    }
    out.push('\n');

    for (i, cell) in calendar::month_grid(month).iter().enumerate() {
        let text = match cell {
            None => String::new(),
            Some(day) => {
                let count = query::tasks_for_date(tasks, *day).len();
                let mut label = day.format("%-d").to_string();
                if calendar::is_today(*day) {
                    label.push('*');
                }
                if count > 0 {
                    label.push_str(&format!("({})", count));
                }
                if calendar::is_selected_date(*day, selected) {
                    label = format!("[{}]", label);
                }
                label
            }
        };
        out.push_str(&format!("{:^8}", text));
        if i % 7 == 6 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Renders the week containing `date`, previewing the first tasks of each day.
pub fn render_week(tasks: &[Task], date: NaiveDate) -> String {
    let mut out = String::new();
    for (label, day) in WEEKDAY_LABELS.iter().zip(calendar::week_dates(date)) {
        let marker = if calendar::is_today(day) { " (today)" } else { "" };
        out.push_str(&format!("{} {}{}\n", label, day.format("%b %-d"), marker));

        let day_tasks = query::tasks_for_date(tasks, day);
        for t in day_tasks.iter().take(WEEK_PREVIEW) {
            let dot = if t.is_priority { "●" } else { "○" };
            out.push_str(&format!("  {} {}\n", dot, t.title));
        }
        if day_tasks.len() > WEEK_PREVIEW {
            out.push_str(&format!("  +{} more\n", day_tasks.len() - WEEK_PREVIEW));
        }
    }
    out
}

pub async fn cmd_calendar<A: TaskApi + ?Sized>(api: &A, date: NaiveDate, week: bool) -> Result<()> {
    let tasks = api.list().await?;
    if week {
        print!("{}", render_week(&tasks, date));
    } else {
        print!("{}", render_month(&tasks, date, date));
    }
    println!("{} tasks scheduled on {}", query::tasks_for_date(&tasks, date).len(), date);
    Ok(())
}

fn not_found(error: crate::error::ClientError, id: u64) -> anyhow::Error {
    if error.is_not_found() {
        anyhow!("Task {} not found.", id)
    } else {
        error.into()
    }
}
