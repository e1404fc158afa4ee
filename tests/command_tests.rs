use chrono::{Duration, Local, NaiveDate};
use dayplan::api::TaskApi;
use dayplan::commands::*;
use dayplan::models::{NewTask, TimeBlock};
use dayplan::routine::{RoutineDecision, RoutineOutcome, ROUTINE_LEN};
use dayplan::store::TaskStore;
use tokio::sync::RwLock;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> RwLock<TaskStore> {
    RwLock::new(TaskStore::new())
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date(Some("2026-04-15")).unwrap(), ymd(2026, 4, 15));
    assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
    assert!(parse_date(Some("15/04/2026")).is_err());
}

#[tokio::test]
async fn test_add_and_list() {
    let api = store();
    let date = ymd(2026, 10, 20);
    let task = cmd_add(&api, "  Write report ", TimeBlock::Afternoon, date, true).await.unwrap();

    assert_eq!(task.title, "Write report");
    assert_eq!(task.time_block, TimeBlock::Afternoon);
    assert!(task.is_priority);
    assert_eq!(task.scheduled_date.as_str(), "2026-10-20");

    cmd_list(&api, date, None).await.unwrap();
    cmd_list(&api, date, Some(TimeBlock::Evening)).await.unwrap();
}

#[tokio::test]
async fn test_add_rejects_invalid_titles() {
    let api = store();
    let date = ymd(2026, 10, 20);

    assert!(cmd_add(&api, "   ", TimeBlock::Morning, date, false).await.is_err());
    assert!(cmd_add(&api, "x", TimeBlock::Morning, date, false).await.is_err());
    assert!(cmd_add(&api, &"a".repeat(201), TimeBlock::Morning, date, false).await.is_err());

    cmd_add(&api, "Stretch", TimeBlock::Morning, date, false).await.unwrap();
    let dup = cmd_add(&api, "stretch", TimeBlock::Morning, date, false).await;
    assert!(dup.is_err());

    // Same title in another block is fine.
    cmd_add(&api, "Stretch", TimeBlock::Evening, date, false).await.unwrap();
    assert_eq!(api.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_complete_priority_rename_move_remove() {
    let api = store();
    let task = cmd_add(&api, "Plan week", TimeBlock::Morning, ymd(2026, 10, 20), false).await.unwrap();

    let done = cmd_complete(&api, task.id, true).await.unwrap();
    assert!(done.completed);
    let undone = cmd_complete(&api, task.id, false).await.unwrap();
    assert!(!undone.completed);

    let flagged = cmd_priority(&api, task.id).await.unwrap();
    assert!(flagged.is_priority);
    let unflagged = cmd_priority(&api, task.id).await.unwrap();
    assert!(!unflagged.is_priority);

    let renamed = cmd_rename(&api, task.id, "Plan the week").await.unwrap();
    assert_eq!(renamed.title, "Plan the week");
    assert!(cmd_rename(&api, task.id, "  ").await.is_err());

    let moved = cmd_move(&api, task.id, TimeBlock::Evening).await.unwrap();
    assert_eq!(moved.time_block, TimeBlock::Evening);

    cmd_remove(&api, task.id).await.unwrap();
    assert!(api.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_id_reports_not_found() {
    let api = store();
    let err = cmd_complete(&api, 42, true).await.unwrap_err();
    assert_eq!(err.to_string(), "Task 42 not found.");
    assert!(cmd_remove(&api, 42).await.is_err());
    assert!(cmd_priority(&api, 42).await.is_err());
}

#[tokio::test]
async fn test_routine_command() {
    let api = store();
    let today = Local::now().date_naive();

    let outcome = cmd_routine(&api, today + Duration::days(2)).await.unwrap();
    assert!(matches!(outcome, RoutineOutcome::Generated { created } if created == ROUTINE_LEN));

    let again = cmd_routine(&api, today + Duration::days(2)).await.unwrap();
    assert!(matches!(again, RoutineOutcome::Skipped(RoutineDecision::AlreadySeeded)));

    let past = cmd_routine(&api, today - Duration::days(1)).await.unwrap();
    assert!(matches!(past, RoutineOutcome::Skipped(RoutineDecision::NotFuture)));
    assert_eq!(api.list().await.unwrap().len(), ROUTINE_LEN);
}

#[tokio::test]
async fn test_month_render_counts_tasks() {
    let api = store();
    for title in ["One", "Two"] {
        api.create(&NewTask::titled(title).on_date(ymd(2026, 4, 15))).await.unwrap();
    }
    let tasks = api.list().await.unwrap();

    let out = render_month(&tasks, ymd(2026, 4, 1), ymd(2026, 4, 15));
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].contains("April 2026"));
    assert!(lines[1].contains("Sun") && lines[1].contains("Sat"));
    // Leading blanks for Sun-Tue, then 30 days: five rows of weeks.
    assert_eq!(lines.len(), 2 + 5);
    assert!(out.contains("[15(2)]"));
    assert!(lines[2].trim_start().starts_with('1'));
}

#[tokio::test]
async fn test_week_render_collapses_extra_tasks() {
    let api = store();
    let day = ymd(2026, 10, 21);
    for title in ["A1", "B2", "C3", "D4", "E5"] {
        api.create(&NewTask::titled(title).on_date(day).priority(title == "A1")).await.unwrap();
    }
    let tasks = api.list().await.unwrap();

    let out = render_week(&tasks, day);
    assert!(out.starts_with("Sun Oct 18"));
    assert!(out.contains("Sat Oct 24"));
    assert!(out.contains("  ● A1"));
    assert!(out.contains("  ○ C3"));
    assert!(!out.contains("D4"));
    assert!(out.contains("  +2 more"));

    cmd_calendar(&api, day, true).await.unwrap();
    cmd_calendar(&api, day, false).await.unwrap();
}
