use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use dayplan::api::TaskApi;
use dayplan::error::ClientError;
use dayplan::models::{NewTask, Task, TaskPatch, TimeBlock};
use dayplan::planner::Planner;
use dayplan::routine::{ensure_routine, RoutineOutcome, ROUTINE_LEN};

/// Accepts creates until `fail_on` requests have been seen, then answers 500.
struct FlakyApi {
    fail_on: usize,
    calls: AtomicUsize,
    received: Mutex<Vec<NewTask>>,
}

impl FlakyApi {
    fn failing_on(fail_on: usize) -> Self {
        FlakyApi {
            fail_on,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TaskApi for FlakyApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        Ok(Vec::new())
    }

    async fn create(&self, fields: &NewTask) -> Result<Task, ClientError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.received.lock().unwrap().push(fields.clone());
        if n == self.fail_on {
            return Err(ClientError::Status {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(Task {
            id: n as u64,
            title: fields.title.clone().unwrap_or_default(),
            completed: false,
            time_block: fields.time_block.clone().unwrap_or_default(),
            is_priority: fields.is_priority.unwrap_or(false),
            created_at: Utc::now(),
            scheduled_date: fields.scheduled_date.clone().unwrap_or_else(|| "2000-01-01".into()),
        })
    }

    async fn update(&self, _id: u64, _patch: &TaskPatch) -> Result<Task, ClientError> {
        unreachable!("routine generation never updates")
    }

    async fn delete(&self, _id: u64) -> Result<Task, ClientError> {
        unreachable!("routine generation never deletes")
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn failure_stops_the_sequence_and_keeps_earlier_tasks() {
    let api = FlakyApi::failing_on(5);
    let today = ymd(2026, 10, 18);
    let mut seen = Vec::new();

    let outcome = ensure_routine(&api, today + Duration::days(1), today, &[], |t| seen.push(t)).await;

    match outcome {
        RoutineOutcome::Interrupted { created, error } => {
            assert_eq!(created, 4);
            assert!(!error.is_not_found());
        }
        other => panic!("expected an interrupted routine, got {other:?}"),
    }
    assert_eq!(seen.len(), 4);
    // Nothing is attempted after the failing request.
    assert_eq!(api.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn requests_are_sent_in_routine_order() {
    let api = FlakyApi::failing_on(usize::MAX);
    let today = ymd(2026, 10, 18);
    // 2026-10-19 is a Monday.
    let date = ymd(2026, 10, 19);

    let outcome = ensure_routine(&api, date, today, &[], |_| {}).await;
    assert_eq!(outcome.created(), ROUTINE_LEN);

    let received = api.received.lock().unwrap();
    assert_eq!(received.len(), ROUTINE_LEN);
    assert_eq!(received[0].time_block, Some(TimeBlock::Morning));
    assert_eq!(received[0].is_priority, Some(true));
    assert_eq!(received[ROUTINE_LEN - 1].time_block, Some(TimeBlock::Evening));
    assert!(received
        .iter()
        .all(|r| r.scheduled_date.as_ref().map(|d| d.as_str()) == Some("2026-10-19")));
}

#[tokio::test]
async fn planner_keeps_partial_routine_and_clears_indicator() {
    let today = ymd(2026, 10, 18);
    let mut planner = Planner::new(FlakyApi::failing_on(3), today);

    let outcome = planner.select_date_on(today + Duration::days(3), today).await;

    assert_eq!(outcome.created(), 2);
    assert_eq!(planner.state.tasks.len(), 2);
    assert!(!planner.state.generating_routine);
    assert_eq!(planner.state.selected_date, ymd(2026, 10, 21));
}
