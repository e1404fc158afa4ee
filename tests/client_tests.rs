//! Wire format checks for the HTTP client.

use dayplan::api::TaskApi;
use dayplan::client::HttpTaskApi;
use dayplan::error::ClientError;
use dayplan::models::{NewTask, TaskPatch, TimeBlock};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "completed": false,
        "timeBlock": "afternoon",
        "isPriority": true,
        "createdAt": "2026-10-18T09:30:00Z",
        "scheduledDate": "2026-10-19"
    })
}

fn api_for(server: &MockServer) -> HttpTaskApi {
    HttpTaskApi::new(format!("{}/todos/", server.uri()))
}

#[tokio::test]
async fn list_decodes_camel_case_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(4, "Lunch")])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = api_for(&server).list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Lunch");
    assert_eq!(tasks[0].time_block, TimeBlock::Afternoon);
    assert!(tasks[0].is_priority);
    assert_eq!(tasks[0].scheduled_date.as_str(), "2026-10-19");
}

#[tokio::test]
async fn create_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({
            "title": "Lunch",
            "timeBlock": "afternoon",
            "isPriority": true,
            "scheduledDate": "2026-10-19"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json(7, "Lunch")))
        .expect(1)
        .mount(&server)
        .await;

    let fields = NewTask::titled("Lunch")
        .in_block(TimeBlock::Afternoon)
        .on_date("2026-10-19")
        .priority(true);
    let task = api_for(&server).create(&fields).await.unwrap();
    assert_eq!(task.id, 7);
}

#[tokio::test]
async fn update_puts_the_patch_to_the_item_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/todos/7"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(7, "Lunch")))
        .expect(1)
        .mount(&server)
        .await;

    let task = api_for(&server).update(7, &TaskPatch::completed(true)).await.unwrap();
    assert_eq!(task.id, 7);
}

#[tokio::test]
async fn error_body_becomes_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todos/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Task not found"})))
        .mount(&server)
        .await;

    let err = api_for(&server).delete(9).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Task not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_without_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server).list().await.unwrap_err();
    assert!(!err.is_not_found());
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let api = HttpTaskApi::new("http://127.0.0.1:1/todos");
    let err = api.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
