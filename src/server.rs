//! HTTP API over the in-memory [`TaskStore`].
//!
//! | Method | Path          | Success          | Errors |
//! |--------|---------------|------------------|--------|
//! | GET    | `/todos`      | 200, all tasks   | -      |
//! | POST   | `/todos`      | 201, new task    | 400 when the title is missing |
//! | PUT    | `/todos/{id}` | 200, the task    | 404 when the id is unknown |
//! | DELETE | `/todos/{id}` | 200, the task    | 404 when the id is unknown |
//!
//! Error bodies are `{"error": "<message>"}`. Every route allows
//! cross-origin requests so a browser front-end on another origin can call it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::error::StoreError;
use crate::models::{NewTask, Task, TaskPatch};
use crate::store::TaskStore;

/// Store handle shared by every request.
pub type SharedStore = Arc<RwLock<TaskStore>>;

/// Error returned by a route handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body was not valid task JSON.
    #[error("{0}")]
    Body(String),

    /// The path id is not a number, so no task can match it.
    #[error("Task not found")]
    UnknownId,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(e) => e.status(),
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownId => StatusCode::NOT_FOUND,
        };
        tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Builds the `/todos` router around `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/todos", get(list_tasks).post(create_task))
        .route("/todos/{id}", put(update_task).delete(delete_task))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Binds `addr` and serves the API on a background task.
///
/// Returns the bound address (useful with port 0) and the server task.
///
/// # Errors
///
/// Returns an error if the listener cannot bind to `addr`.
pub async fn start_server(addr: &str, store: SharedStore) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;
    let app = router(store);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Serves the API on `addr` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(addr: &str, store: SharedStore) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server running");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        })
        .await
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| ApiError::UnknownId)
}

/// `GET /todos`
async fn list_tasks(State(store): State<SharedStore>) -> Json<Vec<Task>> {
    Json(store.read().await.list())
}

/// `POST /todos`
async fn create_task(
    State(store): State<SharedStore>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(fields) = payload.map_err(|e| ApiError::Body(e.body_text()))?;
    let task = store.write().await.create(fields)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /todos/{id}`
///
/// The id is resolved before the body is read, so an unknown id answers 404
/// whatever the body holds. An empty body is an empty patch.
async fn update_task(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    let mut store = store.write().await;
    if store.get(id).is_none() {
        return Err(StoreError::NotFound(id).into());
    }
    let patch = decode_patch(&body)?;
    let task = store.update(id, patch)?;
    Ok(Json(task))
}

fn decode_patch(body: &[u8]) -> Result<TaskPatch, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TaskPatch::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Body(format!("Failed to parse the request body as JSON: {e}")))
}

/// `DELETE /todos/{id}`
async fn delete_task(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    let task = store.write().await.delete(id)?;
    Ok(Json(task))
}
