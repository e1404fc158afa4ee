//! Error types shared by the store, the HTTP layer, and the planner.

use axum::http::StatusCode;

/// Failures of a [`crate::store::TaskStore`] operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The request is missing required data (currently only the title).
    #[error("{0}")]
    Validation(String),

    /// No task with the given id exists.
    #[error("Task not found")]
    NotFound(u64),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Failures talking to the task API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// An in-process store rejected the call.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// True when the server reported that the task does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::Status { status, .. } => *status == StatusCode::NOT_FOUND.as_u16(),
            ClientError::Store(StoreError::NotFound(_)) => true,
            _ => false,
        }
    }
}

/// Why a new task title was refused before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("Please enter a task description")]
    Empty,

    #[error("Task must be at least 2 characters long")]
    TooShort,

    #[error("Task must be less than 200 characters")]
    TooLong,

    #[error("This task already exists in this time block")]
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_http_status() {
        assert_eq!(StoreError::Validation("Title is required".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(StoreError::NotFound(3).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_found_is_detected_for_both_backends() {
        let remote = ClientError::Status { status: 404, message: "Task not found".into() };
        assert!(remote.is_not_found());
        assert!(ClientError::Store(StoreError::NotFound(1)).is_not_found());
        assert!(!ClientError::Status { status: 400, message: String::new() }.is_not_found());
    }
}
