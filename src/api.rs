use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{NewTask, Task, TaskPatch};

/// CRUD access to the task store, over HTTP or in-process.
///
/// Every mutating call returns the store's canonical copy of the task, which
/// callers merge into their local state instead of guessing the result.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ClientError>;

    async fn create(&self, fields: &NewTask) -> Result<Task, ClientError>;

    async fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError>;

    async fn delete(&self, id: u64) -> Result<Task, ClientError>;
}
