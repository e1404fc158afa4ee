//! HTTP client for the `/todos` API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::TaskApi;
use crate::error::ClientError;
use crate::models::{NewTask, Task, TaskPatch};

/// Error body returned by the server on 4xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`TaskApi`] over HTTP, rooted at the collection URL
/// (e.g. `http://localhost:5000/todos`).
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpTaskApi { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Decodes a JSON body, turning non-success statuses into
/// [`ClientError::Status`] with the server's message when it sent one.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
        };
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.client.get(&self.base_url).send().await?;
        decode(response).await
    }

    async fn create(&self, fields: &NewTask) -> Result<Task, ClientError> {
        let response = self.client.post(&self.base_url).json(fields).send().await?;
        decode(response).await
    }

    async fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError> {
        let response = self.client.put(self.item_url(id)).json(patch).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: u64) -> Result<Task, ClientError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let api = HttpTaskApi::new("http://localhost:5000/todos/");
        assert_eq!(api.base_url(), "http://localhost:5000/todos");
        assert_eq!(api.item_url(4), "http://localhost:5000/todos/4");
    }
}
