//! Async HTTP client for the conversation memory service

use crate::error::{ClientError, Result};
use crate::model::{ConversationTurn, CreatedRecord, HealthStatus, MemoryRetrieval};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

const HEALTH_PATH: &str = "/health";
const CONVERSATION_PATH: &str = "/conversation/";
const RETRIEVE_PATH: &str = "/retrieve_memory/";

/// Client bound to one memory service instance
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    /// Base URL without trailing slash
    base_url: String,
    client: Client,
}

impl MemoryClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(format!(
                "{}: unsupported scheme '{}'",
                base_url,
                parsed.scheme()
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let request = self.client.get(self.endpoint(HEALTH_PATH));
        self.execute(HEALTH_PATH, request).await
    }

    /// `POST /conversation/` with one turn
    pub async fn add_turn(&self, turn: &ConversationTurn) -> Result<CreatedRecord> {
        let request = self.client.post(self.endpoint(CONVERSATION_PATH)).json(turn);
        self.execute(CONVERSATION_PATH, request).await
    }

    /// `GET /retrieve_memory/?user_id=..&text=..`
    pub async fn retrieve_memory(&self, user_id: &str, text: &str) -> Result<MemoryRetrieval> {
        let request = self
            .client
            .get(self.endpoint(RETRIEVE_PATH))
            .query(&[("user_id", user_id), ("text", text)]);
        self.execute(RETRIEVE_PATH, request).await
    }

    /// Send a request, require 200 and decode the JSON body
    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        tracing::debug!(path, "sending request");
        let start = Instant::now();

        let response = request.send().await?;
        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis() as u64;
        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::warn!(path, status = status.as_u16(), elapsed_ms, "unexpected status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(path, elapsed_ms, "request succeeded");
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("{}: {}", path, e)))
    }
}
