// ABOUTME: HTTP client for the Arcade API — formatted tools, authorization, and execution.
// ABOUTME: Implements ToolService with reqwest and bearer-token auth.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::service::ToolService;
use super::types::{ArcadeError, AuthorizationResponse, ExecuteToolResponse, FormattedToolsPage};
use crate::tools::ToolSpec;

pub const DEFAULT_BASE_URL: &str = "https://api.arcade.dev";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Arcade API client.
#[derive(Clone)]
pub struct ArcadeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ArcadeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different deployment (or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout. Status long-polls get their `wait` on top of it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ArcadeError> {
        self.send_within(request, self.timeout).await
    }

    async fn send_within<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<T, ArcadeError> {
        let response = request
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(status = %status, body_len = bytes.len(), "Arcade response");

        if !status.is_success() {
            return Err(ArcadeError::Api {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Pull a readable message out of an error body.
fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}

#[async_trait]
impl ToolService for ArcadeClient {
    async fn list_tools(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolSpec>, ArcadeError> {
        let limit = limit.to_string();
        let request = self.http.get(self.url("/v1/formatted_tools")).query(&[
            ("toolkit", toolkit),
            ("format", "openai"),
            ("limit", limit.as_str()),
        ]);
        let page: FormattedToolsPage = self.send(request).await?;
        Ok(page.items)
    }

    async fn get_tool(&self, tool_name: &str) -> Result<ToolSpec, ArcadeError> {
        let request = self
            .http
            .get(self.url(&format!("/v1/formatted_tools/{tool_name}")))
            .query(&[("format", "openai")]);
        self.send(request).await
    }

    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<AuthorizationResponse, ArcadeError> {
        let request = self
            .http
            .post(self.url("/v1/tools/authorize"))
            .json(&json!({ "tool_name": tool_name, "user_id": user_id }));
        self.send(request).await
    }

    async fn auth_status(
        &self,
        authorization_id: &str,
        wait: Duration,
    ) -> Result<AuthorizationResponse, ArcadeError> {
        let wait_secs = wait.as_secs().to_string();
        let request = self
            .http
            .get(self.url("/v1/auth/status"))
            .query(&[("id", authorization_id), ("wait", wait_secs.as_str())]);
        self.send_within(request, wait + self.timeout).await
    }

    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ExecuteToolResponse, ArcadeError> {
        let request = self.http.post(self.url("/v1/tools/execute")).json(&json!({
            "tool_name": tool_name,
            "input": input,
            "user_id": user_id,
        }));
        self.send(request).await
    }
}
