// ABOUTME: OpenAI-compatible Chat Completions client.
// ABOUTME: Sends the conversation plus tool specs and returns the assistant's reply message.

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ChatModel;
use super::types::ChatMessage;
use crate::tools::ToolSpec;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat Completions client. Works with any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiChat {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiChat {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolSpec],
}

fn no_tools(tools: &&[ToolSpec]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> anyhow::Result<ChatMessage> {
        let request = ApiRequest {
            model: &self.model,
            messages,
            tools,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "chat completion request"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context("failed to read chat completion response")?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            tracing::error!(status = %status, body = %body, "chat completion error");
            bail!("chat completion returned HTTP {}: {}", status, body.trim());
        }

        let parsed: ApiResponse =
            serde_json::from_slice(&bytes).context("failed to decode chat completion response")?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .context("chat completion returned no choices")?;

        tracing::debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            tool_calls = choice.message.tool_calls.len(),
            "chat completion response"
        );
        Ok(choice.message)
    }
}
