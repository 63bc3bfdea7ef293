// ABOUTME: Agent runner — drives one conversation turn between the model and the tools.
// ABOUTME: Every tool call goes through the ToolInterceptor; a denial ends the turn.

use std::sync::Arc;

use anyhow::anyhow;
use futures::FutureExt;
use serde_json::{Value, json};
use thiserror::Error;

use super::hooks::RunHooks;
use crate::approval::{GateOutcome, Next, ToolCallDenied, ToolInterceptor};
use crate::arcade::ToolService;
use crate::llm::{ChatMessage, ChatModel, ToolCall};
use crate::tools::ToolSpec;

/// Bundled parameters for building an [`AgentRunner`].
pub struct AgentRunnerParams {
    pub name: String,
    pub model: Arc<dyn ChatModel>,
    pub service: Arc<dyn ToolService>,
    pub interceptor: Arc<dyn ToolInterceptor>,
    pub hooks: Arc<dyn RunHooks>,
    pub tools: Vec<ToolSpec>,
    pub system_prompt: String,
    pub user_id: String,
    pub max_steps: usize,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The model gave a final answer. `history` is the updated conversation.
    Completed {
        history: Vec<ChatMessage>,
        reply: String,
    },
    /// The user declined a tool call; the conversation was not updated.
    Denied(ToolCallDenied),
}

/// A turn that failed part way.
///
/// `history` holds the caller's history plus every tool call that ran and its
/// result, so the next turn knows what already happened.
#[derive(Debug, Error)]
#[error("{error:#}")]
pub struct TurnError {
    pub history: Vec<ChatMessage>,
    pub error: anyhow::Error,
}

impl TurnError {
    /// `messages` starts with the system prompt, which is not part of the history.
    fn new(mut messages: Vec<ChatMessage>, error: anyhow::Error) -> Self {
        messages.remove(0);
        Self {
            history: messages,
            error,
        }
    }
}

/// What one tool call contributed to the turn.
enum ToolStep {
    Result(String),
    Denied(ToolCallDenied),
}

/// Runs conversation turns for one agent.
pub struct AgentRunner {
    params: AgentRunnerParams,
}

impl AgentRunner {
    pub fn new(params: AgentRunnerParams) -> Self {
        Self { params }
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.params.tools
    }

    /// Run one turn on top of `history` (which should end with the user's message).
    ///
    /// The model is called repeatedly until it answers without tool calls, at most
    /// `max_steps` times. `history` itself is never modified. On failure the error
    /// carries the conversation up to the last tool result that was produced.
    pub async fn run_turn(&self, history: &[ChatMessage]) -> Result<TurnOutcome, TurnError> {
        let p = &self.params;
        p.hooks.on_agent_start(&p.name).await;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(&p.system_prompt));
        messages.extend_from_slice(history);

        for step in 0..p.max_steps {
            let reply = match p.model.complete(&messages, &p.tools).await {
                Ok(reply) => reply,
                Err(error) => return Err(TurnError::new(messages, error)),
            };
            let calls = reply.tool_calls.clone();
            let request_at = messages.len();
            messages.push(reply);

            if calls.is_empty() {
                let text = messages
                    .last()
                    .map(|m| m.text_content().to_string())
                    .unwrap_or_default();
                p.hooks.on_agent_end(&p.name, &text).await;
                messages.remove(0);
                return Ok(TurnOutcome::Completed {
                    history: messages,
                    reply: text,
                });
            }

            tracing::debug!(step, tool_calls = calls.len(), "model requested tools");
            for (answered, call) in calls.iter().enumerate() {
                match self.dispatch(call).await {
                    Ok(ToolStep::Result(content)) => {
                        messages.push(ChatMessage::tool_result(&call.id, content));
                    }
                    Ok(ToolStep::Denied(denied)) => return Ok(TurnOutcome::Denied(denied)),
                    Err(error) => {
                        drop_unanswered(&mut messages, request_at, answered);
                        return Err(TurnError::new(messages, error));
                    }
                }
            }
        }

        let error = anyhow!("agent {} did not finish within {} steps", p.name, p.max_steps);
        Err(TurnError::new(messages, error))
    }

    /// Route one tool call through the interceptor.
    async fn dispatch(&self, call: &ToolCall) -> anyhow::Result<ToolStep> {
        let p = &self.params;
        let tool_name = call.function.name.as_str();

        if !p.tools.iter().any(|t| t.name() == tool_name) {
            tracing::warn!(tool = tool_name, "model called an unavailable tool");
            return Ok(ToolStep::Result(error_content(format!(
                "tool {tool_name} is not available"
            ))));
        }

        let args = match parse_arguments(&call.function.arguments) {
            Ok(args) => args,
            Err(message) => {
                tracing::warn!(tool = tool_name, %message, "invalid tool arguments");
                return Ok(ToolStep::Result(error_content(message)));
            }
        };

        let agent = p.name.as_str();
        let user_id = p.user_id.as_str();
        let service = p.service.as_ref();
        let hooks = p.hooks.as_ref();
        let next: Next<'_> = Box::new(move |args| {
            async move {
                hooks.on_tool_start(agent, tool_name).await;
                let value = service.execute(tool_name, args, user_id).await?.into_value();
                let content = value_to_content(&value);
                hooks.on_tool_end(agent, tool_name, &content).await;
                Ok::<_, anyhow::Error>(value)
            }
            .boxed()
        });

        match p.interceptor.intercept(tool_name, args, next).await? {
            GateOutcome::Executed(value) => Ok(ToolStep::Result(value_to_content(&value))),
            GateOutcome::Denied(denied) => Ok(ToolStep::Denied(denied)),
        }
    }
}

/// Cut the tool-call request at `request_at` down to its first `answered` calls,
/// or remove it when none of them produced a result.
fn drop_unanswered(messages: &mut Vec<ChatMessage>, request_at: usize, answered: usize) {
    if answered == 0 {
        messages.truncate(request_at);
    } else if let Some(request) = messages.get_mut(request_at) {
        request.tool_calls.truncate(answered);
    }
}

/// Parse the model's JSON-encoded arguments. Anything but an object is rejected.
fn parse_arguments(raw: &str) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("tool arguments must be a JSON object".to_string()),
        Err(e) => Err(format!("tool arguments are not valid JSON: {e}")),
    }
}

fn value_to_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_content(message: impl Into<String>) -> String {
    json!({ "error": message.into() }).to_string()
}
