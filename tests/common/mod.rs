// ABOUTME: Shared fakes for integration tests — scripted model, in-memory tool service, scripted user.
// ABOUTME: Lets the gate, authorization, and chat loop run end to end without network access.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use calgate::arcade::{
    ArcadeError, AuthStatus, AuthorizationResponse, ExecuteToolResponse, ToolOutput, ToolService,
};
use calgate::console::Interaction;
use calgate::llm::{ChatMessage, ChatModel, Role, ToolCall};
use calgate::tools::ToolSpec;

pub fn calendar_tool(name: &str) -> ToolSpec {
    ToolSpec::new(
        name,
        format!("{name} tool"),
        json!({"type": "object", "properties": {}}),
    )
}

/// Assistant message that requests the given `(id, tool, arguments)` calls.
pub fn tool_calls(calls: &[(&str, &str, Value)]) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: None,
        tool_calls: calls
            .iter()
            .map(|(id, name, args)| ToolCall::new(*id, *name, args.to_string()))
            .collect(),
        tool_call_id: None,
    }
}

/// Model that replies from a fixed script.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ChatMessage>>,
    pub calls: Mutex<usize>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ChatMessage>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> anyhow::Result<ChatMessage> {
        *self.calls.lock().unwrap() += 1;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("model script exhausted"))
    }
}

/// In-memory tool service: a catalog, per-tool authorization answers, and an execution log.
#[derive(Default)]
pub struct FakeService {
    pub catalog: Vec<ToolSpec>,
    /// Tools missing here are authorized immediately.
    pub auth: HashMap<String, AuthStatus>,
    pub results: HashMap<String, Value>,
    pub executed: Mutex<Vec<(String, Value)>>,
}

impl FakeService {
    pub fn with_tools(names: &[&str]) -> Self {
        Self {
            catalog: names.iter().map(|n| calendar_tool(n)).collect(),
            ..Self::default()
        }
    }

    pub fn executed_names(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl ToolService for FakeService {
    async fn list_tools(&self, _toolkit: &str, limit: usize) -> Result<Vec<ToolSpec>, ArcadeError> {
        Ok(self.catalog.iter().take(limit).cloned().collect())
    }

    async fn get_tool(&self, name: &str) -> Result<ToolSpec, ArcadeError> {
        self.catalog
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| ArcadeError::Api {
                status: 404,
                message: format!("tool {name} not found"),
            })
    }

    async fn authorize(
        &self,
        tool_name: &str,
        _user_id: &str,
    ) -> Result<AuthorizationResponse, ArcadeError> {
        Ok(match self.auth.get(tool_name) {
            None | Some(AuthStatus::Completed) => AuthorizationResponse::completed(),
            Some(AuthStatus::Failed) => AuthorizationResponse {
                status: AuthStatus::Failed,
                ..AuthorizationResponse::default()
            },
            Some(_) => AuthorizationResponse::pending(
                format!("auth-{tool_name}"),
                format!("https://auth.example.com/{tool_name}"),
            ),
        })
    }

    async fn auth_status(
        &self,
        id: &str,
        _wait: Duration,
    ) -> Result<AuthorizationResponse, ArcadeError> {
        let tool_name = id.trim_start_matches("auth-");
        Ok(match self.auth.get(tool_name) {
            Some(AuthStatus::Pending) => AuthorizationResponse::pending(id, ""),
            Some(AuthStatus::Failed) => AuthorizationResponse {
                status: AuthStatus::Failed,
                ..AuthorizationResponse::default()
            },
            _ => AuthorizationResponse::completed(),
        })
    }

    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        _user_id: &str,
    ) -> Result<ExecuteToolResponse, ArcadeError> {
        self.executed
            .lock()
            .unwrap()
            .push((tool_name.to_string(), input));
        let value = self
            .results
            .get(tool_name)
            .cloned()
            .unwrap_or_else(|| json!("ok"));
        Ok(ExecuteToolResponse {
            output: Some(ToolOutput {
                value: Some(value),
                error: None,
            }),
            ..ExecuteToolResponse::default()
        })
    }
}

/// A user who types from a script and answers confirmations from another.
#[derive(Default)]
pub struct ScriptedUser {
    lines: Mutex<VecDeque<String>>,
    answers: Mutex<VecDeque<bool>>,
    pub transcript: Mutex<Vec<String>>,
}

impl ScriptedUser {
    pub fn new(lines: &[&str], answers: &[bool]) -> Self {
        Self {
            lines: Mutex::new(lines.iter().map(|l| l.to_string()).collect()),
            answers: Mutex::new(answers.iter().copied().collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    pub fn transcript(&self) -> Vec<String> {
        self.transcript.lock().unwrap().clone()
    }

    pub fn questions_asked(&self) -> usize {
        self.transcript
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.starts_with("? "))
            .count()
    }
}

#[async_trait]
impl Interaction for ScriptedUser {
    async fn read_line(&self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.lock().unwrap().pop_front())
    }

    async fn confirm(&self, question: &str) -> io::Result<bool> {
        self.transcript.lock().unwrap().push(format!("? {question}"));
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }

    async fn notify(&self, message: &str) -> io::Result<()> {
        self.transcript.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
