// ABOUTME: Wire types for the Arcade tool-provisioning API.
// ABOUTME: Authorization responses, tool execution results, and the ArcadeError taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tools::ToolSpec;

/// Errors talking to the provisioning service.
#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("request to Arcade failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Arcade returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode Arcade response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Remote authorization state for a (tool, user) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    #[default]
    NotStarted,
    Pending,
    Completed,
    Failed,
    /// A status this client does not know; treated as still pending.
    #[serde(other)]
    Unknown,
}

impl AuthStatus {
    /// Whether the service has reached a final answer.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Response of the authorize and auth-status endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: AuthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl AuthorizationResponse {
    pub fn completed() -> Self {
        Self {
            status: AuthStatus::Completed,
            ..Self::default()
        }
    }

    pub fn pending(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: AuthStatus::Pending,
            url: Some(url.into()),
            user_id: None,
        }
    }
}

/// One page of the formatted-tools listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FormattedToolsPage {
    #[serde(default)]
    pub items: Vec<ToolSpec>,
}

/// Response of the execute endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteToolResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ToolOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolOutputError>,
}

/// An error reported by the tool itself (bad arguments, calendar conflicts, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutputError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_prompt_content: Option<String>,
}

impl ExecuteToolResponse {
    /// The value to hand back to the model.
    ///
    /// Tool-reported errors become `{"error": message}` so the model can react to them.
    pub fn into_value(self) -> Value {
        let Some(output) = self.output else {
            return Value::Null;
        };
        if let Some(error) = output.error {
            let mut body = serde_json::json!({ "error": error.message });
            if let Some(extra) = error.additional_prompt_content {
                body["details"] = Value::String(extra);
            }
            return body;
        }
        output.value.unwrap_or(Value::Null)
    }
}
