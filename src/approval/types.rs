// ABOUTME: Core types for the tool confirmation gate.
// ABOUTME: ApprovalDecision, the ToolCallDenied signal, and the tagged GateOutcome.

use serde_json::Value;
use thiserror::Error;

/// The user's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Run the tool call with its original arguments.
    Approve,
    /// Refuse the tool call.
    Decline,
}

impl ApprovalDecision {
    /// Map a yes/no answer onto a decision.
    pub fn from_answer(approved: bool) -> Self {
        if approved { Self::Approve } else { Self::Decline }
    }
}

/// Raised when the user declines a tool call that required confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user declined the call to {tool_name}")]
pub struct ToolCallDenied {
    pub tool_name: String,
}

impl ToolCallDenied {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
        }
    }
}

/// What happened to an intercepted tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// The wrapped invocation ran and produced this value, unchanged.
    Executed(Value),
    /// The user declined; the wrapped invocation never ran.
    Denied(ToolCallDenied),
}

impl GateOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    /// Convert into a plain result, turning a denial into an error.
    pub fn into_result(self) -> Result<Value, ToolCallDenied> {
        match self {
            Self::Executed(value) => Ok(value),
            Self::Denied(denied) => Err(denied),
        }
    }
}
