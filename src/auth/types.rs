// ABOUTME: Authorization flow types — bounded-wait settings, per-tool state, and AuthError.
// ABOUTME: AuthState mirrors Unauthorized → PendingUser → Authorized | Failed.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::arcade::{ArcadeError, AuthStatus, AuthorizationResponse};

/// How long and how often to wait for a user to finish authorizing.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Upper bound on the whole wait for one tool.
    pub timeout: Duration,
    /// How long the service may hold each status request open.
    pub poll_wait: Duration,
    /// Pause between status requests that come back still pending.
    pub poll_interval: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_wait: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Where a (tool, user) authorization stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthorized,
    PendingUser { authorization_id: String },
    Authorized,
    Failed,
}

impl AuthState {
    /// The state after the service reports `response`.
    ///
    /// Authorized and Failed are final. A pending response without an id leaves
    /// an Unauthorized pair where it was, since there is nothing to poll.
    pub fn observe(self, response: &AuthorizationResponse) -> Self {
        match (self, response.status) {
            (state @ (Self::Authorized | Self::Failed), _) => state,
            (_, AuthStatus::Completed) => Self::Authorized,
            (_, AuthStatus::Failed) => Self::Failed,
            (state, _) => match &response.id {
                Some(id) => Self::PendingUser {
                    authorization_id: id.clone(),
                },
                None => state,
            },
        }
    }
}

/// Why a tool could not be authorized.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization of {tool_name} did not complete within {waited:?}")]
    Timeout { tool_name: String, waited: Duration },

    #[error("authorization of {tool_name} was denied")]
    Denied { tool_name: String },

    #[error("authorization of {tool_name} is pending but the service returned no authorization id")]
    MissingAuthorizationId { tool_name: String },

    #[error(transparent)]
    Service(#[from] ArcadeError),

    #[error("console error during authorization: {0}")]
    Console(#[from] io::Error),
}

impl AuthError {
    /// Failures that only affect the one tool; everything else should abort startup.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Denied { .. } | Self::MissingAuthorizationId { .. }
        )
    }
}
