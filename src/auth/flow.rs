// ABOUTME: Per-tool authorization handshake with the provisioning service.
// ABOUTME: Shows the authorization URL, polls until completed/failed, and bounds the wait.

use tokio::time::timeout;

use super::types::{AuthError, AuthSettings, AuthState};
use crate::arcade::ToolService;
use crate::console::Interaction;
use crate::tools::ToolSpec;

/// Make sure `tool_name` may run on behalf of `user_id`.
///
/// Returns immediately when the service already reports the pair as authorized.
/// Otherwise prints the authorization URL and waits, at most `settings.timeout`,
/// for the user to finish in their browser.
pub async fn authorize_tool(
    service: &dyn ToolService,
    interaction: &dyn Interaction,
    tool_name: &str,
    user_id: &str,
    settings: &AuthSettings,
) -> Result<(), AuthError> {
    let response = service.authorize(tool_name, user_id).await?;

    let authorization_id = match AuthState::Unauthorized.observe(&response) {
        AuthState::Authorized => {
            tracing::debug!(tool = tool_name, "already authorized");
            return Ok(());
        }
        AuthState::Failed => {
            return Err(AuthError::Denied {
                tool_name: tool_name.to_string(),
            });
        }
        AuthState::Unauthorized => {
            return Err(AuthError::MissingAuthorizationId {
                tool_name: tool_name.to_string(),
            });
        }
        AuthState::PendingUser { authorization_id } => authorization_id,
    };

    tracing::info!(tool = tool_name, "authorization required");
    match response.url.as_deref() {
        Some(url) => {
            interaction
                .notify(&format!(
                    "Authorization required for {tool_name}. Please authorize in your browser:\n{url}"
                ))
                .await?
        }
        None => {
            interaction
                .notify(&format!("Authorization required for {tool_name}."))
                .await?
        }
    }
    interaction
        .notify("Waiting for you to complete authorization...")
        .await?;

    let final_state = timeout(
        settings.timeout,
        wait_for_completion(service, &authorization_id, settings),
    )
    .await
    .map_err(|_| AuthError::Timeout {
        tool_name: tool_name.to_string(),
        waited: settings.timeout,
    })??;

    match final_state {
        AuthState::Authorized => {
            tracing::info!(tool = tool_name, "authorization granted");
            interaction.notify("Authorization granted.").await?;
            Ok(())
        }
        _ => Err(AuthError::Denied {
            tool_name: tool_name.to_string(),
        }),
    }
}

/// Poll the status endpoint until it reports a final answer.
async fn wait_for_completion(
    service: &dyn ToolService,
    authorization_id: &str,
    settings: &AuthSettings,
) -> Result<AuthState, AuthError> {
    let mut state = AuthState::PendingUser {
        authorization_id: authorization_id.to_string(),
    };
    loop {
        let response = service
            .auth_status(authorization_id, settings.poll_wait)
            .await?;
        state = state.observe(&response);
        if response.status.is_terminal() {
            return Ok(state);
        }
        tracing::debug!(authorization_id, status = ?response.status, "authorization still pending");
        tokio::time::sleep(settings.poll_interval).await;
    }
}

/// Authorize every tool once, in order, before the agent may use any of them.
///
/// A tool whose authorization times out or is denied is left out of the returned
/// list and reported to the operator. Service errors abort.
pub async fn authorize_tools(
    service: &dyn ToolService,
    interaction: &dyn Interaction,
    tools: Vec<ToolSpec>,
    user_id: &str,
    settings: &AuthSettings,
) -> Result<Vec<ToolSpec>, AuthError> {
    let mut authorized = Vec::with_capacity(tools.len());
    for tool in tools {
        match authorize_tool(service, interaction, tool.name(), user_id, settings).await {
            Ok(()) => authorized.push(tool),
            Err(e) if e.is_tool_failure() => {
                tracing::warn!(tool = tool.name(), error = %e, "tool withheld from agent");
                interaction
                    .notify(&format!("{e}; {} will not be available.", tool.name()))
                    .await?;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(authorized)
}
