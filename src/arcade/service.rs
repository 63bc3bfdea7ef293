// ABOUTME: ToolService trait — the seam to the remote tool-provisioning service.
// ABOUTME: Also gathers the tools for the configured toolkits before the agent is built.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{ArcadeError, AuthorizationResponse, ExecuteToolResponse};
use crate::tools::ToolSpec;

/// Operations the app needs from the provisioning service.
#[async_trait]
pub trait ToolService: Send + Sync {
    /// List the tools of a toolkit, formatted for function calling.
    async fn list_tools(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolSpec>, ArcadeError>;

    /// Fetch a single tool by name.
    async fn get_tool(&self, tool_name: &str) -> Result<ToolSpec, ArcadeError>;

    /// Request authorization of `tool_name` for `user_id`.
    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<AuthorizationResponse, ArcadeError>;

    /// Check an authorization, letting the service hold the request for up to `wait`.
    async fn auth_status(
        &self,
        authorization_id: &str,
        wait: Duration,
    ) -> Result<AuthorizationResponse, ArcadeError>;

    /// Run a tool on behalf of `user_id`.
    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ExecuteToolResponse, ArcadeError>;
}

/// Collect the tools of every toolkit plus individually named tools, de-duplicated by name.
pub async fn fetch_tools(
    service: &dyn ToolService,
    toolkits: &[String],
    extra_tools: &[String],
    limit: usize,
) -> Result<Vec<ToolSpec>, ArcadeError> {
    let mut tools: Vec<ToolSpec> = Vec::new();

    for toolkit in toolkits {
        let listed = service.list_tools(toolkit, limit).await?;
        tracing::debug!(toolkit = %toolkit, count = listed.len(), "listed toolkit tools");
        for tool in listed {
            push_unique(&mut tools, tool);
        }
    }

    for name in extra_tools {
        if tools.iter().any(|t| t.name() == name) {
            continue;
        }
        let tool = service.get_tool(name).await?;
        push_unique(&mut tools, tool);
    }

    Ok(tools)
}

fn push_unique(tools: &mut Vec<ToolSpec>, tool: ToolSpec) {
    if !tools.iter().any(|t| t.name() == tool.name()) {
        tools.push(tool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct Catalog {
        toolkits: HashMap<String, Vec<ToolSpec>>,
        fetched: Mutex<Vec<String>>,
    }

    fn spec(name: &str) -> ToolSpec {
        ToolSpec::new(name, "", serde_json::json!({"type": "object"}))
    }

    #[async_trait]
    impl ToolService for Catalog {
        async fn list_tools(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolSpec>, ArcadeError> {
            let mut tools = self.toolkits.get(toolkit).cloned().unwrap_or_default();
            tools.truncate(limit);
            Ok(tools)
        }

        async fn get_tool(&self, tool_name: &str) -> Result<ToolSpec, ArcadeError> {
            self.fetched.lock().unwrap().push(tool_name.to_string());
            Ok(spec(tool_name))
        }

        async fn authorize(&self, _: &str, _: &str) -> Result<AuthorizationResponse, ArcadeError> {
            Ok(AuthorizationResponse::completed())
        }

        async fn auth_status(
            &self,
            _: &str,
            _: Duration,
        ) -> Result<AuthorizationResponse, ArcadeError> {
            Ok(AuthorizationResponse::completed())
        }

        async fn execute(
            &self,
            _: &str,
            _: Value,
            _: &str,
        ) -> Result<ExecuteToolResponse, ArcadeError> {
            Ok(ExecuteToolResponse::default())
        }
    }

    fn catalog() -> Catalog {
        let mut toolkits = HashMap::new();
        toolkits.insert(
            "GoogleCalendar".to_string(),
            vec![spec("GoogleCalendar_CreateEvent"), spec("GoogleCalendar_DeleteEvent")],
        );
        toolkits.insert(
            "Gmail".to_string(),
            vec![spec("Gmail_SendEmail"), spec("GoogleCalendar_CreateEvent")],
        );
        Catalog {
            toolkits,
            fetched: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn merges_toolkits_without_duplicates() {
        let catalog = catalog();
        let tools = fetch_tools(
            &catalog,
            &["GoogleCalendar".to_string(), "Gmail".to_string()],
            &[],
            100,
        )
        .await
        .unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec!["GoogleCalendar_CreateEvent", "GoogleCalendar_DeleteEvent", "Gmail_SendEmail"]
        );
    }

    #[tokio::test]
    async fn fetches_extra_tools_not_already_listed() {
        let catalog = catalog();
        let tools = fetch_tools(
            &catalog,
            &["GoogleCalendar".to_string()],
            &["GoogleCalendar_DeleteEvent".to_string(), "Slack_SendMessage".to_string()],
            100,
        )
        .await
        .unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(*catalog.fetched.lock().unwrap(), vec!["Slack_SendMessage".to_string()]);
    }

    #[tokio::test]
    async fn respects_limit() {
        let catalog = catalog();
        let tools = fetch_tools(&catalog, &["GoogleCalendar".to_string()], &[], 1)
            .await
            .unwrap();
        assert_eq!(tools.len(), 1);
    }
}
