// ABOUTME: App orchestrator — wires together the Arcade client, authorization, gate, model, and chat loop.
// ABOUTME: Sets up subsystems then runs the interactive session on stdin/stdout.

use std::sync::Arc;

use anyhow::Context;

use crate::agent::{AgentRunner, AgentRunnerParams, LoggingHooks};
use crate::approval::{ConfirmationGate, PassThrough, ToolInterceptor};
use crate::arcade::{ArcadeClient, ToolService, fetch_tools};
use crate::auth::authorize_tools;
use crate::chat::run_chat;
use crate::config::Config;
use crate::console::{Console, Interaction};
use crate::llm::{ChatModel, OpenAiChat};
use crate::prompt::SystemPromptBuilder;

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the application: connect to the services, authorize tools, and chat.
    pub async fn run(self) -> anyhow::Result<()> {
        let config = &self.config;

        let service: Arc<dyn ToolService> = Arc::new(
            ArcadeClient::new(config.arcade_api_key()?)
                .with_base_url(&config.arcade.base_url)
                .with_timeout(config.arcade_timeout()),
        );
        let model: Arc<dyn ChatModel> = Arc::new(
            OpenAiChat::new(config.openai_api_key()?, &config.llm.model)
                .with_base_url(&config.llm.base_url)
                .with_timeout(config.llm_timeout()),
        );
        let interaction: Arc<dyn Interaction> = Arc::new(Console::stdio());

        let runner = self
            .prepare_agent(service, model, interaction.clone(), system_prompt())
            .await?;

        run_chat(interaction.as_ref(), &runner).await?;
        Ok(())
    }

    /// Fetch and authorize the configured tools, then build the agent around them.
    pub async fn prepare_agent(
        &self,
        service: Arc<dyn ToolService>,
        model: Arc<dyn ChatModel>,
        interaction: Arc<dyn Interaction>,
        system_prompt: String,
    ) -> anyhow::Result<AgentRunner> {
        let config = &self.config;
        let user_id = config.user_id()?.to_string();

        let tools = fetch_tools(
            service.as_ref(),
            &config.agent.toolkits,
            &config.agent.tools,
            config.agent.tool_limit,
        )
        .await
        .context("failed to fetch tools")?;
        tracing::info!(count = tools.len(), "fetched tools");

        let tools = authorize_tools(
            service.as_ref(),
            interaction.as_ref(),
            tools,
            &user_id,
            &config.auth_settings(),
        )
        .await
        .context("tool authorization failed")?;
        if tools.is_empty() {
            tracing::warn!("no tools available, the assistant can only chat");
        }

        let policy = config.confirmation_policy();
        let interceptor: Arc<dyn ToolInterceptor> = if policy.is_empty() {
            tracing::info!("tool confirmation disabled");
            Arc::new(PassThrough)
        } else {
            Arc::new(ConfirmationGate::new(policy, interaction))
        };

        Ok(AgentRunner::new(AgentRunnerParams {
            name: config.agent.name.clone(),
            model,
            service,
            interceptor,
            hooks: Arc::new(LoggingHooks::new(&config.agent.name)),
            tools,
            system_prompt,
            user_id,
            max_steps: config.agent.max_steps,
        }))
    }
}

/// Default prompt layers, user overrides from ~/.calgate/, local file, and today's date.
fn system_prompt() -> String {
    SystemPromptBuilder::new()
        .load_overrides(&Config::config_dir())
        .load_local()
        .with_today(chrono::Local::now().date_naive())
        .build()
}
