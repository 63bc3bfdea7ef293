// ABOUTME: Configuration loading for calgate.
// ABOUTME: Reads ~/.calgate/config.toml, then applies environment and CLI overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::approval::ConfirmationPolicy;
use crate::arcade;
use crate::auth::AuthSettings;
use crate::llm;

/// Problems loading or completing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no user id configured; set ARCADE_USER_ID or pass --user-id")]
    MissingUserId,

    #[error("no API key configured; set {0}")]
    MissingApiKey(&'static str),

    #[error("invalid config value {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arcade: ArcadeConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub approval: ApprovalConfig,
    pub authorization: AuthorizationConfig,
}

/// Tool-provisioning service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub base_url: String,
    pub user_id: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout_seconds: u64,
    /// Only ever taken from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            base_url: arcade::DEFAULT_BASE_URL.to_string(),
            user_id: None,
            timeout_seconds: arcade::DEFAULT_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

/// Chat model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Per-request HTTP timeout.
    pub timeout_seconds: u64,
    /// Only ever taken from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: llm::openai::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: llm::openai::DEFAULT_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

/// Agent identity and tool selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    pub toolkits: Vec<String>,
    pub tools: Vec<String>,
    pub tool_limit: usize,
    pub max_steps: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Google Calendar Assistant".to_string(),
            toolkits: vec!["GoogleCalendar".to_string()],
            tools: vec![],
            tool_limit: 100,
            max_steps: 10,
        }
    }
}

/// Which tool calls need the user's go-ahead.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    pub enabled: bool,
    pub confirm: Vec<String>,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confirm: vec![
                "GoogleCalendar_CreateEvent".to_string(),
                "GoogleCalendar_UpdateEvent".to_string(),
                "GoogleCalendar_DeleteEvent".to_string(),
            ],
        }
    }
}

/// Bounds on the browser authorization wait.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthorizationConfig {
    pub timeout_seconds: u64,
    pub poll_wait_seconds: u64,
    pub poll_interval_ms: u64,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
            poll_wait_seconds: 30,
            poll_interval_ms: 500,
        }
    }
}

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub user_id: Option<String>,
    pub model: Option<String>,
    pub toolkits: Vec<String>,
    pub confirm: Vec<String>,
    pub no_confirm: bool,
}

impl Config {
    /// Load config from `path`, or from ~/.calgate/config.toml when none is given.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every turn or every tool listing fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.max_steps",
                reason: "must be at least 1",
            });
        }
        if self.agent.tool_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.tool_limit",
                reason: "must be at least 1",
            });
        }
        if self.arcade.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "arcade.timeout_seconds",
                reason: "must be at least 1",
            });
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "llm.timeout_seconds",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Directory holding calgate's user files.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".calgate")
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ARCADE_API_KEY") {
            self.arcade.api_key = Some(v);
        }
        if let Some(v) = get("ARCADE_USER_ID") {
            self.arcade.user_id = Some(v);
        }
        if let Some(v) = get("ARCADE_BASE_URL") {
            self.arcade.base_url = v;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(user_id) = overrides.user_id {
            self.arcade.user_id = Some(user_id);
        }
        if let Some(model) = overrides.model {
            self.llm.model = model;
        }
        if !overrides.toolkits.is_empty() {
            self.agent.toolkits = overrides.toolkits;
        }
        if !overrides.confirm.is_empty() {
            self.approval.confirm = overrides.confirm;
        }
        if overrides.no_confirm {
            self.approval.enabled = false;
        }
    }

    pub fn user_id(&self) -> Result<&str, ConfigError> {
        self.arcade
            .user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingUserId)
    }

    pub fn arcade_api_key(&self) -> Result<&str, ConfigError> {
        self.arcade
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey("ARCADE_API_KEY"))
    }

    pub fn openai_api_key(&self) -> Result<&str, ConfigError> {
        self.llm
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey("OPENAI_API_KEY"))
    }

    /// The confirmation policy in effect. Empty when confirmation is disabled.
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        if !self.approval.enabled {
            return ConfirmationPolicy::empty();
        }
        ConfirmationPolicy::new(&self.approval.confirm)
    }

    pub fn arcade_timeout(&self) -> Duration {
        Duration::from_secs(self.arcade.timeout_seconds)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds)
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            timeout: Duration::from_secs(self.authorization.timeout_seconds),
            poll_wait: Duration::from_secs(self.authorization.poll_wait_seconds),
            poll_interval: Duration::from_millis(self.authorization.poll_interval_ms),
        }
    }
}
