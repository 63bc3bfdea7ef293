// ABOUTME: Layered system prompt builder — assistant, workflows, today's date, and a local override.
// ABOUTME: Compiles defaults from src/prompts/*.md, supports file-based overrides.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Compiled-in default prompt layers.
const DEFAULT_ASSISTANT: &str = include_str!("prompts/assistant.md");
const DEFAULT_WORKFLOWS: &str = include_str!("prompts/workflows.md");

/// Name of the per-directory prompt file.
pub const LOCAL_PROMPT_FILE: &str = ".calgate.md";

/// Reads a file if it exists, returning None otherwise.
pub fn read_if_exists(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read prompt file");
            None
        }
    }
}

/// Assembles the system prompt from layered sources. The assistant and
/// workflows layers can be replaced by files in `~/.calgate/`; a `.calgate.md`
/// in the working directory is appended.
#[derive(Debug, Clone)]
pub struct SystemPromptBuilder {
    pub assistant: String,
    pub workflows: String,
    pub today: Option<NaiveDate>,
    pub local: Option<String>,
}

impl SystemPromptBuilder {
    /// Creates a new builder loaded with the compiled-in defaults.
    pub fn new() -> Self {
        Self {
            assistant: DEFAULT_ASSISTANT.to_string(),
            workflows: DEFAULT_WORKFLOWS.to_string(),
            today: None,
            local: None,
        }
    }

    /// Replace layers with `assistant.md` / `workflows.md` from `dir` when present.
    pub fn load_overrides(&mut self, dir: &Path) -> &mut Self {
        if let Some(content) = read_if_exists(&dir.join("assistant.md")) {
            self.assistant = content;
        }
        if let Some(content) = read_if_exists(&dir.join("workflows.md")) {
            self.workflows = content;
        }
        self
    }

    /// Checks for `.calgate.md` in the current working directory and sets `local`.
    pub fn load_local(&mut self) -> &mut Self {
        self.local = read_if_exists(&PathBuf::from(LOCAL_PROMPT_FILE));
        self
    }

    /// Tell the model what day it is; relative dates depend on it.
    pub fn with_today(&mut self, today: NaiveDate) -> &mut Self {
        self.today = Some(today);
        self
    }

    /// Concatenates all non-empty layers separated by `"\n\n"`.
    pub fn build(&self) -> String {
        let date = self
            .today
            .map(|d| format!("Today is {}.", d.format("%A, %Y-%m-%d")));

        [
            Some(self.assistant.as_str()),
            Some(self.workflows.as_str()),
            date.as_deref(),
            self.local.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

impl Default for SystemPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
