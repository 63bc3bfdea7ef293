// ABOUTME: Confirmation policy — the static set of tool names that need user approval.
// ABOUTME: Entries are exact tool names or glob patterns, compiled once at startup.

use glob::Pattern;

/// The set of tools that must be confirmed by the user before they run.
///
/// Built once from configuration and never mutated during a session.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationPolicy {
    names: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ConfirmationPolicy {
    /// Build a policy from configured entries.
    ///
    /// Entries containing glob metacharacters are compiled as patterns; an entry
    /// that fails to compile is kept as an exact name instead.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            if is_glob(entry) {
                if let Ok(pattern) = Pattern::new(entry) {
                    policy.patterns.push(pattern);
                    continue;
                }
                tracing::warn!(entry, "invalid confirmation pattern, matching it literally");
            }
            if !policy.names.iter().any(|n| n == entry) {
                policy.names.push(entry.to_string());
            }
        }
        policy
    }

    /// A policy that never asks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.patterns.is_empty()
    }

    /// Whether a call to `tool_name` must be confirmed first.
    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        self.names.iter().any(|n| n == tool_name)
            || self.patterns.iter().any(|p| p.matches(tool_name))
    }
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}
