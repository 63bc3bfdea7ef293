// ABOUTME: Tool-invocation gate — intercepts tool calls and asks the user before flagged ones run.
// ABOUTME: ToolInterceptor is the injection point; ConfirmationGate and PassThrough implement it.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use super::{
    policy::ConfirmationPolicy,
    types::{ApprovalDecision, GateOutcome, ToolCallDenied},
};
use crate::console::Interaction;

/// The underlying invocation of a tool, run with the call's arguments.
pub type Next<'a> = Box<dyn FnOnce(Value) -> BoxFuture<'a, anyhow::Result<Value>> + Send + 'a>;

/// Wraps a tool's invocation. The agent runner routes every tool call through one of these.
#[async_trait]
pub trait ToolInterceptor: Send + Sync {
    /// Decide whether and how `next` runs for this call.
    ///
    /// Errors from `next` are returned unchanged; a refusal is `GateOutcome::Denied`.
    async fn intercept<'a>(
        &self,
        tool_name: &str,
        args: Value,
        next: Next<'a>,
    ) -> anyhow::Result<GateOutcome>;
}

/// Interceptor that asks for confirmation on tools matched by the policy.
pub struct ConfirmationGate {
    policy: ConfirmationPolicy,
    interaction: Arc<dyn Interaction>,
}

impl ConfirmationGate {
    pub fn new(policy: ConfirmationPolicy, interaction: Arc<dyn Interaction>) -> Self {
        Self {
            policy,
            interaction,
        }
    }
}

#[async_trait]
impl ToolInterceptor for ConfirmationGate {
    async fn intercept<'a>(
        &self,
        tool_name: &str,
        args: Value,
        next: Next<'a>,
    ) -> anyhow::Result<GateOutcome> {
        if !self.policy.requires_confirmation(tool_name) {
            tracing::debug!(tool = tool_name, "tool not flagged, executing");
            return Ok(GateOutcome::Executed(next(args).await?));
        }
        confirm_tool_usage(self.interaction.as_ref(), tool_name, args, next).await
    }
}

/// Interceptor that runs every call directly.
pub struct PassThrough;

#[async_trait]
impl ToolInterceptor for PassThrough {
    async fn intercept<'a>(
        &self,
        _tool_name: &str,
        args: Value,
        next: Next<'a>,
    ) -> anyhow::Result<GateOutcome> {
        Ok(GateOutcome::Executed(next(args).await?))
    }
}

/// Show the pending call, wait for the user's answer, and run `next` only if approved.
///
/// The call is suspended until the user answers. A decline never invokes `next`.
pub async fn confirm_tool_usage<'a>(
    interaction: &dyn Interaction,
    tool_name: &str,
    args: Value,
    next: Next<'a>,
) -> anyhow::Result<GateOutcome> {
    interaction
        .notify(&format!(
            "Tool call requires confirmation: {tool_name}\n{}",
            summarize_args(&args)
        ))
        .await?;
    let answer = interaction.confirm("Do you approve this tool call?").await?;

    match ApprovalDecision::from_answer(answer) {
        ApprovalDecision::Approve => {
            tracing::info!(tool = tool_name, "tool call approved");
            Ok(GateOutcome::Executed(next(args).await?))
        }
        ApprovalDecision::Decline => {
            tracing::info!(tool = tool_name, "tool call declined");
            Ok(GateOutcome::Denied(ToolCallDenied::new(tool_name)))
        }
    }
}

const MAX_VALUE_CHARS: usize = 80;

/// Format arguments for display, one `key: value` line per top-level field.
pub fn summarize_args(args: &Value) -> String {
    match args {
        Value::Object(map) if map.is_empty() => "  (no arguments)".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("  {key}: {}", truncate(&display_value(value))))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("  {}", truncate(&display_value(other))),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str) -> String {
    let truncated: String = s.chars().take(MAX_VALUE_CHARS).collect();
    if truncated.len() < s.len() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use serde_json::json;

    /// Answers confirmations from a script and records what was shown.
    #[derive(Default)]
    struct Scripted {
        answers: Mutex<VecDeque<bool>>,
        questions: AtomicUsize,
        notices: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn answering(answers: &[bool]) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.iter().copied().collect()),
                ..Self::default()
            })
        }
    }

    #[async_trait]
    impl Interaction for Scripted {
        async fn read_line(&self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(None)
        }

        async fn confirm(&self, _question: &str) -> io::Result<bool> {
            self.questions.fetch_add(1, Ordering::SeqCst);
            Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
        }

        async fn notify(&self, message: &str) -> io::Result<()> {
            self.notices.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn counting_next<'a>(calls: &'a AtomicUsize, result: Value) -> Next<'a> {
        Box::new(move |args| {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({ "result": result, "args": args }))
            }
            .boxed()
        })
    }

    fn gate(policy: &[&str], interaction: Arc<Scripted>) -> ConfirmationGate {
        ConfirmationGate::new(ConfirmationPolicy::new(policy.iter().copied()), interaction)
    }

    #[tokio::test]
    async fn unflagged_tool_runs_once_without_prompt() {
        let interaction = Scripted::answering(&[]);
        let gate = gate(&["DeleteEvent"], interaction.clone());
        let calls = AtomicUsize::new(0);

        let outcome = gate
            .intercept("CreateEvent", json!({"title": "x"}), counting_next(&calls, json!("created")))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcome,
            GateOutcome::Executed(json!({"result": "created", "args": {"title": "x"}}))
        );
        assert_eq!(interaction.questions.load(Ordering::SeqCst), 0);
        assert!(interaction.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn approved_tool_runs_with_original_args() {
        let interaction = Scripted::answering(&[true]);
        let gate = gate(&["DeleteEvent"], interaction.clone());
        let calls = AtomicUsize::new(0);
        let args = json!({"event_id": "abc123"});

        let outcome = gate
            .intercept("DeleteEvent", args.clone(), counting_next(&calls, json!("deleted")))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcome,
            GateOutcome::Executed(json!({"result": "deleted", "args": args}))
        );
        assert_eq!(interaction.questions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn declined_tool_never_runs() {
        let interaction = Scripted::answering(&[false]);
        let gate = gate(&["DeleteEvent"], interaction.clone());
        let calls = AtomicUsize::new(0);

        let outcome = gate
            .intercept("DeleteEvent", json!({}), counting_next(&calls, json!("deleted")))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome, GateOutcome::Denied(ToolCallDenied::new("DeleteEvent")));
    }

    #[tokio::test]
    async fn prompt_shows_tool_name_and_arguments() {
        let interaction = Scripted::answering(&[false]);
        let gate = gate(&["DeleteEvent"], interaction.clone());
        let calls = AtomicUsize::new(0);

        gate.intercept(
            "DeleteEvent",
            json!({"event_id": "abc123"}),
            counting_next(&calls, Value::Null),
        )
        .await
        .unwrap();

        let notices = interaction.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("DeleteEvent"));
        assert!(notices[0].contains("event_id: abc123"));
    }

    #[tokio::test]
    async fn errors_from_the_tool_propagate() {
        let interaction = Scripted::answering(&[true]);
        let gate = gate(&["DeleteEvent"], interaction);
        let next: Next<'_> = Box::new(|_args| {
            async { Err::<Value, _>(anyhow::anyhow!("service unavailable")) }.boxed()
        });

        let err = gate.intercept("DeleteEvent", json!({}), next).await.unwrap_err();
        assert_eq!(err.to_string(), "service unavailable");
    }

    #[tokio::test]
    async fn pass_through_never_asks() {
        let calls = AtomicUsize::new(0);
        let outcome = PassThrough
            .intercept("DeleteEvent", json!({}), counting_next(&calls, json!(1)))
            .await
            .unwrap();
        assert!(!outcome.is_denied());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn summarize_args_lists_fields() {
        let summary = summarize_args(&json!({"title": "Standup", "attendees": ["a@b.c"]}));
        assert!(summary.contains("  title: Standup"));
        assert!(summary.contains(r#"  attendees: ["a@b.c"]"#));
    }

    #[test]
    fn summarize_args_truncates_long_values() {
        let long = "x".repeat(200);
        let summary = summarize_args(&json!({ "description": long }));
        assert!(summary.ends_with("..."));
        assert!(summary.len() <= "  description: ".len() + MAX_VALUE_CHARS + 3);
    }

    #[test]
    fn summarize_args_handles_empty_object() {
        assert_eq!(summarize_args(&json!({})), "  (no arguments)");
    }
}
