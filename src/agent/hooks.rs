// ABOUTME: Agent lifecycle hooks — called around each turn and each executed tool.
// ABOUTME: LoggingHooks numbers every event and reports it through tracing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

/// Observe the agent as it works. Every method defaults to a no-op.
#[async_trait]
pub trait RunHooks: Send + Sync {
    /// A conversation turn is starting.
    async fn on_agent_start(&self, _agent: &str) {}

    /// A conversation turn produced its final answer.
    async fn on_agent_end(&self, _agent: &str, _output: &str) {}

    /// A tool passed the gate and is about to run.
    async fn on_tool_start(&self, _agent: &str, _tool_name: &str) {}

    /// A tool finished running.
    async fn on_tool_end(&self, _agent: &str, _tool_name: &str, _result: &str) {}
}

/// Hooks that do nothing.
pub struct NoHooks;

#[async_trait]
impl RunHooks for NoHooks {}

/// Hooks that log each lifecycle event with a running counter.
pub struct LoggingHooks {
    display_name: String,
    event_counter: AtomicUsize,
}

impl LoggingHooks {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            event_counter: AtomicUsize::new(0),
        }
    }

    fn next_event(&self) -> usize {
        self.event_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of events seen so far.
    pub fn event_count(&self) -> usize {
        self.event_counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RunHooks for LoggingHooks {
    async fn on_agent_start(&self, agent: &str) {
        let event = self.next_event();
        tracing::debug!(hooks = %self.display_name, event, agent, "agent started");
    }

    async fn on_agent_end(&self, agent: &str, output: &str) {
        let event = self.next_event();
        tracing::debug!(
            hooks = %self.display_name,
            event,
            agent,
            output_len = output.len(),
            "agent ended"
        );
    }

    async fn on_tool_start(&self, agent: &str, tool_name: &str) {
        let event = self.next_event();
        tracing::info!(hooks = %self.display_name, event, agent, tool = tool_name, "tool started");
    }

    async fn on_tool_end(&self, agent: &str, tool_name: &str, result: &str) {
        let event = self.next_event();
        tracing::info!(
            hooks = %self.display_name,
            event,
            agent,
            tool = tool_name,
            result_len = result.len(),
            "tool ended"
        );
    }
}
