// ABOUTME: Agent module — conversation-turn runner and lifecycle hooks.
// ABOUTME: Dispatches model tool calls through the confirmation gate to the provisioning service.

pub mod hooks;
pub mod runner;

pub use hooks::*;
pub use runner::*;
