// ABOUTME: Tool authorization against the provisioning service's identity layer.
// ABOUTME: Every tool is authorized once per run, with a bounded wait for the user.

pub mod flow;
pub mod types;

pub use flow::*;
pub use types::*;
