// ABOUTME: Tool descriptors exposed to the chat model.
// ABOUTME: Tools come from the remote provisioning service; this crate only describes them.

pub mod spec;

pub use spec::*;
