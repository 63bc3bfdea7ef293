// ABOUTME: Human-in-the-loop tool confirmation gate.
// ABOUTME: Confirmation policy, approval decisions, and the ToolInterceptor seam.

pub mod gate;
pub mod policy;
pub mod types;

pub use gate::*;
pub use policy::*;
pub use types::*;
