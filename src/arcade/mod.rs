// ABOUTME: Arcade tool-provisioning service — trait seam, HTTP client, and wire types.
// ABOUTME: Lists toolkit tools, requests/polls authorization, and executes tools for a user.

pub mod client;
pub mod service;
pub mod types;

pub use client::*;
pub use service::*;
pub use types::*;
