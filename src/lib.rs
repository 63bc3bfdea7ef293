// ABOUTME: Library root for calgate — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod agent;
pub mod app;
pub mod approval;
pub mod arcade;
pub mod auth;
pub mod chat;
pub mod config;
pub mod console;
pub mod llm;
pub mod prompt;
pub mod tools;
