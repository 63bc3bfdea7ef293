// ABOUTME: Chat model seam — the language-model runtime the agent talks to.
// ABOUTME: ChatModel trait, message types, and an OpenAI-compatible client.

pub mod openai;
pub mod types;

use async_trait::async_trait;

pub use openai::OpenAiChat;
pub use types::*;

use crate::tools::ToolSpec;

/// A language model that answers a conversation, possibly by requesting tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> anyhow::Result<ChatMessage>;
}
