// ABOUTME: Interactive chat loop — reads user turns, runs the agent, prints replies.
// ABOUTME: A declined tool call is turned into a short synthetic exchange so the chat can go on.

use crate::agent::{AgentRunner, TurnOutcome};
use crate::approval::ToolCallDenied;
use crate::console::Interaction;
use crate::llm::ChatMessage;

pub const USER_PROMPT: &str = "You: ";
pub const EXIT_COMMAND: &str = "exit";
pub const GOODBYE: &str = "Goodbye!";

/// Run the conversation until the user types `exit` or input ends.
///
/// Returns the final conversation history.
pub async fn run_chat(
    interaction: &dyn Interaction,
    runner: &AgentRunner,
) -> anyhow::Result<Vec<ChatMessage>> {
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        let Some(line) = interaction.read_line(USER_PROMPT).await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        history.push(ChatMessage::user(input));
        match runner.run_turn(&history).await {
            Ok(TurnOutcome::Completed {
                history: updated,
                reply,
            }) => {
                history = updated;
                interaction.notify(&reply).await?;
            }
            Ok(TurnOutcome::Denied(denied)) => {
                let reply = record_denial(&mut history, &denied);
                interaction.notify(&reply).await?;
            }
            Err(failed) => {
                tracing::error!(error = %failed, "turn failed");
                if failed.history.len() > history.len() {
                    // Tools already ran; the model must see them next turn.
                    history = failed.history;
                } else {
                    history.pop();
                }
                interaction.notify(&format!("Error: {:#}", failed.error)).await?;
            }
        }
    }

    interaction.notify(GOODBYE).await?;
    Ok(history)
}

/// Append the exchange that acknowledges a declined call. Returns the final reply.
pub fn record_denial(history: &mut Vec<ChatMessage>, denied: &ToolCallDenied) -> String {
    let tool = &denied.tool_name;
    let reply = format!("Sure, I cancelled the call to {tool}. What else can I do for you today?");
    history.extend([
        ChatMessage::assistant(format!("Please confirm the call to {tool}")),
        ChatMessage::user("I changed my mind, please don't do it!"),
        ChatMessage::assistant(reply.clone()),
    ]);
    reply
}
