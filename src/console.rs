// ABOUTME: Line-based interaction channel — conversation input, yes/no prompts, and notices.
// ABOUTME: The Interaction trait is the seam the gate and authorization flow talk through.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// The user-facing surface of a session.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Show `prompt` and read one line. Returns `None` at end of input.
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>>;

    /// Ask a yes/no question. Only an explicit yes counts as approval.
    async fn confirm(&self, question: &str) -> io::Result<bool>;

    /// Show a message to the user.
    async fn notify(&self, message: &str) -> io::Result<()>;
}

type Reader = Box<dyn AsyncBufRead + Send + Unpin>;
type Writer = Box<dyn AsyncWrite + Send + Unpin>;

/// An [`Interaction`] over an async reader/writer pair.
pub struct Console {
    input: Mutex<Reader>,
    output: Mutex<Writer>,
}

impl Console {
    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Console bound to the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }

    async fn write(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.flush().await
    }
}

#[async_trait]
impl Interaction for Console {
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        self.write(prompt).await?;
        let mut buf = Vec::new();
        let read = self.input.lock().await.read_until(b'\n', &mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        // Terminals in a non-UTF-8 locale must not end the session.
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn confirm(&self, question: &str) -> io::Result<bool> {
        let answer = self.read_line(&format!("{question} [y/N]: ")).await?;
        Ok(answer.as_deref().is_some_and(is_yes))
    }

    async fn notify(&self, message: &str) -> io::Result<()> {
        self.write(&format!("{message}\n")).await
    }
}

/// Whether an answer counts as "yes".
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
