//! The asynchronous message-sending collaborator.
//!
//! A [`MessageSender`] takes the transcript so far plus the chat's agent
//! type and produces one assistant reply.  The session layer never cares
//! which implementation answers: the HTTP backend or the local timer-driven
//! stand-in.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use analyzer_shared::protocol::{ChatRequest, ChatResponse, WireMessage};
use analyzer_shared::types::{AgentType, Role};
use analyzer_store::conversations::simulated_reply;

/// Errors a send can fail with.  The session absorbs all of them into the
/// fixed error reply; the variants exist for diagnostics.
#[derive(Error, Debug)]
pub enum SendError {
    /// Transport-level failure (connect, timeout, malformed body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned status {0}")]
    Status(reqwest::StatusCode),
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send the transcript and return the assistant's reply content.
    async fn send(
        &self,
        messages: &[WireMessage],
        agent_type: AgentType,
    ) -> Result<String, SendError>;
}

/// Sender backed by the real backend: `POST {base_url}/chat`.
pub struct HttpMessageSender {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMessageSender {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MessageSender for HttpMessageSender {
    async fn send(
        &self,
        messages: &[WireMessage],
        agent_type: AgentType,
    ) -> Result<String, SendError> {
        let request = ChatRequest {
            messages: messages.to_vec(),
            agent_type,
        };

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SendError::Status(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.message.content)
    }
}

/// Timer-driven stand-in used when no backend is wired up: waits out a
/// fixed delay, then echoes the last user message as a derived reply.
pub struct SimulatedMessageSender {
    pub delay: Duration,
}

impl SimulatedMessageSender {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedMessageSender {
    fn default() -> Self {
        // Matches the one-second reply timer of the original UI.
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl MessageSender for SimulatedMessageSender {
    async fn send(
        &self,
        messages: &[WireMessage],
        _agent_type: AgentType,
    ) -> Result<String, SendError> {
        tokio::time::sleep(self.delay).await;

        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(simulated_reply(prompt))
    }
}
