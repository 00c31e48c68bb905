//! Read-side API calls: FAQ quick-start prompts and server-side history.

use thiserror::Error;
use tracing::warn;

use analyzer_shared::protocol::{FaqEntry, FaqResponse, HistoryResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Fetch the FAQ list used for the welcome-screen prompt grid.
///
/// The endpoint being unreachable must never leave the grid empty, so any
/// failure falls back to the fixed built-in set.
pub async fn fetch_faqs(client: &reqwest::Client, base_url: &str) -> Vec<FaqEntry> {
    match try_fetch_faqs(client, base_url).await {
        Ok(faqs) => faqs,
        Err(e) => {
            warn!(error = %e, "FAQ fetch failed; using fallback set");
            fallback_faqs()
        }
    }
}

async fn try_fetch_faqs(client: &reqwest::Client, base_url: &str) -> Result<Vec<FaqEntry>, ApiError> {
    let response = client.get(format!("{base_url}/faq")).send().await?;
    if !response.status().is_success() {
        return Err(ApiError::Status(response.status()));
    }
    let body: FaqResponse = response.json().await?;
    Ok(body.faqs)
}

/// The built-in prompt set shown when the FAQ endpoint is unavailable.
pub fn fallback_faqs() -> Vec<FaqEntry> {
    [
        (
            "What can Inventory Analyzer AI do?",
            "Inventory Analyzer AI helps you analyze and understand your inventory data through natural language conversations.",
        ),
        (
            "How do I start a new chat?",
            "Click on the \"New Chat\" button in the header to start a new conversation.",
        ),
        (
            "What are the different agent types?",
            "We offer two agent types: Summary Agent for condensed analysis and Chatbot Agent for detailed conversations.",
        ),
        (
            "Can I see my chat history?",
            "Yes, all your previous chats are stored in the sidebar for easy access.",
        ),
    ]
    .into_iter()
    .map(|(question, answer)| FaqEntry {
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

/// Fetch the server-side message log, optionally narrowed to one chat.
pub async fn fetch_history(
    client: &reqwest::Client,
    base_url: &str,
    chat_id: Option<&str>,
) -> Result<HistoryResponse, ApiError> {
    let url = match chat_id {
        Some(id) => format!("{base_url}/history?chat_id={id}"),
        None => format!("{base_url}/history"),
    };

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ApiError::Status(response.status()));
    }
    Ok(response.json().await?)
}
