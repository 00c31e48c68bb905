//! JSON wire contract between the client and the backend API.
//!
//! Field names follow the backend exactly (`agent_type`, `chat_id`), so
//! these structs serialize to the payloads the HTTP endpoints expect.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{AgentType, Role};

/// One message as it crosses the wire: content and role only.
/// Identifiers and timestamps are client-local and never sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireMessage {
    pub content: String,
    pub role: Role,
}

/// Body of `POST /chat`: the transcript so far plus the agent persona
/// that should answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
    pub agent_type: AgentType,
}

/// Reply from `POST /chat`.  Only `message.content` feeds back into the
/// conversation; `chat_id` identifies the server-side log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: WireMessage,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// A quick-start question/answer pair from `GET /faq`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Body of `GET /faq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqResponse {
    pub faqs: Vec<FaqEntry>,
}

/// Body of `GET /history`: the server-side message log keyed by chat id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: HashMap<String, Vec<WireMessage>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_field_names() {
        let request = ChatRequest {
            messages: vec![WireMessage {
                content: "How many units are low on stock?".to_string(),
                role: Role::User,
            }],
            agent_type: AgentType::Chatbot,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["agent_type"], "chatbot");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "How many units are low on stock?");
    }

    #[test]
    fn test_chat_response_parses_backend_payload() {
        let body = r#"{
            "message": {"content": "Here is your summary.", "role": "assistant"},
            "chat_id": "temp-chat-id"
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.message.content, "Here is your summary.");
        assert_eq!(response.chat_id.as_deref(), Some("temp-chat-id"));
    }

    #[test]
    fn test_chat_response_chat_id_is_optional() {
        let body = r#"{"message": {"content": "ok", "role": "assistant"}}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(response.chat_id.is_none());
    }
}
