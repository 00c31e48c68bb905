//! Domain model structs for the in-memory conversation state.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use analyzer_shared::protocol::WireMessage;
use analyzer_shared::types::{AgentType, ChatId, MessageId, Role};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message.  Never edited or removed once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message text.  Emptiness is validated by the caller, not here.
    pub content: String,
    /// Who authored the message.
    pub role: Role,
    /// When the message was appended.  Non-decreasing within a chat.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Project down to the content/role pair the wire contract carries.
    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            content: self.content.clone(),
            role: self.role,
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// One conversation thread: an ordered, append-only message sequence and a
/// fixed agent persona.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: ChatId,
    /// Display label, assigned at creation.
    pub title: String,
    /// Backend persona this chat talks to.  Never changes after creation,
    /// even if the global selector does.
    pub agent_type: AgentType,
    /// Messages in insertion order.
    pub messages: Vec<Message>,
    /// When the chat was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the latest append.  Always `>= created_at`.
    pub last_updated: DateTime<Utc>,
}

impl Chat {
    /// The most recently appended message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The full transcript as wire messages, ready for a send request.
    pub fn transcript(&self) -> Vec<WireMessage> {
        self.messages.iter().map(Message::to_wire).collect()
    }
}
