//! The conversation store: chat and message lifecycle, current-chat
//! selection, and the transitions between the welcome screen and an
//! active chat.
//!
//! The store is a plain mutable value.  The session layer owns exactly one
//! instance and serializes every mutation through it, so no operation here
//! needs interior locking.

use chrono::Utc;
use tracing::{debug, info, warn};

use analyzer_shared::types::{AgentType, ChatId, MessageId, Role};

use crate::error::{Result, StoreError};
use crate::models::{Chat, Message};

/// Central conversation state.
///
/// Holds every chat of the session in insertion order, the current-chat
/// selection (`None` = welcome screen), and the agent type new chats are
/// created with.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    chats: Vec<Chat>,
    current_chat_id: Option<ChatId>,
    selected_agent_type: AgentType,
}

impl ConversationStore {
    /// Create an empty store: no chats, welcome screen, summary agent
    /// selected.
    pub fn new() -> Self {
        Self {
            chats: Vec::new(),
            current_chat_id: None,
            selected_agent_type: AgentType::Summary,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// All chats, oldest first.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Look up a chat by id.
    pub fn chat(&self, id: ChatId) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    /// The currently selected chat, or `None` on the welcome screen.
    pub fn current_chat(&self) -> Option<&Chat> {
        self.current_chat_id.and_then(|id| self.chat(id))
    }

    pub fn current_chat_id(&self) -> Option<ChatId> {
        self.current_chat_id
    }

    /// The agent type the next created chat will be fixed to.
    pub fn selected_agent_type(&self) -> AgentType {
        self.selected_agent_type
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Change the agent type used for future chats.  Existing chats,
    /// including the current one, keep the agent type they were created
    /// with.
    pub fn set_agent_type(&mut self, agent_type: AgentType) {
        self.selected_agent_type = agent_type;
    }

    /// Create an empty chat with the selected agent type and make it
    /// current.
    pub fn create_new_chat(&mut self) -> ChatId {
        let now = Utc::now();
        let chat = Chat {
            id: ChatId::new(),
            title: format!("New Chat {}", self.chats.len() + 1),
            agent_type: self.selected_agent_type,
            messages: Vec::new(),
            created_at: now,
            last_updated: now,
        };
        let id = chat.id;

        self.chats.push(chat);
        self.current_chat_id = Some(id);

        info!(chat = %id, agent = %self.selected_agent_type, "Created new chat");
        id
    }

    /// Append a message to the current chat.
    ///
    /// With no current chat this is a no-op: the message is dropped with a
    /// warning and `None` is returned.  The caller is expected to have
    /// validated non-emptiness already.
    pub fn add_message(&mut self, content: impl Into<String>, role: Role) -> Option<MessageId> {
        let Some(chat_id) = self.current_chat_id else {
            warn!("add_message called with no active chat; dropping message");
            return None;
        };

        // The selection invariant guarantees the id resolves.
        self.push_message(chat_id, content, role).ok()
    }

    /// Append a message to the chat identified by `chat_id`, wherever the
    /// current selection points.  Asynchronous reply resolution uses this so
    /// a reply always lands in its originating chat.
    pub fn push_message(
        &mut self,
        chat_id: ChatId,
        content: impl Into<String>,
        role: Role,
    ) -> Result<MessageId> {
        let chat = self
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or(StoreError::UnknownChat(chat_id))?;

        // Wall clock can step backwards; message order within a chat must not.
        let now = Utc::now().max(chat.last_updated);

        let message = Message {
            id: MessageId::new(),
            content: content.into(),
            role,
            timestamp: now,
        };
        let message_id = message.id;

        chat.messages.push(message);
        chat.last_updated = now;

        debug!(chat = %chat_id, msg = %message_id, %role, "Appended message");
        Ok(message_id)
    }

    /// Composite operation behind the "first message from the welcome
    /// screen" flow: create a chat, append the user's text, and answer it
    /// synchronously with the derived simulated reply.
    ///
    /// The new chat becomes current and is returned with exactly two
    /// messages in it.
    pub fn create_chat_with_message_and_response(&mut self, user_text: &str) -> ChatId {
        let chat_id = self.create_new_chat();

        // create_new_chat made chat_id current, so neither append can fail.
        let _ = self.push_message(chat_id, user_text, Role::User);
        let _ = self.push_message(chat_id, simulated_reply(user_text), Role::Assistant);

        chat_id
    }

    /// Select an existing chat.  An unknown id leaves the current selection
    /// untouched.
    pub fn select_chat(&mut self, chat_id: ChatId) {
        if self.chat(chat_id).is_some() {
            self.current_chat_id = Some(chat_id);
        } else {
            debug!(chat = %chat_id, "Ignoring selection of unknown chat");
        }
    }

    /// Clear the selection and return to the welcome screen.  No chat is
    /// deleted or modified.
    pub fn go_to_welcome_screen(&mut self) {
        self.current_chat_id = None;
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The client-side stand-in reply used before a backend answers for real.
pub fn simulated_reply(prompt: &str) -> String {
    format!("This is a simulated response to: \"{prompt}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_new_chat_is_empty_and_current() {
        let mut store = ConversationStore::new();
        assert!(store.current_chat().is_none());

        let id = store.create_new_chat();

        assert_eq!(store.chats().len(), 1);
        assert_eq!(store.current_chat_id(), Some(id));
        let chat = store.current_chat().unwrap();
        assert!(chat.messages.is_empty());
        assert!(chat.last_updated >= chat.created_at);
    }

    #[test]
    fn test_chat_ids_are_unique_and_count_grows_by_one() {
        let mut store = ConversationStore::new();
        let mut ids = Vec::new();
        for n in 1..=10 {
            ids.push(store.create_new_chat());
            assert_eq!(store.chats().len(), n);
        }
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_titles_are_sequential() {
        let mut store = ConversationStore::new();
        store.create_new_chat();
        store.create_new_chat();

        assert_eq!(store.chats()[0].title, "New Chat 1");
        assert_eq!(store.chats()[1].title, "New Chat 2");
    }

    #[test]
    fn test_add_message_without_current_chat_is_a_noop() {
        let mut store = ConversationStore::new();

        assert!(store.add_message("hello", Role::User).is_none());
        assert!(store.chats().is_empty());
        assert!(store.current_chat_id().is_none());
    }

    #[test]
    fn test_add_message_appends_and_bumps_last_updated() {
        let mut store = ConversationStore::new();
        store.create_new_chat();
        let before = store.current_chat().unwrap().last_updated;

        let id = store.add_message("first", Role::User);
        assert!(id.is_some());

        let chat = store.current_chat().unwrap();
        let last = chat.last_message().unwrap();
        assert_eq!(last.content, "first");
        assert_eq!(last.role, Role::User);
        assert!(chat.last_updated >= before);

        // The chat in the listing is the chat that was updated.
        assert_eq!(store.chats()[0].messages.len(), 1);
    }

    #[test]
    fn test_timestamps_non_decreasing_within_chat() {
        let mut store = ConversationStore::new();
        store.create_new_chat();
        for i in 0..20 {
            store.add_message(format!("message {i}"), Role::User);
        }

        let chat = store.current_chat().unwrap();
        for pair in chat.messages.windows(2) {
            assert!(pair[1].timestamp >= pair[0].timestamp);
        }
    }

    #[test]
    fn test_push_message_targets_non_current_chat() {
        let mut store = ConversationStore::new();
        let first = store.create_new_chat();
        let second = store.create_new_chat();
        assert_eq!(store.current_chat_id(), Some(second));

        store.push_message(first, "routed reply", Role::Assistant).unwrap();

        assert_eq!(store.chat(first).unwrap().messages.len(), 1);
        assert!(store.chat(second).unwrap().messages.is_empty());
        assert_eq!(store.current_chat_id(), Some(second));
    }

    #[test]
    fn test_push_message_unknown_chat_fails() {
        let mut store = ConversationStore::new();
        store.create_new_chat();

        let result = store.push_message(ChatId::new(), "lost", Role::Assistant);
        assert!(matches!(result, Err(StoreError::UnknownChat(_))));
    }

    #[test]
    fn test_select_chat_unknown_id_preserves_selection() {
        let mut store = ConversationStore::new();
        let id = store.create_new_chat();

        store.select_chat(ChatId::new());
        assert_eq!(store.current_chat_id(), Some(id));
    }

    #[test]
    fn test_welcome_roundtrip_restores_selection() {
        let mut store = ConversationStore::new();
        let id = store.create_new_chat();

        store.go_to_welcome_screen();
        assert!(store.current_chat_id().is_none());
        assert_eq!(store.chats().len(), 1);

        store.select_chat(id);
        assert_eq!(store.current_chat_id(), Some(id));
        assert!(store.current_chat().unwrap().messages.is_empty());
    }

    #[test]
    fn test_agent_type_fixed_at_creation() {
        let mut store = ConversationStore::new();
        store.set_agent_type(AgentType::Chatbot);
        let id = store.create_new_chat();
        assert_eq!(store.chat(id).unwrap().agent_type, AgentType::Chatbot);

        store.set_agent_type(AgentType::Summary);
        assert_eq!(store.chat(id).unwrap().agent_type, AgentType::Chatbot);
        assert_eq!(store.selected_agent_type(), AgentType::Summary);
    }

    #[test]
    fn test_create_chat_with_message_and_response() {
        let mut store = ConversationStore::new();
        let id = store.create_chat_with_message_and_response("What is the weather in Tokyo?");

        assert_eq!(store.chats().len(), 1);
        assert_eq!(store.current_chat_id(), Some(id));

        let chat = store.current_chat().unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, Role::User);
        assert_eq!(chat.messages[0].content, "What is the weather in Tokyo?");
        assert_eq!(chat.messages[1].role, Role::Assistant);
        assert_eq!(
            chat.messages[1].content,
            "This is a simulated response to: \"What is the weather in Tokyo?\""
        );
    }
}
