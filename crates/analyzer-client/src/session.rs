//! The chat session: the conversation store behind an async mutation API,
//! plus the optimistic send flow.
//!
//! A submit appends the user's message synchronously, locks the chat, and
//! dispatches the [`MessageSender`] in a spawned task.  Resolution routes
//! the reply by the originating chat id, never by whatever chat happens to
//! be selected when it arrives, so switching chats (or returning to the
//! welcome screen) mid-flight cannot misplace a reply.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use analyzer_shared::constants::SEND_ERROR_TEXT;
use analyzer_shared::types::{AgentType, ChatId, Role};
use analyzer_store::ConversationStore;

use crate::events::{emit, SessionEvent};
use crate::sender::MessageSender;

/// Errors surfaced to the caller of [`ChatSession::submit`].  All of them
/// leave the session state exactly as it was.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Empty or whitespace-only input; rejected before reaching the store.
    #[error("Message is empty")]
    EmptyMessage,

    /// A reply is still outstanding for this chat; one send at a time.
    #[error("A reply is still outstanding for chat {0}")]
    ReplyOutstanding(ChatId),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] analyzer_store::StoreError),
}

struct SessionInner {
    store: ConversationStore,
    /// Chats with a send in flight.  Membership is the `AwaitingReply`
    /// state of the send flow; absence is `Idle`.
    pending: HashSet<ChatId>,
}

/// One user session.  Created once, shared by reference with every UI
/// handler; all mutations are serialized through the inner lock.
pub struct ChatSession {
    inner: Arc<Mutex<SessionInner>>,
    sender: Arc<dyn MessageSender>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChatSession {
    /// Create a session around the given sender.  Returns the session and
    /// the receiving end of its event stream.
    pub fn new(sender: Arc<dyn MessageSender>) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = Self {
            inner: Arc::new(Mutex::new(SessionInner {
                store: ConversationStore::new(),
                pending: HashSet::new(),
            })),
            sender,
            events_tx,
        };
        (session, events_rx)
    }

    /// Read access to the store for rendering.
    pub async fn with_store<R>(&self, f: impl FnOnce(&ConversationStore) -> R) -> R {
        let inner = self.inner.lock().await;
        f(&inner.store)
    }

    /// Whether a send is outstanding for `chat_id` (the UI input lock).
    pub async fn is_awaiting_reply(&self, chat_id: ChatId) -> bool {
        self.inner.lock().await.pending.contains(&chat_id)
    }

    /// Change the agent type used for future chats.
    pub async fn set_agent_type(&self, agent_type: AgentType) {
        self.inner.lock().await.store.set_agent_type(agent_type);
    }

    /// Create an empty chat and select it.
    pub async fn create_new_chat(&self) -> ChatId {
        let chat_id = {
            let mut inner = self.inner.lock().await;
            inner.store.create_new_chat()
        };
        emit(&self.events_tx, SessionEvent::ChatCreated { chat_id });
        chat_id
    }

    /// Composite "first message from the welcome screen" flow with the
    /// synchronous simulated reply.
    pub async fn create_chat_with_message_and_response(&self, user_text: &str) -> ChatId {
        let chat_id = {
            let mut inner = self.inner.lock().await;
            inner.store.create_chat_with_message_and_response(user_text)
        };

        emit(&self.events_tx, SessionEvent::ChatCreated { chat_id });
        emit(
            &self.events_tx,
            SessionEvent::MessageAppended { chat_id, role: Role::User },
        );
        emit(
            &self.events_tx,
            SessionEvent::MessageAppended { chat_id, role: Role::Assistant },
        );
        chat_id
    }

    /// Select an existing chat.  Unknown ids are ignored.
    pub async fn select_chat(&self, chat_id: ChatId) {
        let (before, after) = {
            let mut inner = self.inner.lock().await;
            let before = inner.store.current_chat_id();
            inner.store.select_chat(chat_id);
            (before, inner.store.current_chat_id())
        };
        if before != after {
            emit(&self.events_tx, SessionEvent::SelectionChanged { chat_id: after });
        }
    }

    /// Clear the selection and return to the welcome screen.
    pub async fn go_to_welcome_screen(&self) {
        let changed = {
            let mut inner = self.inner.lock().await;
            let had_selection = inner.store.current_chat_id().is_some();
            inner.store.go_to_welcome_screen();
            had_selection
        };
        if changed {
            emit(&self.events_tx, SessionEvent::SelectionChanged { chat_id: None });
        }
    }

    /// Submit text from the input box.
    ///
    /// Trims the input and rejects it if empty.  Targets the current chat,
    /// synthesizing one when the user submits from the welcome screen.  The
    /// user message is appended before this function returns; the reply
    /// arrives later through the spawned send task.  While the reply is
    /// outstanding the chat is locked against further submits.
    ///
    /// A failed send never propagates: the fixed error text is appended as
    /// an assistant message and the chat unlocks again.
    pub async fn submit(&self, text: &str) -> Result<ChatId, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let (chat_id, created, transcript, agent_type) = {
            let mut inner = self.inner.lock().await;

            let (chat_id, created) = match inner.store.current_chat_id() {
                Some(id) => {
                    if inner.pending.contains(&id) {
                        return Err(SessionError::ReplyOutstanding(id));
                    }
                    (id, false)
                }
                None => (inner.store.create_new_chat(), true),
            };

            // Optimistic append: the user message is visible before any
            // reply exists.
            inner.store.push_message(chat_id, text, Role::User)?;

            let chat = inner
                .store
                .chat(chat_id)
                .ok_or(analyzer_store::StoreError::UnknownChat(chat_id))?;
            let transcript = chat.transcript();
            let agent_type = chat.agent_type;

            inner.pending.insert(chat_id);
            (chat_id, created, transcript, agent_type)
        };

        if created {
            emit(&self.events_tx, SessionEvent::ChatCreated { chat_id });
        }
        emit(
            &self.events_tx,
            SessionEvent::MessageAppended { chat_id, role: Role::User },
        );

        info!(chat = %chat_id, agent = %agent_type, "Dispatching send");

        let sender = Arc::clone(&self.sender);
        let inner = Arc::clone(&self.inner);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let reply = match sender.send(&transcript, agent_type).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(chat = %chat_id, error = %e, "Send failed; injecting error reply");
                    SEND_ERROR_TEXT.to_string()
                }
            };

            let mut inner = inner.lock().await;
            inner.pending.remove(&chat_id);

            // Route by originating chat id; the current selection may have
            // moved on while the send was in flight.
            match inner.store.push_message(chat_id, reply, Role::Assistant) {
                Ok(_) => emit(
                    &events_tx,
                    SessionEvent::MessageAppended { chat_id, role: Role::Assistant },
                ),
                Err(e) => warn!(chat = %chat_id, error = %e, "Dropping reply for vanished chat"),
            }
        });

        Ok(chat_id)
    }
}
