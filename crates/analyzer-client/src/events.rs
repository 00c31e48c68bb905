//! Session events pushed to the presentation layer.

use serde::Serialize;
use tokio::sync::mpsc;

use analyzer_shared::types::{ChatId, Role};

/// State-change notifications a presentation layer subscribes to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum SessionEvent {
    /// A chat was created (and became the current selection).
    ChatCreated { chat_id: ChatId },
    /// A message was appended to `chat_id`, which is not necessarily the
    /// current chat, since replies land in their originating chat.
    MessageAppended { chat_id: ChatId, role: Role },
    /// The current selection changed.  `None` means the welcome screen.
    SelectionChanged { chat_id: Option<ChatId> },
}

/// Forward an event to the subscriber, if any.  A dropped receiver is
/// normal in headless use and only logged at debug level.
pub(crate) fn emit(tx: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) {
    if tx.send(event).is_err() {
        tracing::debug!("No event subscriber; dropping session event");
    }
}
