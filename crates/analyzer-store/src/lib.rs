//! # analyzer-store
//!
//! In-memory conversation state for the Inventory Analyzer AI session.
//!
//! The crate owns the collection of chats, the current-chat selection, and
//! the selected agent type, and exposes every mutating operation the
//! presentation layer drives: create chat, append message, select chat,
//! switch agent type, return to the welcome screen.  Nothing here is
//! persisted; the state lives and dies with the session.

pub mod conversations;
pub mod models;

mod error;

pub use conversations::ConversationStore;
pub use error::StoreError;
pub use models::*;
