use thiserror::Error;

use analyzer_shared::types::ChatId;

/// Errors produced by the conversation store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// An operation addressed a chat id that is not in the store.
    #[error("Unknown chat: {0}")]
    UnknownChat(ChatId),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
