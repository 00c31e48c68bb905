//! # analyzer-client
//!
//! The session layer a presentation layer drives.  [`ChatSession`] wraps
//! the in-memory [`analyzer_store::ConversationStore`] behind an async
//! mutation API, runs the optimistic send flow against an injected
//! [`sender::MessageSender`], and pushes [`events::SessionEvent`]s over a
//! channel so the UI can re-render.
//!
//! Read-side calls (FAQ quick-start prompts, server-side history) live in
//! [`api`].

pub mod api;
pub mod events;
pub mod sender;
pub mod session;

pub use session::{ChatSession, SessionError};
