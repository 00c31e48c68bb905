//! # analyzer-shared
//!
//! Types shared between the Inventory Analyzer AI crates: domain
//! identifiers, the agent/role enums, the HTTP wire contract spoken
//! between client and server, and application-wide constants.

pub mod constants;
pub mod protocol;
pub mod types;
