//! Core type definitions for SideChat
//!
//! Shared types used across the crate: store documents and queries,
//! conversations, and the signed-in user.

mod conversation_types;
mod document_types;
mod user_types;

pub use conversation_types::*;
pub use document_types::*;
pub use user_types::*;
