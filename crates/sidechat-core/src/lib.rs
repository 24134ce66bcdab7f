//! SideChat Core Library
//!
//! This crate provides the logic behind the SideChat conversation sidebar:
//! - A document store with live queries (SQLite-backed `Storage`)
//! - The conversation list reader and conversation creator
//! - The `Sidebar` controller and the collaborator traits it is wired with
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     sidechat-core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  auth/         - AuthProvider, in-process session           │
//! │  store/        - DocumentStore, live queries, SQLite        │
//! │  sidebar/      - list reader, creator, Sidebar controller   │
//! │  types/        - Shared type definitions                    │
//! │  config.rs     - Sidebar settings                           │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod sidebar;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

pub use auth::{AuthProvider, LocalSession};
pub use config::{default_config_path, SidebarSettings};

pub use sidebar::{
    is_valid_email, ConversationCreator, ConversationListReader, CreateOutcome, HeaderView,
    ListState, Navigator, Notifier, Prompter, RejectReason, RowRenderer, Sidebar, SidebarBody,
    SidebarDeps, SidebarView,
};

pub use store::{DocumentStore, LiveQuery, LiveQueryHub, Storage};
