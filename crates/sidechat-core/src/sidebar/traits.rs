//! UI collaborators of the sidebar
//!
//! The sidebar never draws or routes itself. The host supplies these.

use crate::types::ConversationRow;
use async_trait::async_trait;

/// Blocking text prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask the user for a line of text. `None` means the prompt was dismissed.
    async fn prompt(&self, message: &str) -> Option<String>;
}

/// Blocking user-visible notice
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn alert(&self, message: &str);
}

/// Route changes
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Draws one conversation row
#[cfg_attr(test, mockall::automock)]
pub trait RowRenderer {
    fn render_row(&self, row: &ConversationRow);
}
