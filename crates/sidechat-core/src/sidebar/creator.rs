//! Conversation creation
//!
//! A new conversation is written only when the target identity is a valid
//! email, the user's list has loaded, no loaded conversation already
//! includes the target, and the target is not the user. The duplicate scan
//! and the write are separate steps: two clients acting at once can still
//! both create a conversation for the same pair.

use super::email::is_valid_email;
use super::list::ListState;
use crate::config::SidebarSettings;
use crate::error::Result;
use crate::store::DocumentStore;
use crate::types::{CurrentUser, DocumentRef, FieldMap, Participants};
use std::sync::Arc;
use tracing::{debug, info};

/// Why a new-chat input was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidEmail,
    ListLoading,
    AlreadyExists,
    SelfConversation,
}

/// Result of a new-chat attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Prompt dismissed or left empty
    Cancelled,
    Rejected(RejectReason),
    Created(DocumentRef),
}

pub struct ConversationCreator {
    store: Arc<dyn DocumentStore>,
    collection: String,
    participants_field: String,
}

impl ConversationCreator {
    pub fn new(store: Arc<dyn DocumentStore>, settings: &SidebarSettings) -> Self {
        Self {
            store,
            collection: settings.collection.clone(),
            participants_field: settings.participants_field.clone(),
        }
    }

    /// Check `input` against the loaded list and create the conversation
    pub async fn create(
        &self,
        user: &CurrentUser,
        list: &ListState,
        input: Option<&str>,
    ) -> Result<CreateOutcome> {
        let target = match input {
            Some(target) if !target.is_empty() => target,
            _ => return Ok(CreateOutcome::Cancelled),
        };

        if let Some(reason) = Self::check(user, list, target) {
            debug!("Refusing conversation with {}: {:?}", target, reason);
            return Ok(CreateOutcome::Rejected(reason));
        }

        let mut fields = FieldMap::new();
        fields.insert(
            self.participants_field.clone(),
            Participants::pair(user.email.as_str(), target).to_value(),
        );

        let doc_ref = self.store.add(&self.collection, fields).await?;
        info!("Created conversation {} with {}", doc_ref.id, target);

        Ok(CreateOutcome::Created(doc_ref))
    }

    fn check(user: &CurrentUser, list: &ListState, target: &str) -> Option<RejectReason> {
        if !is_valid_email(target) {
            Some(RejectReason::InvalidEmail)
        } else if list.is_loading() {
            Some(RejectReason::ListLoading)
        } else if list.has_participant(target) {
            Some(RejectReason::AlreadyExists)
        } else if target == user.email {
            Some(RejectReason::SelfConversation)
        } else {
            None
        }
    }
}
