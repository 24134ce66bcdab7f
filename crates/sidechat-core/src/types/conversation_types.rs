//! Conversation and sidebar row types

use super::{CurrentUser, Document, DocumentId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Participant identities of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participants(Vec<String>);

impl Participants {
    /// The two-party set written when a conversation is created
    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self(vec![first.into(), second.into()])
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.0.iter().any(|p| p == identity)
    }

    /// Participants other than `identity`
    pub fn others<'a>(&'a self, identity: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .map(String::as_str)
            .filter(move |p| *p != identity)
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn to_value(&self) -> Value {
        Value::from(self.0.clone())
    }
}

/// A conversation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: DocumentId,
    pub participants: Participants,
}

impl Conversation {
    /// Decode a conversation from a stored document.
    ///
    /// `field` names the participants array. Returns a reason string when
    /// the document does not carry a usable participant list.
    pub fn from_document(doc: &Document, field: &str) -> Result<Self, String> {
        let items = doc
            .get(field)
            .ok_or_else(|| format!("missing field '{}'", field))?
            .as_array()
            .ok_or_else(|| format!("field '{}' is not an array", field))?;

        let participants = items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("non-string participant in '{}'", field))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: doc.id.clone(),
            participants: Participants(participants),
        })
    }
}

/// Data handed to the row renderer for one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRow {
    pub id: DocumentId,
    pub participants: Participants,
    pub current_user: CurrentUser,
    /// First participant that is not the current user
    pub recipient: Option<String>,
}

impl ConversationRow {
    pub fn new(conversation: &Conversation, current_user: &CurrentUser) -> Self {
        let recipient = conversation
            .participants
            .others(&current_user.email)
            .next()
            .map(str::to_string);

        Self {
            id: conversation.id.clone(),
            participants: conversation.participants.clone(),
            current_user: current_user.clone(),
            recipient,
        }
    }
}
