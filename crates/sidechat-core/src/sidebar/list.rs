//! Conversation list reader

use crate::config::SidebarSettings;
use crate::error::Result;
use crate::store::{DocumentStore, LiveQuery};
use crate::types::{Conversation, Query, QueryState, Snapshot};
use tracing::{debug, warn};

/// What the sidebar currently knows about the user's conversations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Conversation>),
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn conversations(&self) -> &[Conversation] {
        match self {
            ListState::Loading => &[],
            ListState::Loaded(conversations) => conversations,
        }
    }

    /// Whether any loaded conversation includes `identity`
    pub fn has_participant(&self, identity: &str) -> bool {
        self.conversations()
            .iter()
            .any(|c| c.participants.contains(identity))
    }
}

/// Live view of the conversations that include one identity
pub struct ConversationListReader {
    live: LiveQuery,
    participants_field: String,
    state: ListState,
}

impl ConversationListReader {
    /// Subscribe to the conversations of `identity`
    pub fn open(store: &dyn DocumentStore, settings: &SidebarSettings, identity: &str) -> Result<Self> {
        let query = Query::collection(settings.collection.as_str())
            .array_contains(settings.participants_field.as_str(), identity);
        let live = store.watch(query)?;

        Ok(Self {
            live,
            participants_field: settings.participants_field.clone(),
            state: ListState::Loading,
        })
    }

    /// Wait for the next delivery and make it the current list.
    ///
    /// Returns `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<&ListState> {
        let delivered = self.live.changed().await?;
        self.state = match delivered {
            QueryState::Loading => ListState::Loading,
            QueryState::Ready(snapshot) => ListState::Loaded(self.decode(snapshot)),
        };
        debug!(
            "Conversation list updated: {} conversations",
            self.state.conversations().len()
        );
        Some(&self.state)
    }

    fn decode(&self, snapshot: Snapshot) -> Vec<Conversation> {
        snapshot
            .into_docs()
            .into_iter()
            .filter_map(|doc| match Conversation::from_document(&doc, &self.participants_field) {
                Ok(conversation) => {
                    if conversation.participants.count() != 2 {
                        warn!(
                            "Conversation {} has {} participants",
                            conversation.id,
                            conversation.participants.count()
                        );
                    }
                    Some(conversation)
                }
                Err(reason) => {
                    warn!("Skipping document {}: {}", doc.id, reason);
                    None
                }
            })
            .collect()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.state.conversations()
    }

    /// Unsubscribe from the store
    pub fn close(self) {
        debug!("Closing conversation list {}", self.live.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LiveQueryHub, MockDocumentStore};
    use crate::types::{Document, DocumentId, Participants};
    use serde_json::{json, Value};

    fn doc(id: &str, value: Value) -> Document {
        Document::new(id, value.as_object().cloned().unwrap())
    }

    fn store_with(hub: &LiveQueryHub) -> MockDocumentStore {
        let hub = hub.clone();
        let mut store = MockDocumentStore::new();
        store
            .expect_watch()
            .withf(|q| {
                *q == Query::collection("chats").array_contains("users", "a@x.com")
            })
            .times(1)
            .returning(move |q| Ok(hub.subscribe(q)));
        store
    }

    #[tokio::test]
    async fn test_loading_until_first_delivery() {
        let hub = LiveQueryHub::new();
        let store = store_with(&hub);
        let mut reader =
            ConversationListReader::open(&store, &SidebarSettings::default(), "a@x.com").unwrap();
        assert!(reader.is_loading());
        assert!(reader.conversations().is_empty());

        hub.publish("chats", |_| {
            Ok(Snapshot::new(vec![doc("c1", json!({"users": ["a@x.com", "b@x.com"]}))]))
        })
        .unwrap();

        let state = reader.next().await.unwrap();
        assert_eq!(
            state,
            &ListState::Loaded(vec![Conversation {
                id: DocumentId::new("c1"),
                participants: Participants::pair("a@x.com", "b@x.com"),
            }])
        );
    }

    #[tokio::test]
    async fn test_each_delivery_replaces_list() {
        let hub = LiveQueryHub::new();
        let store = store_with(&hub);
        let mut reader =
            ConversationListReader::open(&store, &SidebarSettings::default(), "a@x.com").unwrap();

        hub.publish("chats", |_| {
            Ok(Snapshot::new(vec![
                doc("c1", json!({"users": ["a@x.com", "b@x.com"]})),
                doc("c2", json!({"users": ["a@x.com", "c@x.com"]})),
            ]))
        })
        .unwrap();
        assert_eq!(reader.next().await.unwrap().conversations().len(), 2);

        hub.publish("chats", |_| {
            Ok(Snapshot::new(vec![doc("c2", json!({"users": ["a@x.com", "c@x.com"]}))]))
        })
        .unwrap();
        let state = reader.next().await.unwrap();
        assert_eq!(state.conversations().len(), 1);
        assert_eq!(state.conversations()[0].id.as_str(), "c2");
    }

    #[tokio::test]
    async fn test_malformed_documents_skipped() {
        let hub = LiveQueryHub::new();
        let store = store_with(&hub);
        let mut reader =
            ConversationListReader::open(&store, &SidebarSettings::default(), "a@x.com").unwrap();

        hub.publish("chats", |_| {
            Ok(Snapshot::new(vec![
                doc("bad", json!({"users": "a@x.com"})),
                doc("group", json!({"users": ["a@x.com", "b@x.com", "c@x.com"]})),
            ]))
        })
        .unwrap();

        let state = reader.next().await.unwrap();
        assert_eq!(state.conversations().len(), 1);
        assert_eq!(state.conversations()[0].id.as_str(), "group");
    }

    #[tokio::test]
    async fn test_next_ends_with_store() {
        let hub = LiveQueryHub::new();
        let store = store_with(&hub);
        let mut reader =
            ConversationListReader::open(&store, &SidebarSettings::default(), "a@x.com").unwrap();

        drop(hub);
        drop(store);
        assert!(reader.next().await.is_none());
    }

    #[test]
    fn test_close_unsubscribes() {
        let hub = LiveQueryHub::new();
        let store = store_with(&hub);
        let reader =
            ConversationListReader::open(&store, &SidebarSettings::default(), "a@x.com").unwrap();
        assert_eq!(hub.active_count(), 1);

        reader.close();
        assert_eq!(hub.active_count(), 0);
    }

    #[test]
    fn test_has_participant() {
        let state = ListState::Loaded(vec![Conversation {
            id: DocumentId::new("c1"),
            participants: Participants::pair("a@x.com", "b@x.com"),
        }]);
        assert!(state.has_participant("b@x.com"));
        assert!(!state.has_participant("c@x.com"));
        assert!(!ListState::Loading.has_participant("b@x.com"));
    }
}
