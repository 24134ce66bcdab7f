//! Document store
//!
//! This module provides:
//! - The `DocumentStore` trait the sidebar talks to
//! - Live query subscriptions (`LiveQueryHub`, `LiveQuery`)
//! - `Storage`, a SQLite-backed store with connection pooling and migrations

mod live;
mod migrations;
mod queries;
mod traits;

pub use live::{LiveQuery, LiveQueryHub};
pub use migrations::run_migrations;
pub use queries::*;
pub use traits::DocumentStore;

#[cfg(test)]
pub use traits::MockDocumentStore;

use crate::error::{Error, Result, StoreError};
use crate::types::{Document, DocumentId, DocumentRef, FieldMap, Query, Snapshot};
use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database connection pool type
pub type DbPool = Pool<SqliteConnectionManager>;

/// SQLite document store with live queries
pub struct Storage {
    pool: DbPool,
    db_path: PathBuf,
    hub: LiveQueryHub,
}

impl Storage {
    /// Create a new storage instance with a directory path
    pub fn new_with_path(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();

        std::fs::create_dir_all(data_dir).map_err(|e| {
            Error::Store(StoreError::Database(format!(
                "Failed to create data directory: {}",
                e
            )))
        })?;

        let db_path = data_dir.join("sidechat.db");
        info!("Database path: {:?}", db_path);

        Self::from_path(db_path)
    }

    /// Create storage from a specific path
    pub fn from_path(db_path: PathBuf) -> Result<Self> {
        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| Error::Store(StoreError::Pool(e.to_string())))?;

        let storage = Self {
            pool,
            db_path,
            hub: LiveQueryHub::new(),
        };

        storage.initialize()?;

        Ok(storage)
    }

    /// Create in-memory storage (for testing)
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        // The database lives only as long as its single connection
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .build(manager)
            .map_err(|e| Error::Store(StoreError::Pool(e.to_string())))?;

        let storage = Self {
            pool,
            db_path: PathBuf::from(":memory:"),
            hub: LiveQueryHub::new(),
        };

        storage.initialize()?;

        Ok(storage)
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.pool.get()?;
        run_migrations(&conn)?;
        info!("Database initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| Error::Store(StoreError::Pool(e.to_string())))
    }

    /// Get the database path
    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Number of open live queries
    pub fn live_query_count(&self) -> usize {
        self.hub.active_count()
    }

    fn evaluate(&self, query: &Query) -> Result<Snapshot> {
        let conn = self.connection()?;
        let docs = list_documents(&conn, &query.collection)?
            .into_iter()
            .filter(|doc| query.matches(&doc.fields))
            .collect();
        Ok(Snapshot::new(docs))
    }
}

#[async_trait]
impl DocumentStore for Storage {
    fn watch(&self, query: Query) -> Result<LiveQuery> {
        debug!("Watching '{}' with {:?}", query.collection, query.filter);
        self.hub.register(query, |q| self.evaluate(q))
    }

    async fn add(&self, collection: &str, fields: FieldMap) -> Result<DocumentRef> {
        let doc = Document::new(DocumentId::generate(), fields);

        {
            let conn = self.connection()?;
            insert_document(&conn, collection, &doc)?;
        }
        debug!("Added document {} to '{}'", doc.id, collection);

        self.hub.publish(collection, |q| self.evaluate(q))?;

        Ok(DocumentRef::new(collection, doc.id))
    }

    async fn get(&self, query: &Query) -> Result<Snapshot> {
        self.evaluate(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn users(list: &[&str]) -> FieldMap {
        json!({ "users": list }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_in_memory_storage() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.connection().is_ok());
    }

    #[test]
    fn test_in_memory_connection_is_never_recycled() {
        let storage = Storage::in_memory().unwrap();
        assert_eq!(storage.pool.max_lifetime(), None);
        assert_eq!(storage.pool.idle_timeout(), None);
    }

    #[test]
    fn test_storage_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new_with_path(dir.path().join("data")).unwrap();
        assert!(storage.db_path().ends_with("sidechat.db"));
        assert!(storage.db_path().exists());
    }

    #[tokio::test]
    async fn test_watch_delivers_current_results() {
        let storage = Storage::in_memory().unwrap();
        storage.add("chats", users(&["a@x.com", "b@x.com"])).await.unwrap();
        storage.add("chats", users(&["b@x.com", "c@x.com"])).await.unwrap();

        let mut live = storage
            .watch(Query::collection("chats").array_contains("users", "a@x.com"))
            .unwrap();

        let state = live.changed().await.unwrap();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.docs()[0].get("users"), Some(&json!(["a@x.com", "b@x.com"])));
    }

    #[tokio::test]
    async fn test_add_redelivers_full_result_set() {
        let storage = Storage::in_memory().unwrap();
        let mut live = storage
            .watch(Query::collection("chats").array_contains("users", "a@x.com"))
            .unwrap();
        assert!(live.changed().await.unwrap().snapshot().unwrap().is_empty());

        let first = storage.add("chats", users(&["a@x.com", "b@x.com"])).await.unwrap();
        let state = live.changed().await.unwrap();
        assert_eq!(state.snapshot().unwrap().len(), 1);

        let second = storage.add("chats", users(&["c@x.com", "a@x.com"])).await.unwrap();
        let state = live.changed().await.unwrap();
        let ids: Vec<DocumentId> = state
            .snapshot()
            .unwrap()
            .docs()
            .iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_unrelated_write_keeps_results() {
        let storage = Storage::in_memory().unwrap();
        let mut live = storage
            .watch(Query::collection("chats").array_contains("users", "a@x.com"))
            .unwrap();
        live.changed().await.unwrap();

        storage.add("chats", users(&["x@x.com", "y@x.com"])).await.unwrap();
        let state = live.changed().await.unwrap();
        assert!(state.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_live_query_is_unregistered() {
        let storage = Storage::in_memory().unwrap();
        let live = storage.watch(Query::collection("chats")).unwrap();
        assert_eq!(storage.live_query_count(), 1);

        drop(live);
        assert_eq!(storage.live_query_count(), 0);

        storage.add("chats", users(&["a@x.com", "b@x.com"])).await.unwrap();
        let all = storage.get(&Query::collection("chats")).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
