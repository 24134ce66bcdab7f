//! Document store abstraction
//!
//! `DocumentStore` is the seam between the sidebar and whatever real-time
//! backend holds conversation records. The bundled [`Storage`] implements it
//! over SQLite; other backends only need to deliver full result sets through
//! a [`LiveQuery`].
//!
//! [`Storage`]: super::Storage

use super::LiveQuery;
use crate::error::Result;
use crate::types::{DocumentRef, FieldMap, Query, Snapshot};
use async_trait::async_trait;

/// A document store with live queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Subscribe to a query. Every change to the query's collection
    /// re-delivers the full current result set.
    fn watch(&self, query: Query) -> Result<LiveQuery>;

    /// Add a document; the store assigns its identifier
    async fn add(&self, collection: &str, fields: FieldMap) -> Result<DocumentRef>;

    /// One-shot evaluation of a query
    async fn get(&self, query: &Query) -> Result<Snapshot>;
}
