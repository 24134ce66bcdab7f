//! Live query subscriptions
//!
//! A [`LiveQueryHub`] keeps one `watch` channel per subscriber. Stores call
//! [`LiveQueryHub::publish`] after a write, and every live query on the
//! written collection receives its full re-evaluated result set.

use crate::error::Result;
use crate::types::{Query, QueryState, Snapshot};
use futures::Stream;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::debug;

struct Watcher {
    query: Query,
    tx: watch::Sender<QueryState>,
}

#[derive(Default)]
struct HubInner {
    watchers: Mutex<HashMap<u64, Watcher>>,
    next_id: AtomicU64,
}

/// Registry of live queries shared by a store
#[derive(Clone, Default)]
pub struct LiveQueryHub {
    inner: Arc<HubInner>,
}

impl LiveQueryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query that stays `Loading` until the next publish
    pub fn subscribe(&self, query: Query) -> LiveQuery {
        let mut watchers = self.inner.watchers.lock();
        self.insert(&mut watchers, query)
    }

    /// Register a query and deliver its first result set immediately.
    ///
    /// Evaluation happens under the registry lock so a concurrent publish
    /// cannot be lost between registration and the first delivery.
    pub fn register<F>(&self, query: Query, evaluate: F) -> Result<LiveQuery>
    where
        F: FnOnce(&Query) -> Result<Snapshot>,
    {
        let mut watchers = self.inner.watchers.lock();
        let snapshot = evaluate(&query)?;
        let live = self.insert(&mut watchers, query);
        if let Some(watcher) = watchers.get(&live.id) {
            watcher.tx.send_replace(QueryState::Ready(snapshot));
        }
        Ok(live)
    }

    fn insert(&self, watchers: &mut HashMap<u64, Watcher>, query: Query) -> LiveQuery {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(QueryState::Loading);

        debug!("Registering live query {} on '{}'", id, query.collection);
        watchers.insert(
            id,
            Watcher {
                query: query.clone(),
                tx,
            },
        );

        LiveQuery {
            id,
            query,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Re-evaluate and push every live query on `collection`.
    ///
    /// Returns the number of subscribers that received a result set.
    pub fn publish<F>(&self, collection: &str, mut evaluate: F) -> Result<usize>
    where
        F: FnMut(&Query) -> Result<Snapshot>,
    {
        let mut watchers = self.inner.watchers.lock();
        watchers.retain(|_, w| !w.tx.is_closed());

        let mut delivered = 0;
        for watcher in watchers.values().filter(|w| w.query.collection == collection) {
            let snapshot = evaluate(&watcher.query)?;
            watcher.tx.send_replace(QueryState::Ready(snapshot));
            delivered += 1;
        }

        debug!("Published '{}' to {} live queries", collection, delivered);
        Ok(delivered)
    }

    /// Number of registered live queries
    pub fn active_count(&self) -> usize {
        self.inner.watchers.lock().len()
    }
}

/// A cancellable subscription to a query.
///
/// Each delivery is the full current result set. Dropping the subscription
/// unregisters it from the store.
pub struct LiveQuery {
    id: u64,
    query: Query,
    rx: watch::Receiver<QueryState>,
    hub: Weak<HubInner>,
}

impl LiveQuery {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Latest delivered state
    pub fn current(&self) -> QueryState {
        self.rx.borrow().clone()
    }

    /// Wait for the next delivery. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<QueryState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Consume the subscription as a stream of deliveries
    pub fn into_stream(self) -> impl Stream<Item = QueryState> {
        futures::stream::unfold(self, |mut live| async move {
            let state = live.changed().await?;
            Some((state, live))
        })
    }

    /// Stop receiving deliveries
    pub fn unsubscribe(self) {}
}

impl Drop for LiveQuery {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner.watchers.lock().remove(&self.id);
            debug!("Unsubscribed live query {}", self.id);
        }
    }
}

impl std::fmt::Debug for LiveQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQuery")
            .field("id", &self.id)
            .field("query", &self.query)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;
    use futures::StreamExt;
    use tokio_test::{assert_pending, assert_ready, task};

    fn snapshot_of(ids: &[&str]) -> Snapshot {
        Snapshot::new(
            ids.iter()
                .map(|id| Document::new(*id, Default::default()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_register_delivers_first_result() {
        let hub = LiveQueryHub::new();
        let mut live = hub
            .register(Query::collection("chats"), |_| Ok(snapshot_of(&["c1"])))
            .unwrap();

        let state = live.changed().await.unwrap();
        assert_eq!(state.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_subscribe_stays_loading_until_publish() {
        let hub = LiveQueryHub::new();
        let mut live = hub.subscribe(Query::collection("chats"));
        assert!(live.current().is_loading());

        {
            let mut changed = task::spawn(live.changed());
            assert_pending!(changed.poll());
        }

        hub.publish("chats", |_| Ok(snapshot_of(&["c1", "c2"]))).unwrap();

        let mut changed = task::spawn(live.changed());
        let state = assert_ready!(changed.poll()).unwrap();
        assert_eq!(state.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_publish_only_reaches_matching_collection() {
        let hub = LiveQueryHub::new();
        let _chats = hub.subscribe(Query::collection("chats"));
        let _other = hub.subscribe(Query::collection("messages"));

        let delivered = hub.publish("chats", |_| Ok(Snapshot::default())).unwrap();
        assert_eq!(delivered, 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = LiveQueryHub::new();
        let live = hub.subscribe(Query::collection("chats"));
        let other = hub.subscribe(Query::collection("chats"));
        assert_eq!(hub.active_count(), 2);

        drop(live);
        assert_eq!(hub.active_count(), 1);

        other.unsubscribe();
        assert_eq!(hub.active_count(), 0);
    }

    #[tokio::test]
    async fn test_changed_ends_when_hub_dropped() {
        let hub = LiveQueryHub::new();
        let mut live = hub.subscribe(Query::collection("chats"));
        drop(hub);

        assert!(live.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_into_stream_yields_each_delivery() {
        let hub = LiveQueryHub::new();
        let live = hub
            .register(Query::collection("chats"), |_| Ok(snapshot_of(&["c1"])))
            .unwrap();
        let mut stream = Box::pin(live.into_stream());

        let first = stream.next().await.unwrap();
        assert_eq!(first.snapshot().unwrap().len(), 1);

        hub.publish("chats", |_| Ok(snapshot_of(&["c1", "c2"]))).unwrap();
        let second = stream.next().await.unwrap();
        assert_eq!(second.snapshot().unwrap().len(), 2);
    }
}
