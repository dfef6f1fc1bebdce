//! # Collection Contract
//!
//! Traits that any entity-store backend must implement to host a board.
//!
//! The coordinator never talks to a concrete store type; it is generic
//! over [`EntityStore`], the supertrait covering all five collections.
//! The in-memory store implements it for local boards and tests; a
//! remote document store would implement the same seam.

use processorix_model::{
    DecisionLine, Entity, EntityId, FreeLine, Player, ProcessCard, ProcessObject, SessionId,
};
use tokio::sync::watch;

use crate::error::StoreResult;

/// One collection of a session, by entity kind.
///
/// All writes are per-document and independent; the store offers no
/// transactions. Conflicting concurrent writes resolve last-write-wins
/// at the field level via the patch shape.
pub trait CollectionStore<T: Entity>: Send + Sync {
    /// Creates (or fully replaces) a document.
    fn create(&self, session: &SessionId, item: T) -> StoreResult<()>;

    /// Applies a partial update to the document with the given id.
    fn update(&self, session: &SessionId, id: &EntityId, patch: T::Patch) -> StoreResult<()>;

    /// Removes the document with the given id. Removing an id that is
    /// already gone is a successful no-op.
    fn remove(&self, session: &SessionId, id: &EntityId) -> StoreResult<()>;

    /// Subscribes to snapshot delivery for this collection.
    ///
    /// The current snapshot is delivered immediately, then one full
    /// replacement per mutation. Dropping the subscription unsubscribes.
    fn subscribe(&self, session: &SessionId) -> StoreResult<Subscription<T>>;
}

/// The full entity-store contract: one [`CollectionStore`] per kind.
pub trait EntityStore:
    CollectionStore<Player>
    + CollectionStore<ProcessCard>
    + CollectionStore<ProcessObject>
    + CollectionStore<FreeLine>
    + CollectionStore<DecisionLine>
{
}

impl<S> EntityStore for S where
    S: CollectionStore<Player>
        + CollectionStore<ProcessCard>
        + CollectionStore<ProcessObject>
        + CollectionStore<FreeLine>
        + CollectionStore<DecisionLine>
{
}

/// A live subscription to one collection's snapshot stream.
///
/// Wraps a watch receiver: a slow subscriber skips intermediate
/// snapshots and always lands on the latest one.
pub struct Subscription<T> {
    rx: watch::Receiver<Vec<T>>,
}

impl<T: Clone> Subscription<T> {
    /// Builds a subscription that will deliver the current snapshot on
    /// the first [`Subscription::recv`].
    #[must_use]
    pub fn new(mut rx: watch::Receiver<Vec<T>>) -> Self {
        rx.mark_changed();
        Self { rx }
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the session is closed and no further
    /// snapshot will ever be delivered.
    pub async fn recv(&mut self) -> Option<Vec<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Returns the most recently published snapshot without waiting.
    #[must_use]
    pub fn latest(&self) -> Vec<T> {
        self.rx.borrow().clone()
    }
}
