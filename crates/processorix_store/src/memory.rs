//! # In-Memory Entity Store
//!
//! The reference [`CollectionStore`] backend. One shard per session,
//! one slot per collection; every mutation republishes the collection
//! as a full snapshot on a watch channel.
//!
//! All clients of a session share the same shard with no locking beyond
//! the shard map's lock - conflicting writes resolve last-write-wins at
//! the field level, which is exactly what patch application gives us.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use processorix_model::{
    DecisionLine, Entity, EntityId, FreeLine, Player, ProcessCard, ProcessObject, SessionId,
    SessionRequest,
};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::collection::{CollectionStore, Subscription};
use crate::error::{StoreError, StoreResult};

/// One collection of one session: rows plus the snapshot channel.
struct CollectionSlot<T: Entity> {
    rows: Vec<T>,
    tx: watch::Sender<Vec<T>>,
}

impl<T: Entity> CollectionSlot<T> {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { rows: Vec::new(), tx }
    }

    /// Publishes the current rows as a snapshot.
    ///
    /// `send_replace` never fails: a snapshot published with no
    /// subscribers is simply the state the next subscriber starts from.
    fn publish(&self) {
        self.tx.send_replace(self.rows.clone());
    }

    fn upsert(&mut self, item: T) {
        match self.rows.iter_mut().find(|row| row.id() == item.id()) {
            Some(row) => *row = item,
            None => self.rows.push(item),
        }
        self.publish();
    }

    fn patch(&mut self, id: &EntityId, patch: &T::Patch) -> StoreResult<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| StoreError::EntityNotFound {
                collection: T::COLLECTION,
                id: id.clone(),
            })?;
        row.apply(patch);
        self.publish();
        Ok(())
    }

    fn delete(&mut self, id: &EntityId) {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        if self.rows.len() != before {
            self.publish();
        }
    }
}

/// All five collections of one session.
struct SessionShard {
    players: CollectionSlot<Player>,
    cards: CollectionSlot<ProcessCard>,
    objects: CollectionSlot<ProcessObject>,
    free_lines: CollectionSlot<FreeLine>,
    decision_lines: CollectionSlot<DecisionLine>,
}

impl SessionShard {
    fn new() -> Self {
        Self {
            players: CollectionSlot::new(),
            cards: CollectionSlot::new(),
            objects: CollectionSlot::new(),
            free_lines: CollectionSlot::new(),
            decision_lines: CollectionSlot::new(),
        }
    }
}

/// In-memory, multi-session entity store.
///
/// Shared between clients via `Arc`; each session's collections live in
/// one shard behind the store lock.
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionId, SessionShard>>,
    /// Count of write operations issued (create/update/remove), whether
    /// or not they succeeded. Test suites use this to assert that an
    /// operation stayed a no-op.
    write_ops: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            write_ops: AtomicU64::new(0),
        }
    }

    /// Opens the session a raw entry parameter asks for.
    ///
    /// Joining a code that does not exist yet materializes the board -
    /// the first participant to address a session creates it. The
    /// `"NEW"` sentinel generates a fresh code instead.
    pub fn open_session(&self, request: &SessionRequest) -> SessionId {
        let mut sessions = self.sessions.write();
        match request {
            SessionRequest::Join(id) => {
                sessions.entry(id.clone()).or_insert_with(|| {
                    info!(session = %id, "materializing session on first join");
                    SessionShard::new()
                });
                id.clone()
            }
            SessionRequest::Create => {
                let mut rng = rand::thread_rng();
                let id = loop {
                    let candidate = SessionId::generate(&mut rng);
                    if !sessions.contains_key(&candidate) {
                        break candidate;
                    }
                };
                info!(session = %id, "created session");
                sessions.insert(id.clone(), SessionShard::new());
                id
            }
        }
    }

    /// Whether a session exists.
    #[must_use]
    pub fn has_session(&self, session: &SessionId) -> bool {
        self.sessions.read().contains_key(session)
    }

    /// Closes a session, ending every live subscription on it.
    pub fn close_session(&self, session: &SessionId) {
        if self.sessions.write().remove(session).is_some() {
            info!(session = %session, "closed session");
        }
    }

    /// Number of write operations issued so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.write_ops.load(Ordering::Relaxed)
    }

    fn create_in<T: Entity>(
        &self,
        session: &SessionId,
        item: T,
        slot: fn(&mut SessionShard) -> &mut CollectionSlot<T>,
    ) -> StoreResult<()> {
        self.write_ops.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.sessions.write();
        let shard = sessions
            .get_mut(session)
            .ok_or_else(|| StoreError::SessionNotFound(session.clone()))?;
        debug!(session = %session, collection = T::COLLECTION, id = %item.id(), "create");
        slot(shard).upsert(item);
        Ok(())
    }

    fn update_in<T: Entity>(
        &self,
        session: &SessionId,
        id: &EntityId,
        patch: &T::Patch,
        slot: fn(&mut SessionShard) -> &mut CollectionSlot<T>,
    ) -> StoreResult<()> {
        self.write_ops.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.sessions.write();
        let shard = sessions
            .get_mut(session)
            .ok_or_else(|| StoreError::SessionNotFound(session.clone()))?;
        debug!(session = %session, collection = T::COLLECTION, id = %id, "update");
        slot(shard).patch(id, patch)
    }

    fn remove_in<T: Entity>(
        &self,
        session: &SessionId,
        id: &EntityId,
        slot: fn(&mut SessionShard) -> &mut CollectionSlot<T>,
    ) -> StoreResult<()> {
        self.write_ops.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.sessions.write();
        let shard = sessions
            .get_mut(session)
            .ok_or_else(|| StoreError::SessionNotFound(session.clone()))?;
        debug!(session = %session, collection = T::COLLECTION, id = %id, "remove");
        slot(shard).delete(id);
        Ok(())
    }

    fn subscribe_in<T: Entity>(
        &self,
        session: &SessionId,
        slot: fn(&SessionShard) -> &CollectionSlot<T>,
    ) -> StoreResult<Subscription<T>> {
        let sessions = self.sessions.read();
        let shard = sessions
            .get(session)
            .ok_or_else(|| StoreError::SessionNotFound(session.clone()))?;
        Ok(Subscription::new(slot(shard).tx.subscribe()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore<Player> for MemoryStore {
    fn create(&self, session: &SessionId, item: Player) -> StoreResult<()> {
        self.create_in(session, item, |shard| &mut shard.players)
    }

    fn update(
        &self,
        session: &SessionId,
        id: &EntityId,
        patch: <Player as Entity>::Patch,
    ) -> StoreResult<()> {
        self.update_in(session, id, &patch, |shard| &mut shard.players)
    }

    fn remove(&self, session: &SessionId, id: &EntityId) -> StoreResult<()> {
        self.remove_in::<Player>(session, id, |shard| &mut shard.players)
    }

    fn subscribe(&self, session: &SessionId) -> StoreResult<Subscription<Player>> {
        self.subscribe_in(session, |shard| &shard.players)
    }
}

impl CollectionStore<ProcessCard> for MemoryStore {
    fn create(&self, session: &SessionId, item: ProcessCard) -> StoreResult<()> {
        self.create_in(session, item, |shard| &mut shard.cards)
    }

    fn update(
        &self,
        session: &SessionId,
        id: &EntityId,
        patch: <ProcessCard as Entity>::Patch,
    ) -> StoreResult<()> {
        self.update_in(session, id, &patch, |shard| &mut shard.cards)
    }

    fn remove(&self, session: &SessionId, id: &EntityId) -> StoreResult<()> {
        self.remove_in::<ProcessCard>(session, id, |shard| &mut shard.cards)
    }

    fn subscribe(&self, session: &SessionId) -> StoreResult<Subscription<ProcessCard>> {
        self.subscribe_in(session, |shard| &shard.cards)
    }
}

impl CollectionStore<ProcessObject> for MemoryStore {
    fn create(&self, session: &SessionId, item: ProcessObject) -> StoreResult<()> {
        self.create_in(session, item, |shard| &mut shard.objects)
    }

    fn update(
        &self,
        session: &SessionId,
        id: &EntityId,
        patch: <ProcessObject as Entity>::Patch,
    ) -> StoreResult<()> {
        self.update_in(session, id, &patch, |shard| &mut shard.objects)
    }

    fn remove(&self, session: &SessionId, id: &EntityId) -> StoreResult<()> {
        self.remove_in::<ProcessObject>(session, id, |shard| &mut shard.objects)
    }

    fn subscribe(&self, session: &SessionId) -> StoreResult<Subscription<ProcessObject>> {
        self.subscribe_in(session, |shard| &shard.objects)
    }
}

impl CollectionStore<FreeLine> for MemoryStore {
    fn create(&self, session: &SessionId, item: FreeLine) -> StoreResult<()> {
        self.create_in(session, item, |shard| &mut shard.free_lines)
    }

    fn update(
        &self,
        session: &SessionId,
        id: &EntityId,
        patch: <FreeLine as Entity>::Patch,
    ) -> StoreResult<()> {
        self.update_in(session, id, &patch, |shard| &mut shard.free_lines)
    }

    fn remove(&self, session: &SessionId, id: &EntityId) -> StoreResult<()> {
        self.remove_in::<FreeLine>(session, id, |shard| &mut shard.free_lines)
    }

    fn subscribe(&self, session: &SessionId) -> StoreResult<Subscription<FreeLine>> {
        self.subscribe_in(session, |shard| &shard.free_lines)
    }
}

impl CollectionStore<DecisionLine> for MemoryStore {
    fn create(&self, session: &SessionId, item: DecisionLine) -> StoreResult<()> {
        self.create_in(session, item, |shard| &mut shard.decision_lines)
    }

    fn update(
        &self,
        session: &SessionId,
        id: &EntityId,
        patch: <DecisionLine as Entity>::Patch,
    ) -> StoreResult<()> {
        self.update_in(session, id, &patch, |shard| &mut shard.decision_lines)
    }

    fn remove(&self, session: &SessionId, id: &EntityId) -> StoreResult<()> {
        self.remove_in::<DecisionLine>(session, id, |shard| &mut shard.decision_lines)
    }

    fn subscribe(&self, session: &SessionId) -> StoreResult<Subscription<DecisionLine>> {
        self.subscribe_in(session, |shard| &shard.decision_lines)
    }
}
