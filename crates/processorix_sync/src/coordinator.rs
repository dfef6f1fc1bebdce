//! # Synchronization Coordinator
//!
//! The authoritative client-side state holder for one board. It reacts
//! only to snapshots pushed by the entity store (never polling), keeps
//! the denormalized dock positions consistent, and validates intents
//! from the presentation layer before passing them through.
//!
//! ## Data flow
//!
//! ```text
//! presentation ──intent──▶ coordinator ──write──▶ entity store
//!        ▲                                             │
//!        └──────── snapshot ◀── coordinator ◀── push ──┘
//! ```
//!
//! ## State
//!
//! The coordinator is stateless between snapshots except for the last
//! received snapshot per collection (empty until the first delivery)
//! and the attached session. Snapshot handlers replace caches
//! wholesale - latest snapshot wins, no merging.
//!
//! ## Failure policy
//!
//! Writes are submit-and-log: no retry, no backoff, no transaction.
//! A missed corrective write self-heals on the next snapshot-triggered
//! write. An intent issued with no attached session is silently dropped;
//! that is the contract, not an error.
//!
//! Positions could instead be resolved at render time by player lookup,
//! which would remove the propagation step entirely; the denormalized
//! copies are kept because every consumer renders from line snapshots
//! without joining collections.

use std::sync::Arc;

use parking_lot::RwLock;
use processorix_model::{
    DecisionLine, DecisionLinePatch, EntityId, FreeLine, FreeLinePatch, Player, PlayerPatch,
    Position, ProcessCard, ProcessCardPatch, ProcessObject, ProcessObjectPatch, SessionId,
};
use processorix_store::{CollectionStore, EntityStore, StoreResult};
use tracing::{debug, warn};

use crate::reconcile::{reconcile_objects, ReconcileReport};

/// Client-side coordinator for one board session.
pub struct Coordinator<S> {
    store: Arc<S>,
    session: RwLock<Option<SessionId>>,
    players: RwLock<Vec<Player>>,
    cards: RwLock<Vec<ProcessCard>>,
    objects: RwLock<Vec<ProcessObject>>,
    free_lines: RwLock<Vec<FreeLine>>,
    decision_lines: RwLock<Vec<DecisionLine>>,
}

impl<S: EntityStore> Coordinator<S> {
    /// Creates a coordinator with empty caches and no attached session.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            session: RwLock::new(None),
            players: RwLock::new(Vec::new()),
            cards: RwLock::new(Vec::new()),
            objects: RwLock::new(Vec::new()),
            free_lines: RwLock::new(Vec::new()),
            decision_lines: RwLock::new(Vec::new()),
        }
    }

    /// Attaches the session all subsequent operations address.
    pub fn attach_session(&self, session: SessionId) {
        *self.session.write() = Some(session);
    }

    /// Detaches the session; subsequent intents become no-ops.
    pub fn detach_session(&self) {
        *self.session.write() = None;
    }

    /// The currently attached session, if any.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.session.read().clone()
    }

    /// The store this coordinator writes through.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn active_session(&self, intent: &'static str) -> Option<SessionId> {
        let session = self.session.read().clone();
        if session.is_none() {
            debug!(intent, "intent dropped: no active session");
        }
        session
    }

    // ========================================================================
    // SNAPSHOT HANDLERS (store → coordinator)
    // ========================================================================

    /// Replaces the player cache wholesale.
    pub fn on_players_snapshot(&self, players: Vec<Player>) {
        *self.players.write() = players;
    }

    /// Replaces the card cache wholesale.
    pub fn on_cards_snapshot(&self, cards: Vec<ProcessCard>) {
        *self.cards.write() = cards;
    }

    /// Replaces the object cache, then reconciles the palette defaults.
    ///
    /// Reconciliation writes flow back through the store as ordinary
    /// creates/removes; the next snapshot they trigger finds nothing
    /// left to correct, so the loop settles.
    pub fn on_process_objects_snapshot(&self, objects: Vec<ProcessObject>) -> ReconcileReport {
        *self.objects.write() = objects;
        let Some(session) = self.active_session("reconcile_objects") else {
            return ReconcileReport::default();
        };
        let snapshot = self.objects.read().clone();
        reconcile_objects(self.store.as_ref(), &session, &snapshot)
    }

    /// Replaces the free-line cache wholesale.
    pub fn on_free_lines_snapshot(&self, lines: Vec<FreeLine>) {
        *self.free_lines.write() = lines;
    }

    /// Replaces the decision-line cache wholesale.
    pub fn on_decision_lines_snapshot(&self, lines: Vec<DecisionLine>) {
        *self.decision_lines.write() = lines;
    }

    // ========================================================================
    // CACHE ACCESSORS (coordinator → presentation)
    // ========================================================================

    /// Last received player snapshot.
    #[must_use]
    pub fn players(&self) -> Vec<Player> {
        self.players.read().clone()
    }

    /// Last received card snapshot.
    #[must_use]
    pub fn cards(&self) -> Vec<ProcessCard> {
        self.cards.read().clone()
    }

    /// Last received object snapshot.
    #[must_use]
    pub fn objects(&self) -> Vec<ProcessObject> {
        self.objects.read().clone()
    }

    /// Last received free-line snapshot.
    #[must_use]
    pub fn free_lines(&self) -> Vec<FreeLine> {
        self.free_lines.read().clone()
    }

    /// Last received decision-line snapshot.
    #[must_use]
    pub fn decision_lines(&self) -> Vec<DecisionLine> {
        self.decision_lines.read().clone()
    }

    // ========================================================================
    // POSITION PROPAGATION
    // ========================================================================

    /// Moves a player and rewrites every docked line endpoint that
    /// references it.
    ///
    /// The player write carries the position and, iff this is the
    /// player's first move, the `on_board` flag in the same patch.
    /// Each matching line endpoint then gets its own patch containing
    /// only the matched field(s); a line docked on one side never sees
    /// its free side touched. Line writes are independent - a failed
    /// one is logged and the rest are still attempted.
    pub fn update_player_position(
        &self,
        player_id: &EntityId,
        position: Position,
    ) -> StoreResult<()> {
        let Some(session) = self.active_session("update_player_position") else {
            return Ok(());
        };

        // A player's first move always places them on the board. An
        // unknown player (stale cache) is treated as unplaced; setting
        // the flag again is harmless under field-level LWW.
        let needs_placing = self
            .players
            .read()
            .iter()
            .find(|p| &p.id == player_id)
            .map_or(true, |p| !p.on_board);
        let patch = if needs_placing {
            PlayerPatch::placed_at(position)
        } else {
            PlayerPatch::position(position)
        };
        let result = CollectionStore::<Player>::update(self.store.as_ref(), &session, player_id, patch);
        if let Err(error) = &result {
            warn!(player = %player_id, %error, "player position write dropped");
        }

        let free_lines = self.free_lines.read().clone();
        for line in &free_lines {
            let mut patch = FreeLinePatch::default();
            if line.start_player_id.as_ref() == Some(player_id) {
                patch.start_position = Some(position);
            }
            if line.end_player_id.as_ref() == Some(player_id) {
                patch.end_position = Some(position);
            }
            if patch == FreeLinePatch::default() {
                continue;
            }
            if let Err(error) =
                CollectionStore::<FreeLine>::update(self.store.as_ref(), &session, &line.id, patch)
            {
                warn!(line = %line.id, %error, "free line dock update dropped");
            }
        }

        let decision_lines = self.decision_lines.read().clone();
        for line in &decision_lines {
            let mut patch = DecisionLinePatch::default();
            if line.start_player_id.as_ref() == Some(player_id) {
                patch.start_position = Some(position);
            }
            if line.option1_player_id.as_ref() == Some(player_id) {
                patch.option1_position = Some(position);
            }
            if line.option2_player_id.as_ref() == Some(player_id) {
                patch.option2_position = Some(position);
            }
            if patch == DecisionLinePatch::default() {
                continue;
            }
            if let Err(error) = CollectionStore::<DecisionLine>::update(
                self.store.as_ref(),
                &session,
                &line.id,
                patch,
            ) {
                warn!(line = %line.id, %error, "decision line dock update dropped");
            }
        }

        result
    }

    // ========================================================================
    // INTENTS (presentation → coordinator → store)
    // ========================================================================

    /// Registers a player.
    pub fn add_player(&self, player: Player) -> StoreResult<()> {
        let Some(session) = self.active_session("add_player") else {
            return Ok(());
        };
        self.store.create(&session, player)
    }

    /// Edits a player.
    pub fn update_player(&self, id: &EntityId, patch: PlayerPatch) -> StoreResult<()> {
        let Some(session) = self.active_session("update_player") else {
            return Ok(());
        };
        CollectionStore::<Player>::update(self.store.as_ref(), &session, id, patch)
    }

    /// Removes a player.
    ///
    /// Lines docked to the player are NOT removed or undocked; their
    /// references dangle and their endpoints simply stop moving.
    pub fn remove_player(&self, id: &EntityId) -> StoreResult<()> {
        let Some(session) = self.active_session("remove_player") else {
            return Ok(());
        };
        CollectionStore::<Player>::remove(self.store.as_ref(), &session, id)
    }

    /// Creates a process card ordered after the current last step.
    ///
    /// Returns the generated card id, or `None` when the intent was
    /// dropped for lack of a session.
    pub fn add_card(
        &self,
        from_player_id: Option<EntityId>,
        to_player_id: Option<EntityId>,
        text: impl Into<String>,
    ) -> StoreResult<Option<EntityId>> {
        let Some(session) = self.active_session("add_card") else {
            return Ok(None);
        };
        let order = u32::try_from(self.cards.read().len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        let card = ProcessCard::new(
            &mut rand::thread_rng(),
            from_player_id,
            to_player_id,
            text,
            order,
        );
        let id = card.id.clone();
        self.store.create(&session, card)?;
        Ok(Some(id))
    }

    /// Edits a card's text or metadata.
    pub fn update_card(&self, id: &EntityId, patch: ProcessCardPatch) -> StoreResult<()> {
        let Some(session) = self.active_session("update_card") else {
            return Ok(());
        };
        CollectionStore::<ProcessCard>::update(self.store.as_ref(), &session, id, patch)
    }

    /// Removes a card.
    pub fn remove_card(&self, id: &EntityId) -> StoreResult<()> {
        let Some(session) = self.active_session("remove_card") else {
            return Ok(());
        };
        CollectionStore::<ProcessCard>::remove(self.store.as_ref(), &session, id)
    }

    /// Adds a palette object.
    pub fn add_process_object(&self, object: ProcessObject) -> StoreResult<()> {
        let Some(session) = self.active_session("add_process_object") else {
            return Ok(());
        };
        self.store.create(&session, object)
    }

    /// Edits a palette object.
    pub fn update_process_object(
        &self,
        id: &EntityId,
        patch: ProcessObjectPatch,
    ) -> StoreResult<()> {
        let Some(session) = self.active_session("update_process_object") else {
            return Ok(());
        };
        CollectionStore::<ProcessObject>::update(self.store.as_ref(), &session, id, patch)
    }

    /// Removes a palette object.
    pub fn remove_process_object(&self, id: &EntityId) -> StoreResult<()> {
        let Some(session) = self.active_session("remove_process_object") else {
            return Ok(());
        };
        CollectionStore::<ProcessObject>::remove(self.store.as_ref(), &session, id)
    }

    /// Adds a free line.
    pub fn add_free_line(&self, line: FreeLine) -> StoreResult<()> {
        let Some(session) = self.active_session("add_free_line") else {
            return Ok(());
        };
        self.store.create(&session, line)
    }

    /// Edits a free line.
    pub fn update_free_line(&self, id: &EntityId, patch: FreeLinePatch) -> StoreResult<()> {
        let Some(session) = self.active_session("update_free_line") else {
            return Ok(());
        };
        CollectionStore::<FreeLine>::update(self.store.as_ref(), &session, id, patch)
    }

    /// Removes a free line.
    pub fn remove_free_line(&self, id: &EntityId) -> StoreResult<()> {
        let Some(session) = self.active_session("remove_free_line") else {
            return Ok(());
        };
        CollectionStore::<FreeLine>::remove(self.store.as_ref(), &session, id)
    }

    /// Adds a decision line.
    pub fn add_decision_line(&self, line: DecisionLine) -> StoreResult<()> {
        let Some(session) = self.active_session("add_decision_line") else {
            return Ok(());
        };
        self.store.create(&session, line)
    }

    /// Edits a decision line.
    pub fn update_decision_line(&self, id: &EntityId, patch: DecisionLinePatch) -> StoreResult<()> {
        let Some(session) = self.active_session("update_decision_line") else {
            return Ok(());
        };
        CollectionStore::<DecisionLine>::update(self.store.as_ref(), &session, id, patch)
    }

    /// Removes a decision line.
    pub fn remove_decision_line(&self, id: &EntityId) -> StoreResult<()> {
        let Some(session) = self.active_session("remove_decision_line") else {
            return Ok(());
        };
        CollectionStore::<DecisionLine>::remove(self.store.as_ref(), &session, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use processorix_model::SessionRequest;
    use processorix_store::{MemoryStore, Subscription};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board() -> (Arc<MemoryStore>, Coordinator<MemoryStore>, SessionId) {
        let store = Arc::new(MemoryStore::new());
        let session = store.open_session(&SessionRequest::Join(SessionId::from("ABCD")));
        let coordinator = Coordinator::new(Arc::clone(&store));
        coordinator.attach_session(session.clone());
        (store, coordinator, session)
    }

    fn stored_players(store: &MemoryStore, session: &SessionId) -> Vec<Player> {
        let sub: Subscription<Player> = store.subscribe(session).unwrap();
        sub.latest()
    }

    fn stored_free_lines(store: &MemoryStore, session: &SessionId) -> Vec<FreeLine> {
        let sub: Subscription<FreeLine> = store.subscribe(session).unwrap();
        sub.latest()
    }

    fn stored_decision_lines(store: &MemoryStore, session: &SessionId) -> Vec<DecisionLine> {
        let sub: Subscription<DecisionLine> = store.subscribe(session).unwrap();
        sub.latest()
    }

    fn player_at(rng: &mut StdRng, name: &str, position: Position, on_board: bool) -> Player {
        let mut player = Player::new(rng, name, "Role", "#123456", "P");
        player.position = Some(position);
        player.on_board = on_board;
        player
    }

    #[test]
    fn test_intents_without_session_issue_zero_store_calls() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = Coordinator::new(Arc::clone(&store));
        let mut rng = StdRng::seed_from_u64(11);

        let player = Player::new(&mut rng, "Ada", "Analyst", "#ff8800", "A");
        let id = player.id.clone();

        assert!(coordinator.add_player(player).is_ok());
        assert!(coordinator
            .update_player(&id, PlayerPatch::position(Position::new(1.0, 1.0)))
            .is_ok());
        assert!(coordinator.remove_player(&id).is_ok());
        assert_eq!(coordinator.add_card(None, None, "step").unwrap(), None);
        assert!(coordinator
            .update_player_position(&id, Position::new(2.0, 2.0))
            .is_ok());

        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_first_move_places_player_on_board() {
        let (store, coordinator, session) = board();
        let mut rng = StdRng::seed_from_u64(11);

        let player = player_at(&mut rng, "Ada", Position::new(10.0, 10.0), false);
        let id = player.id.clone();
        coordinator.add_player(player.clone()).unwrap();
        coordinator.on_players_snapshot(vec![player]);

        coordinator
            .update_player_position(&id, Position::new(30.0, 40.0))
            .unwrap();

        let players = stored_players(&store, &session);
        assert!(players[0].on_board);
        assert_eq!(players[0].position, Some(Position::new(30.0, 40.0)));
    }

    #[test]
    fn test_later_moves_only_change_position() {
        let (store, coordinator, session) = board();
        let mut rng = StdRng::seed_from_u64(11);

        let player = player_at(&mut rng, "Ada", Position::new(10.0, 10.0), true);
        let id = player.id.clone();
        coordinator.add_player(player.clone()).unwrap();
        coordinator.on_players_snapshot(vec![player]);

        coordinator
            .update_player_position(&id, Position::new(55.0, 60.0))
            .unwrap();

        let players = stored_players(&store, &session);
        assert!(players[0].on_board);
        assert_eq!(players[0].position, Some(Position::new(55.0, 60.0)));
    }

    #[test]
    fn test_free_line_propagation_is_complete_and_minimal() {
        let (store, coordinator, session) = board();
        let mut rng = StdRng::seed_from_u64(11);

        let mover = player_at(&mut rng, "Ada", Position::new(10.0, 10.0), true);
        let mover_id = mover.id.clone();
        let other = player_at(&mut rng, "Bo", Position::new(80.0, 80.0), true);
        let other_id = other.id.clone();

        // start docked to the mover
        let docked_start = FreeLine::new(
            &mut rng,
            Position::new(10.0, 10.0),
            Position::new(50.0, 50.0),
            "#222222",
        )
        .docked_from(mover_id.clone());
        // end docked to the mover
        let docked_end = FreeLine::new(
            &mut rng,
            Position::new(5.0, 5.0),
            Position::new(10.0, 10.0),
            "#222222",
        )
        .docked_to(mover_id.clone());
        // degenerate self-loop: both endpoints docked to the mover
        let self_loop = FreeLine::new(
            &mut rng,
            Position::new(10.0, 10.0),
            Position::new(10.0, 10.0),
            "#222222",
        )
        .docked_from(mover_id.clone())
        .docked_to(mover_id.clone());
        // docked to a different player: untouched
        let unrelated = FreeLine::new(
            &mut rng,
            Position::new(80.0, 80.0),
            Position::new(60.0, 60.0),
            "#222222",
        )
        .docked_from(other_id);

        for line in [&docked_start, &docked_end, &self_loop, &unrelated] {
            coordinator.add_free_line(line.clone()).unwrap();
        }
        coordinator.on_players_snapshot(vec![mover, other]);
        coordinator.on_free_lines_snapshot(vec![
            docked_start.clone(),
            docked_end.clone(),
            self_loop.clone(),
            unrelated.clone(),
        ]);

        let target = Position::new(30.0, 40.0);
        coordinator.update_player_position(&mover_id, target).unwrap();

        let lines = stored_free_lines(&store, &session);
        let by_id = |id: &EntityId| lines.iter().find(|l| &l.id == id).unwrap();

        let line = by_id(&docked_start.id);
        assert_eq!(line.start_position, target);
        assert_eq!(line.end_position, Position::new(50.0, 50.0));

        let line = by_id(&docked_end.id);
        assert_eq!(line.end_position, target);
        assert_eq!(line.start_position, Position::new(5.0, 5.0));

        let line = by_id(&self_loop.id);
        assert_eq!(line.start_position, target);
        assert_eq!(line.end_position, target);

        let line = by_id(&unrelated.id);
        assert_eq!(line.start_position, Position::new(80.0, 80.0));
        assert_eq!(line.end_position, Position::new(60.0, 60.0));
    }

    #[test]
    fn test_decision_line_roles_propagate_independently() {
        let (store, coordinator, session) = board();
        let mut rng = StdRng::seed_from_u64(11);

        let p = player_at(&mut rng, "P", Position::new(10.0, 10.0), true);
        let q = player_at(&mut rng, "Q", Position::new(20.0, 20.0), true);
        let r = player_at(&mut rng, "R", Position::new(30.0, 30.0), true);

        let line = DecisionLine::new(
            &mut rng,
            Position::new(10.0, 10.0),
            Position::new(20.0, 20.0),
            Position::new(30.0, 30.0),
            "#222222",
        )
        .docked_from(p.id.clone())
        .docked_option1(q.id.clone())
        .docked_option2(r.id.clone());

        coordinator.add_decision_line(line.clone()).unwrap();
        coordinator.on_players_snapshot(vec![p.clone(), q.clone(), r.clone()]);
        coordinator.on_decision_lines_snapshot(vec![line.clone()]);

        // Moving P only rewrites the origin.
        coordinator
            .update_player_position(&p.id, Position::new(11.0, 11.0))
            .unwrap();
        let stored = stored_decision_lines(&store, &session);
        assert_eq!(stored[0].start_position, Position::new(11.0, 11.0));
        assert_eq!(stored[0].option1_position, Position::new(20.0, 20.0));
        assert_eq!(stored[0].option2_position, Position::new(30.0, 30.0));

        // Moving Q only rewrites option 1.
        coordinator.on_decision_lines_snapshot(stored);
        coordinator
            .update_player_position(&q.id, Position::new(22.0, 22.0))
            .unwrap();
        let stored = stored_decision_lines(&store, &session);
        assert_eq!(stored[0].start_position, Position::new(11.0, 11.0));
        assert_eq!(stored[0].option1_position, Position::new(22.0, 22.0));
        assert_eq!(stored[0].option2_position, Position::new(30.0, 30.0));

        // Moving R only rewrites option 2.
        coordinator.on_decision_lines_snapshot(stored);
        coordinator
            .update_player_position(&r.id, Position::new(33.0, 33.0))
            .unwrap();
        let stored = stored_decision_lines(&store, &session);
        assert_eq!(stored[0].start_position, Position::new(11.0, 11.0));
        assert_eq!(stored[0].option1_position, Position::new(22.0, 22.0));
        assert_eq!(stored[0].option2_position, Position::new(33.0, 33.0));
    }

    #[test]
    fn test_stale_line_failure_does_not_block_siblings() {
        let (store, coordinator, session) = board();
        let mut rng = StdRng::seed_from_u64(11);

        let mover = player_at(&mut rng, "Ada", Position::new(10.0, 10.0), true);
        let mover_id = mover.id.clone();

        let ghost = FreeLine::new(
            &mut rng,
            Position::new(10.0, 10.0),
            Position::new(40.0, 40.0),
            "#222222",
        )
        .docked_from(mover_id.clone());
        let live = FreeLine::new(
            &mut rng,
            Position::new(10.0, 10.0),
            Position::new(70.0, 70.0),
            "#222222",
        )
        .docked_from(mover_id.clone());

        coordinator.add_player(mover.clone()).unwrap();
        coordinator.add_free_line(live.clone()).unwrap();
        // The ghost line exists only in the cache: its store row was
        // never created, so its update fails with EntityNotFound.
        coordinator.on_players_snapshot(vec![mover]);
        coordinator.on_free_lines_snapshot(vec![ghost, live.clone()]);

        let target = Position::new(30.0, 40.0);
        coordinator.update_player_position(&mover_id, target).unwrap();

        let lines = stored_free_lines(&store, &session);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start_position, target);
    }

    #[test]
    fn test_add_card_orders_after_current_count() {
        let (store, coordinator, session) = board();

        coordinator.add_card(None, None, "first").unwrap().unwrap();
        // Simulate snapshot delivery of the first card.
        let sub: Subscription<ProcessCard> = store.subscribe(&session).unwrap();
        coordinator.on_cards_snapshot(sub.latest());

        coordinator.add_card(None, None, "second").unwrap().unwrap();
        let cards = sub.latest();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].order, 1);
        assert_eq!(cards[1].order, 2);
    }

    #[test]
    fn test_removed_player_leaves_dangling_dock() {
        let (store, coordinator, session) = board();
        let mut rng = StdRng::seed_from_u64(11);

        let player = player_at(&mut rng, "Ada", Position::new(10.0, 10.0), true);
        let id = player.id.clone();
        let line = FreeLine::new(
            &mut rng,
            Position::new(10.0, 10.0),
            Position::new(50.0, 50.0),
            "#222222",
        )
        .docked_from(id.clone());

        coordinator.add_player(player).unwrap();
        coordinator.add_free_line(line).unwrap();
        coordinator.remove_player(&id).unwrap();

        assert!(stored_players(&store, &session).is_empty());
        let lines = stored_free_lines(&store, &session);
        assert_eq!(lines[0].start_player_id, Some(id));
    }
}
