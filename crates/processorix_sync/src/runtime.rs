//! # Subscription Runtime
//!
//! Wires a [`Coordinator`] to its store's push channels. One tokio task
//! per collection pumps snapshots into the matching handler until the
//! session closes or the runtime is shut down.
//!
//! Tasks hold the only long-lived references to the subscriptions; the
//! coordinator itself never polls. When the store drops a session, every
//! subscription stream ends and its task exits on its own.

use std::sync::Arc;

use processorix_model::{DecisionLine, FreeLine, Player, ProcessCard, ProcessObject, SessionId};
use processorix_store::{EntityStore, StoreResult, Subscription};
use tokio::task::JoinHandle;
use tracing::info;

use crate::coordinator::Coordinator;

/// Running subscription tasks for one attached session.
///
/// Dropping the runtime aborts the tasks; prefer [`shutdown`] for an
/// orderly stop.
///
/// [`shutdown`]: SyncRuntime::shutdown
pub struct SyncRuntime {
    session: SessionId,
    tasks: Vec<JoinHandle<()>>,
}

impl SyncRuntime {
    /// Attaches the coordinator to `session` and spawns one pump task
    /// per collection.
    ///
    /// Subscribes to all five collections up front so the pumps start
    /// from a consistent point: each one's first delivery is the
    /// snapshot that existed at spawn time.
    pub fn spawn<S: EntityStore + 'static>(
        coordinator: Arc<Coordinator<S>>,
        session: SessionId,
    ) -> StoreResult<Self> {
        coordinator.attach_session(session.clone());
        let store = Arc::clone(coordinator.store());

        let players: Subscription<Player> = store.subscribe(&session)?;
        let cards: Subscription<ProcessCard> = store.subscribe(&session)?;
        let objects: Subscription<ProcessObject> = store.subscribe(&session)?;
        let free_lines: Subscription<FreeLine> = store.subscribe(&session)?;
        let decision_lines: Subscription<DecisionLine> = store.subscribe(&session)?;

        info!(session = %session, "sync runtime started");

        let tasks = vec![
            spawn_pump(players, {
                let c = Arc::clone(&coordinator);
                move |snapshot| c.on_players_snapshot(snapshot)
            }),
            spawn_pump(cards, {
                let c = Arc::clone(&coordinator);
                move |snapshot| c.on_cards_snapshot(snapshot)
            }),
            spawn_pump(objects, {
                let c = Arc::clone(&coordinator);
                move |snapshot| {
                    c.on_process_objects_snapshot(snapshot);
                }
            }),
            spawn_pump(free_lines, {
                let c = Arc::clone(&coordinator);
                move |snapshot| c.on_free_lines_snapshot(snapshot)
            }),
            spawn_pump(decision_lines, {
                let c = Arc::clone(&coordinator);
                move |snapshot| c.on_decision_lines_snapshot(snapshot)
            }),
        ];

        Ok(Self { session, tasks })
    }

    /// The session this runtime is pumping.
    #[must_use]
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Stops all pump tasks.
    pub fn shutdown(mut self) {
        info!(session = %self.session, "sync runtime stopping");
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SyncRuntime {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_pump<T, F>(mut subscription: Subscription<T>, mut handle: F) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
    F: FnMut(Vec<T>) + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(snapshot) = subscription.recv().await {
            handle(snapshot);
        }
    })
}
