//! # Processorix
//!
//! A collaborative process-mapping board: participants ("players"),
//! directed process steps, palette objects, and docked connector lines,
//! all synchronized through snapshot push.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  intents   ┌──────────────┐  writes   ┌─────────────┐
//! │ view layer │ ─────────▶ │ coordinator  │ ────────▶ │ entity store│
//! │  (caller)  │ ◀───────── │ (sync crate) │ ◀──────── │ (per-session│
//! └────────────┘   caches   └──────────────┘ snapshots │ collections)│
//!                                                      └─────────────┘
//! ```
//!
//! This crate wires the layers for one session and exposes the result
//! as [`BoardApp`]. All board semantics live in the lower crates.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;

use std::sync::Arc;

use processorix_model::SessionId;
use processorix_store::{MemoryStore, StoreResult};
use processorix_sync::{Coordinator, SyncRuntime};
use tracing::info;

pub use config::{BoardConfig, ConfigError, ViewMode};

/// One open board: a store, a coordinator, and the runtime pumping
/// snapshots between them.
///
/// Must be created inside a tokio runtime; the subscription tasks spawn
/// onto the ambient one.
pub struct BoardApp {
    config: BoardConfig,
    store: Arc<MemoryStore>,
    coordinator: Arc<Coordinator<MemoryStore>>,
    runtime: SyncRuntime,
}

impl BoardApp {
    /// Opens the board the configuration asks for on a fresh store.
    pub fn open(config: BoardConfig) -> StoreResult<Self> {
        Self::open_on(config, Arc::new(MemoryStore::new()))
    }

    /// Opens the board on a shared store.
    ///
    /// Two apps opened on the same store and session code are two
    /// clients of the same board; each gets its own coordinator and
    /// subscription tasks.
    pub fn open_on(config: BoardConfig, store: Arc<MemoryStore>) -> StoreResult<Self> {
        let session = store.open_session(&config.session_request());
        info!(session = %session, view = ?config.view_mode, "opening board");

        let coordinator = Arc::new(Coordinator::new(Arc::clone(&store)));
        let runtime = SyncRuntime::spawn(Arc::clone(&coordinator), session)?;

        Ok(Self {
            config,
            store,
            coordinator,
            runtime,
        })
    }

    /// The configuration this board was opened with.
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The session code of this board.
    #[must_use]
    pub fn session(&self) -> &SessionId {
        self.runtime.session()
    }

    /// The coordinator: intent surface and snapshot caches.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<Coordinator<MemoryStore>> {
        &self.coordinator
    }

    /// The underlying store, for sharing with further clients.
    #[must_use]
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Yields until the snapshot pumps have drained pending deliveries.
    ///
    /// Delivery is asynchronous; callers that need to observe the
    /// effect of their own writes in the caches wait here first.
    pub async fn settle(&self) {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    /// Stops the subscription tasks. The session and its data stay in
    /// the store for other clients.
    pub fn close(self) {
        info!(session = %self.runtime.session(), "closing board");
        self.runtime.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use processorix_model::SESSION_CODE_LEN;

    fn join_config(code: &str) -> BoardConfig {
        BoardConfig {
            session: code.to_string(),
            ..BoardConfig::default()
        }
    }

    #[tokio::test]
    async fn test_open_with_default_config_creates_session() {
        let app = BoardApp::open(BoardConfig::default()).unwrap();
        assert_eq!(app.session().as_str().len(), SESSION_CODE_LEN);
        assert!(app.store().has_session(app.session()));
        app.close();
    }

    #[tokio::test]
    async fn test_open_joining_a_code_materializes_it() {
        let app = BoardApp::open(join_config("abcd")).unwrap();
        assert_eq!(app.session().as_str(), "ABCD");
        app.close();
    }

    #[tokio::test]
    async fn test_two_clients_share_one_board() {
        let first = BoardApp::open(join_config("ABCD")).unwrap();
        let second = BoardApp::open_on(join_config("ABCD"), Arc::clone(first.store())).unwrap();
        assert_eq!(first.session(), second.session());

        first.settle().await;
        second.settle().await;

        // Both caches carry the seeded palette defaults.
        assert_eq!(first.coordinator().objects().len(), 8);
        assert_eq!(second.coordinator().objects().len(), 8);

        second.close();
        first.close();
    }
}
