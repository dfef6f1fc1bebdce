//! # Processorix Sync
//!
//! The snapshot-driven synchronization layer between the entity store
//! and the presentation layer.
//!
//! ## Responsibilities
//!
//! - Cache the latest snapshot of each collection (snapshot-replace,
//!   never merge)
//! - Reconcile the default palette: seed communication methods and
//!   connector gates, delete deprecated defaults
//! - Propagate player moves into the denormalized endpoints of docked
//!   lines with minimal, independent patches
//! - Gate intents on an attached session, dropping them silently when
//!   none is attached
//!
//! ## Layout
//!
//! - [`coordinator`] - the state holder and intent surface
//! - [`reconcile`] - the corrective pass over object snapshots
//! - [`defaults`] - the seeded object templates
//! - [`runtime`] - tokio tasks pumping store subscriptions into the
//!   coordinator

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod coordinator;
pub mod defaults;
pub mod reconcile;
pub mod runtime;

pub use coordinator::Coordinator;
pub use reconcile::ReconcileReport;
pub use runtime::SyncRuntime;
