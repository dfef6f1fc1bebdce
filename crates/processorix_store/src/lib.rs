//! # Processorix Store
//!
//! The entity-store collaborator: a document-oriented, real-time
//! subscribable persistence layer keyed by session id.
//!
//! ## Contract
//!
//! Per session, five independent collections (players, process steps,
//! process objects, free lines, decision lines), each offering:
//!
//! - `create` - upsert a full document
//! - `update` - apply a partial patch (field-level last-write-wins)
//! - `remove` - delete by id (idempotent)
//! - `subscribe` - push-based full-snapshot delivery
//!
//! ## Delivery model
//!
//! ```text
//! writer ──▶ collection slot ──▶ watch channel ──▶ subscriber A
//!                                       └────────▶ subscriber B
//! ```
//!
//! Every mutation publishes a *whole-collection snapshot*. Snapshots are
//! ordered per collection; there is no cross-collection ordering. A
//! subscriber that falls behind only ever observes the latest snapshot -
//! intermediate states may be skipped, never reordered.
//!
//! The [`MemoryStore`] is the reference implementation; the traits in
//! [`collection`] are the seam a remote document store would implement
//! instead.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod collection;
pub mod error;
pub mod memory;

pub use collection::{CollectionStore, EntityStore, Subscription};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
