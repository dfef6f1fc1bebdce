//! # Store Error Types
//!
//! All errors the entity store can surface. Writers log these and move
//! on; the snapshot stream redelivers consistent state, so a failed
//! write self-heals on the next successful one.

use processorix_model::{EntityId, SessionId};
use thiserror::Error;

/// Errors that can occur in the entity store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// A patch addressed an id the collection does not hold.
    #[error("entity not found in {collection}: {id}")]
    EntityNotFound {
        /// Collection that was addressed.
        collection: &'static str,
        /// Id that was not found.
        id: EntityId,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
