//! # Entity Seam
//!
//! The [`Entity`] trait ties each synchronized kind to its collection name
//! and its patch type. The store and the coordinator are generic over this
//! trait; nothing else in the workspace needs to know which of the five
//! kinds it is moving around.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated entity id.
const ENTITY_ID_LEN: usize = 12;

/// Opaque identifier for a synchronized entity.
///
/// Unique within its collection. Generated client-side so entities can be
/// created without a round trip to the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh random alphanumeric id.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let raw: String = rng
            .sample_iter(&Alphanumeric)
            .take(ENTITY_ID_LEN)
            .map(char::from)
            .collect();
        Self(raw)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A synchronized entity kind.
///
/// Implementors pair the full document shape with a patch shape whose
/// fields are all optional. [`Entity::apply`] overwrites exactly the
/// fields present in the patch - the field-level last-write-wins rule
/// the store provides.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Partial-update shape for this kind.
    type Patch: Clone + Send + Sync + 'static;

    /// Store collection this kind lives in.
    const COLLECTION: &'static str;

    /// The entity's identifier.
    fn id(&self) -> &EntityId;

    /// Applies a partial update, overwriting only the present fields.
    fn apply(&mut self, patch: &Self::Patch);
}

/// Milliseconds since the Unix epoch, for entity creation timestamps.
///
/// Timestamps order entries for display; they take no part in conflict
/// resolution.
#[must_use]
pub fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_ids_are_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = EntityId::generate(&mut rng);
        assert_eq!(id.as_str().len(), ENTITY_ID_LEN);
        assert!(id.as_str().chars().all(char::is_alphanumeric));
    }

    #[test]
    fn test_generated_ids_differ() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = EntityId::generate(&mut rng);
        let b = EntityId::generate(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_is_nonzero() {
        assert!(timestamp_millis() > 0);
    }
}
