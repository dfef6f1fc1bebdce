//! # Process Card
//!
//! A process step: a directed transfer between two players, or a
//! free-floating annotation when it has no originating player. Cards are
//! ordered by an explicit `order` index so every client lists the steps
//! identically.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::{timestamp_millis, Entity, EntityId};

/// A directed process step between two players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessCard {
    /// Unique id within the `processSteps` collection.
    pub id: EntityId,
    /// Originating player; `None` marks a free origin.
    pub from_player_id: Option<EntityId>,
    /// Target player.
    pub to_player_id: Option<EntityId>,
    /// Step description shown on the card.
    pub text: String,
    /// Transfer medium (e.g. "email", "paper form").
    pub medium: Option<String>,
    /// Typical duration, free text.
    pub duration: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Position in the step list, 1-based.
    ///
    /// New cards default to `current count + 1`; the caller supplies the
    /// count because only the coordinator sees the live collection.
    pub order: u32,
}

impl ProcessCard {
    /// Creates a new card with a generated id and the current timestamp.
    pub fn new<R: Rng>(
        rng: &mut R,
        from_player_id: Option<EntityId>,
        to_player_id: Option<EntityId>,
        text: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: EntityId::generate(rng),
            from_player_id,
            to_player_id,
            text: text.into(),
            medium: None,
            duration: None,
            description: None,
            created_at: timestamp_millis(),
            order,
        }
    }

    /// Sets the transfer medium.
    #[must_use]
    pub fn with_medium(mut self, medium: impl Into<String>) -> Self {
        self.medium = Some(medium.into());
        self
    }

    /// Sets the typical duration.
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Partial update for a [`ProcessCard`].
///
/// Endpoints and timestamps are immutable after creation; only text and
/// metadata can be edited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessCardPatch {
    /// New step description.
    pub text: Option<String>,
    /// New transfer medium.
    pub medium: Option<String>,
    /// New duration.
    pub duration: Option<String>,
    /// New longer description.
    pub description: Option<String>,
    /// New list position.
    pub order: Option<u32>,
}

impl Entity for ProcessCard {
    type Patch = ProcessCardPatch;

    const COLLECTION: &'static str = "processSteps";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(text) = &patch.text {
            self.text.clone_from(text);
        }
        if let Some(medium) = &patch.medium {
            self.medium = Some(medium.clone());
        }
        if let Some(duration) = &patch.duration {
            self.duration = Some(duration.clone());
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}
