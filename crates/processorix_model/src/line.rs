//! # Connector Lines
//!
//! Two line kinds connect things on the canvas:
//!
//! - [`FreeLine`] - two endpoints, each either a fixed point or docked to
//!   a player.
//! - [`DecisionLine`] - a branching decision with a start and up to two
//!   downstream option targets.
//!
//! Endpoint positions are denormalized: a docked endpoint stores a copy
//! of the referenced player's position so the renderer never joins
//! collections. The coordinator rewrites the copies when the player
//! moves; each endpoint is patched independently, so a line docked on one
//! side only never sees its free side touched.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::{timestamp_millis, Entity, EntityId};
use crate::position::Position;

/// A connector between two arbitrary endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreeLine {
    /// Unique id within the `freeLines` collection.
    pub id: EntityId,
    /// Position of the start endpoint (denormalized when docked).
    pub start_position: Position,
    /// Position of the end endpoint (denormalized when docked).
    pub end_position: Position,
    /// Player the start endpoint is docked to, if any.
    pub start_player_id: Option<EntityId>,
    /// Player the end endpoint is docked to, if any.
    pub end_player_id: Option<EntityId>,
    /// Line color, as a CSS-style hex string.
    pub color: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl FreeLine {
    /// Creates a new line between two fixed points.
    pub fn new<R: Rng>(
        rng: &mut R,
        start_position: Position,
        end_position: Position,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::generate(rng),
            start_position,
            end_position,
            start_player_id: None,
            end_player_id: None,
            color: color.into(),
            created_at: timestamp_millis(),
        }
    }

    /// Docks the start endpoint to a player.
    #[must_use]
    pub fn docked_from(mut self, player_id: EntityId) -> Self {
        self.start_player_id = Some(player_id);
        self
    }

    /// Docks the end endpoint to a player.
    #[must_use]
    pub fn docked_to(mut self, player_id: EntityId) -> Self {
        self.end_player_id = Some(player_id);
        self
    }
}

/// Partial update for a [`FreeLine`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeLinePatch {
    /// New start-endpoint position.
    pub start_position: Option<Position>,
    /// New end-endpoint position.
    pub end_position: Option<Position>,
    /// New start dock reference (`Some(None)` undocks).
    pub start_player_id: Option<Option<EntityId>>,
    /// New end dock reference (`Some(None)` undocks).
    pub end_player_id: Option<Option<EntityId>>,
    /// New line color.
    pub color: Option<String>,
}

impl FreeLinePatch {
    /// A patch moving only the start endpoint.
    #[must_use]
    pub fn start_position(position: Position) -> Self {
        Self {
            start_position: Some(position),
            ..Self::default()
        }
    }

    /// A patch moving only the end endpoint.
    #[must_use]
    pub fn end_position(position: Position) -> Self {
        Self {
            end_position: Some(position),
            ..Self::default()
        }
    }
}

impl Entity for FreeLine {
    type Patch = FreeLinePatch;

    const COLLECTION: &'static str = "freeLines";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(position) = patch.start_position {
            self.start_position = position;
        }
        if let Some(position) = patch.end_position {
            self.end_position = position;
        }
        if let Some(dock) = &patch.start_player_id {
            self.start_player_id = dock.clone();
        }
        if let Some(dock) = &patch.end_player_id {
            self.end_player_id = dock.clone();
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
    }
}

/// A branching decision connector with up to three docked roles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionLine {
    /// Unique id within the `decisionLines` collection.
    pub id: EntityId,
    /// Position of the decision origin (denormalized when docked).
    pub start_position: Position,
    /// Position of the first option target (denormalized when docked).
    pub option1_position: Position,
    /// Position of the second option target (denormalized when docked).
    pub option2_position: Position,
    /// Player the origin is docked to, if any.
    pub start_player_id: Option<EntityId>,
    /// Player the first option is docked to, if any.
    pub option1_player_id: Option<EntityId>,
    /// Player the second option is docked to, if any.
    pub option2_player_id: Option<EntityId>,
    /// Line color, as a CSS-style hex string.
    pub color: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl DecisionLine {
    /// Creates a new decision line between three fixed points.
    pub fn new<R: Rng>(
        rng: &mut R,
        start_position: Position,
        option1_position: Position,
        option2_position: Position,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::generate(rng),
            start_position,
            option1_position,
            option2_position,
            start_player_id: None,
            option1_player_id: None,
            option2_player_id: None,
            color: color.into(),
            created_at: timestamp_millis(),
        }
    }

    /// Docks the origin to a player.
    #[must_use]
    pub fn docked_from(mut self, player_id: EntityId) -> Self {
        self.start_player_id = Some(player_id);
        self
    }

    /// Docks the first option target to a player.
    #[must_use]
    pub fn docked_option1(mut self, player_id: EntityId) -> Self {
        self.option1_player_id = Some(player_id);
        self
    }

    /// Docks the second option target to a player.
    #[must_use]
    pub fn docked_option2(mut self, player_id: EntityId) -> Self {
        self.option2_player_id = Some(player_id);
        self
    }
}

/// Partial update for a [`DecisionLine`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionLinePatch {
    /// New origin position.
    pub start_position: Option<Position>,
    /// New first-option position.
    pub option1_position: Option<Position>,
    /// New second-option position.
    pub option2_position: Option<Position>,
    /// New origin dock reference (`Some(None)` undocks).
    pub start_player_id: Option<Option<EntityId>>,
    /// New first-option dock reference (`Some(None)` undocks).
    pub option1_player_id: Option<Option<EntityId>>,
    /// New second-option dock reference (`Some(None)` undocks).
    pub option2_player_id: Option<Option<EntityId>>,
    /// New line color.
    pub color: Option<String>,
}

impl Entity for DecisionLine {
    type Patch = DecisionLinePatch;

    const COLLECTION: &'static str = "decisionLines";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(position) = patch.start_position {
            self.start_position = position;
        }
        if let Some(position) = patch.option1_position {
            self.option1_position = position;
        }
        if let Some(position) = patch.option2_position {
            self.option2_position = position;
        }
        if let Some(dock) = &patch.start_player_id {
            self.start_player_id = dock.clone();
        }
        if let Some(dock) = &patch.option1_player_id {
            self.option1_player_id = dock.clone();
        }
        if let Some(dock) = &patch.option2_player_id {
            self.option2_player_id = dock.clone();
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
    }
}
