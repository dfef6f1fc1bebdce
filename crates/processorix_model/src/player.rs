//! # Player
//!
//! A registered participant. Players start in the waiting area
//! (`on_board = false`, no position) and are placed on the canvas by
//! their first drag. Removal is always explicit; lines docked to a
//! removed player keep their dangling reference.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};
use crate::position::Position;

/// A participant registered on a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique id within the `players` collection.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Role label shown under the name (e.g. "Clerk", "Customer").
    pub role: String,
    /// Avatar color, as a CSS-style hex string.
    pub color: String,
    /// Avatar icon (an emoji or short glyph).
    pub icon: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Canvas position, absent while the player is in the waiting area.
    pub position: Option<Position>,
    /// Whether the player has been placed on the canvas.
    pub on_board: bool,
}

impl Player {
    /// Creates a new off-board player with a generated id.
    pub fn new<R: Rng>(
        rng: &mut R,
        name: impl Into<String>,
        role: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::generate(rng),
            name: name.into(),
            role: role.into(),
            color: color.into(),
            icon: icon.into(),
            description: None,
            position: None,
            on_board: false,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a [`Player`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPatch {
    /// New display name.
    pub name: Option<String>,
    /// New role label.
    pub role: Option<String>,
    /// New avatar color.
    pub color: Option<String>,
    /// New avatar icon.
    pub icon: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New canvas position.
    pub position: Option<Position>,
    /// New placement flag.
    pub on_board: Option<bool>,
}

impl PlayerPatch {
    /// A patch carrying only a position change.
    #[must_use]
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// A patch placing the player on the canvas at `position`.
    ///
    /// Position and flag travel in one write so no observer can see a
    /// placed player without a position.
    #[must_use]
    pub fn placed_at(position: Position) -> Self {
        Self {
            position: Some(position),
            on_board: Some(true),
            ..Self::default()
        }
    }
}

impl Entity for Player {
    type Patch = PlayerPatch;

    const COLLECTION: &'static str = "players";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(role) = &patch.role {
            self.role.clone_from(role);
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(icon) = &patch.icon {
            self.icon.clone_from(icon);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(position) = patch.position {
            self.position = Some(position);
        }
        if let Some(on_board) = patch.on_board {
            self.on_board = on_board;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_player_starts_off_board() {
        let mut rng = StdRng::seed_from_u64(1);
        let player = Player::new(&mut rng, "Ada", "Analyst", "#ff8800", "A");
        assert!(!player.on_board);
        assert!(player.position.is_none());
    }

    #[test]
    fn test_patch_overwrites_only_present_fields() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = Player::new(&mut rng, "Ada", "Analyst", "#ff8800", "A");
        player.apply(&PlayerPatch::placed_at(Position::new(30.0, 40.0)));
        assert!(player.on_board);
        assert_eq!(player.position, Some(Position::new(30.0, 40.0)));
        assert_eq!(player.name, "Ada");

        player.apply(&PlayerPatch::position(Position::new(5.0, 5.0)));
        assert!(player.on_board);
        assert_eq!(player.position, Some(Position::new(5.0, 5.0)));
    }
}
