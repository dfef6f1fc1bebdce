//! # Board Position
//!
//! Positions are expressed in percentage coordinates relative to the
//! canvas, so every connected client renders the same layout regardless
//! of its own viewport size.

use serde::{Deserialize, Serialize};

/// A 2-D position on the board, in percent of the canvas (0.0 - 100.0).
///
/// Values outside the canvas are not clamped; a drag release decides
/// where an entity lands, and the renderer is free to clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, percent of canvas width.
    pub x: f32,
    /// Vertical coordinate, percent of canvas height.
    pub y: f32,
}

impl Position {
    /// Creates a position from percentage coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
