//! # Processorix Model
//!
//! Shared domain types for the Processorix synchronization core.
//!
//! A board ("session") holds five independently synchronized collections:
//!
//! - [`Player`] - a registered participant, optionally placed on the canvas
//! - [`ProcessCard`] - a directed process step between two players
//! - [`ProcessObject`] - a session-global palette entry (icons, tools, gates)
//! - [`FreeLine`] - a two-endpoint connector, each endpoint optionally
//!   docked to a player
//! - [`DecisionLine`] - a branching connector with up to three docked roles
//!
//! ## CRITICAL RULE
//!
//! Docked line endpoints carry a *denormalized copy* of the referenced
//! player's position. The model only stores the copy; keeping it consistent
//! is the synchronization coordinator's job, not the model's.
//!
//! Every entity implements [`Entity`], which ties it to its patch type.
//! Patches carry only the fields being written; applying one overwrites
//! exactly the present fields (field-level last-write-wins).

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod card;
pub mod entity;
pub mod line;
pub mod object;
pub mod player;
pub mod position;
pub mod session;

pub use card::{ProcessCard, ProcessCardPatch};
pub use entity::{timestamp_millis, Entity, EntityId};
pub use line::{DecisionLine, DecisionLinePatch, FreeLine, FreeLinePatch};
pub use object::{CommunicationProfile, ObjectCategory, ProcessObject, ProcessObjectPatch};
pub use player::{Player, PlayerPatch};
pub use position::Position;
pub use session::{SessionId, SessionRequest, NEW_SESSION_SENTINEL, SESSION_CODE_LEN};
