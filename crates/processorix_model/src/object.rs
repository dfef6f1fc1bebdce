//! # Process Object
//!
//! Session-global palette entries, independent of any specific player.
//! Four categories exist and the set is closed: process-step icons,
//! system/tool icons, communication methods and connector gates.
//!
//! Communication methods additionally carry a comparison profile
//! (speed, reliability, formality, cost) used by the palette to rank
//! them; all four attributes are optional.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::{timestamp_millis, Entity, EntityId};

/// Comparison attributes of a communication method, each rated 1-5.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationProfile {
    /// How fast the method delivers.
    pub speed: Option<u8>,
    /// How reliably it reaches the recipient.
    pub reliability: Option<u8>,
    /// How formal it is perceived to be.
    pub formality: Option<u8>,
    /// How costly it is to use.
    pub cost: Option<u8>,
}

/// Category of a [`ProcessObject`]. Closed set; the serialized tag is the
/// kebab-case category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum ObjectCategory {
    /// Icon for a kind of process step.
    ProcessStep,
    /// Icon for a system or tool involved in the process.
    SystemTool,
    /// A communication method with its comparison profile.
    Communication {
        /// Comparison attributes of the method.
        #[serde(flatten)]
        profile: CommunicationProfile,
    },
    /// A logic-gate connector (XOR, AND, OR).
    Connector,
}

impl ObjectCategory {
    /// The serialized tag for this category.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::ProcessStep => "process-step",
            Self::SystemTool => "system-tool",
            Self::Communication { .. } => "communication",
            Self::Connector => "connector",
        }
    }

    /// Whether this is the communication category.
    #[must_use]
    pub const fn is_communication(&self) -> bool {
        matches!(self, Self::Communication { .. })
    }

    /// Whether this is the connector category.
    #[must_use]
    pub const fn is_connector(&self) -> bool {
        matches!(self, Self::Connector)
    }
}

/// A palette entry shared by the whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessObject {
    /// Unique id within the `processObjects` collection.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Icon glyph.
    pub icon: String,
    /// Display color, as a CSS-style hex string.
    pub color: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Category discriminant.
    #[serde(flatten)]
    pub category: ObjectCategory,
}

impl ProcessObject {
    /// Creates a new palette entry with a generated id.
    pub fn new<R: Rng>(
        rng: &mut R,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        category: ObjectCategory,
    ) -> Self {
        Self {
            id: EntityId::generate(rng),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            description: None,
            created_at: timestamp_millis(),
            category,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a [`ProcessObject`]. The category is immutable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessObjectPatch {
    /// New display name.
    pub name: Option<String>,
    /// New icon glyph.
    pub icon: Option<String>,
    /// New display color.
    pub color: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl Entity for ProcessObject {
    type Patch = ProcessObjectPatch;

    const COLLECTION: &'static str = "processObjects";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(icon) = &patch.icon {
            self.icon.clone_from(icon);
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_category_tags_are_the_closed_set() {
        let communication = ObjectCategory::Communication {
            profile: CommunicationProfile::default(),
        };
        assert_eq!(ObjectCategory::ProcessStep.tag(), "process-step");
        assert_eq!(ObjectCategory::SystemTool.tag(), "system-tool");
        assert_eq!(communication.tag(), "communication");
        assert_eq!(ObjectCategory::Connector.tag(), "connector");
    }

    #[test]
    fn test_category_predicates() {
        let communication = ObjectCategory::Communication {
            profile: CommunicationProfile::default(),
        };
        assert!(communication.is_communication());
        assert!(!communication.is_connector());
        assert!(ObjectCategory::Connector.is_connector());
        assert!(!ObjectCategory::ProcessStep.is_communication());
    }

    #[test]
    fn test_patch_keeps_category() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut object =
            ProcessObject::new(&mut rng, "Email", "E", "#3366ff", ObjectCategory::SystemTool);
        object.apply(&ProcessObjectPatch {
            icon: Some("@".to_string()),
            ..ProcessObjectPatch::default()
        });
        assert_eq!(object.icon, "@");
        assert_eq!(object.category, ObjectCategory::SystemTool);
    }
}
