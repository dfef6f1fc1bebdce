//! # Default Palette Objects
//!
//! Fixed object sets every board is expected to carry. Seeding is
//! detection-based, not exact-match: any communication object at all
//! suppresses the communication set, while each connector gate is
//! checked (and seeded) individually by icon.

use processorix_model::CommunicationProfile;

/// Template for a seeded connector gate.
pub struct GateTemplate {
    /// Display name.
    pub name: &'static str,
    /// Gate glyph. Presence of this icon among connector objects marks
    /// the gate as already seeded.
    pub icon: &'static str,
    /// Display color.
    pub color: &'static str,
    /// Description shown in the palette.
    pub description: &'static str,
}

/// Template for a seeded communication method.
pub struct CommunicationTemplate {
    /// Display name.
    pub name: &'static str,
    /// Icon glyph.
    pub icon: &'static str,
    /// Display color.
    pub color: &'static str,
    /// Comparison profile.
    pub profile: CommunicationProfile,
}

const fn profile(speed: u8, reliability: u8, formality: u8, cost: u8) -> CommunicationProfile {
    CommunicationProfile {
        speed: Some(speed),
        reliability: Some(reliability),
        formality: Some(formality),
        cost: Some(cost),
    }
}

/// The five communication methods seeded into an empty palette.
pub const DEFAULT_COMMUNICATION_METHODS: [CommunicationTemplate; 5] = [
    CommunicationTemplate {
        name: "Email",
        icon: "✉️",
        color: "#4a90d9",
        profile: profile(3, 4, 4, 1),
    },
    CommunicationTemplate {
        name: "Phone",
        icon: "📞",
        color: "#2bb673",
        profile: profile(4, 4, 3, 2),
    },
    CommunicationTemplate {
        name: "In person",
        icon: "🤝",
        color: "#e3a008",
        profile: profile(2, 5, 4, 4),
    },
    CommunicationTemplate {
        name: "Chat",
        icon: "💬",
        color: "#8e6bbf",
        profile: profile(5, 3, 2, 1),
    },
    CommunicationTemplate {
        name: "Video call",
        icon: "🎥",
        color: "#d9534f",
        profile: profile(4, 4, 3, 2),
    },
];

/// The three logic gates seeded independently by icon.
pub const DEFAULT_CONNECTOR_GATES: [GateTemplate; 3] = [
    GateTemplate {
        name: "XOR",
        icon: "⊕",
        color: "#5c5c5c",
        description: "Exclusive choice: exactly one outgoing path is taken",
    },
    GateTemplate {
        name: "AND",
        icon: "∧",
        color: "#5c5c5c",
        description: "Parallel split: all outgoing paths are taken",
    },
    GateTemplate {
        name: "OR",
        icon: "∨",
        color: "#5c5c5c",
        description: "Inclusive choice: one or more outgoing paths are taken",
    },
];

/// Retired connector icons, removed on sight.
///
/// Early boards seeded ASCII stand-ins before the gate glyphs existed;
/// any connector object still carrying one is a superseded default.
pub const DEPRECATED_CONNECTOR_ICONS: [&str; 3] = ["X", "+", "O"];
