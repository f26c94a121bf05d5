//! Technique identifiers and their static descriptors.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Technique
// ════════════════════════════════════════════════════════════════════════════

/// One of the named visual states the scene can display.
///
/// Exactly one technique is current at any time; [`Technique::Neutral`] is
/// both the idle state and the fallback for anything unrecognised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Technique {
    #[default]
    Neutral,
    Red,
    Void,
    Purple,
    Shrine,
    Mahito,
    Hakari,
    Megumi,
    BlackFlash,
    Dismantle,
    Blood,
}

/// Every technique, in declaration order.
pub const ALL_TECHNIQUES: [Technique; 11] = [
    Technique::Neutral,
    Technique::Red,
    Technique::Void,
    Technique::Purple,
    Technique::Shrine,
    Technique::Mahito,
    Technique::Hakari,
    Technique::Megumi,
    Technique::BlackFlash,
    Technique::Dismantle,
    Technique::Blood,
];

/// Returned by [`Technique::from_str`] for a name outside the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown technique identifier: {0:?}")]
pub struct UnknownTechnique(pub String);

impl Technique {
    /// Short lowercase identifier (`"red"`, `"blackflash"`, …).
    pub fn id(self) -> &'static str {
        match self {
            Technique::Neutral    => "neutral",
            Technique::Red        => "red",
            Technique::Void       => "void",
            Technique::Purple     => "purple",
            Technique::Shrine     => "shrine",
            Technique::Mahito     => "mahito",
            Technique::Hakari     => "hakari",
            Technique::Megumi     => "megumi",
            Technique::BlackFlash => "blackflash",
            Technique::Dismantle  => "dismantle",
            Technique::Blood      => "blood",
        }
    }

    /// Parse an identifier, degrading anything unknown to `Neutral`.
    ///
    /// This is the variant used on the frame path, which must never fail.
    pub fn parse_lossy(s: &str) -> Technique {
        s.parse().unwrap_or(Technique::Neutral)
    }

    /// Static metadata for this technique.
    pub fn descriptor(self) -> TechniqueDescriptor {
        let (name, hex, bloom) = match self {
            Technique::Neutral    => ("Neutral State",                                   0x00FFFF, 1.0),
            Technique::Red        => ("Reverse Cursed Technique: Red",                   0xFF3333, 2.5),
            Technique::Void       => ("Domain Expansion: Infinite Void",                 0x00FFFF, 2.0),
            Technique::Purple     => ("Secret Technique: Hollow Purple",                 0xBB00FF, 4.0),
            Technique::Shrine     => ("Domain Expansion: Malevolent Shrine",             0xFF0000, 2.5),
            Technique::Mahito     => ("Domain Expansion: Self-Embodiment of Perfection", 0x00CCAA, 2.0),
            Technique::Hakari     => ("Domain Expansion: Idle Death Gamble",             0xFFAA00, 3.5),
            Technique::Megumi     => ("Domain Expansion: Chimera Shadow Garden",         0x6633AA, 1.5),
            Technique::BlackFlash => ("Black Flash",                                     0xFF3333, 4.5),
            Technique::Dismantle  => ("Cursed Technique: Dismantle",                     0x8B0000, 2.8),
            Technique::Blood      => ("Blood Manipulation",                              0x6B0F1A, 2.2),
        };
        TechniqueDescriptor { name, accent: hex, bloom }
    }

    /// Human-readable hand pose that triggers this technique.
    pub fn gesture_hint(self) -> &'static str {
        match self {
            Technique::Neutral    => "No hand in view",
            Technique::Red        => "Index finger up only",
            Technique::Void       => "Index + Middle up",
            Technique::Purple     => "Pinch + Middle up",
            Technique::Shrine     => "Middle + Ring up",
            Technique::Mahito     => "Thumb + Pinky up",
            Technique::Hakari     => "Thumb up only",
            Technique::Megumi     => "Index + Pinky up",
            Technique::BlackFlash => "Fist (all fingers closed)",
            Technique::Dismantle  => "Index + Middle + Ring up",
            Technique::Blood      => "Open palm facing the camera",
        }
    }

    /// Techniques whose targets must be rebuilt every frame, not only on a
    /// transition.
    pub fn is_time_varying(self) -> bool {
        matches!(self, Technique::Blood)
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Technique {
    type Err = UnknownTechnique;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ALL_TECHNIQUES
            .iter()
            .copied()
            .find(|t| t.id() == key)
            .ok_or(UnknownTechnique(s.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TechniqueDescriptor
// ════════════════════════════════════════════════════════════════════════════

/// Display name, accent color, and bloom strength for one technique.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TechniqueDescriptor {
    pub name:   &'static str,
    /// Packed `0xRRGGBB`.
    pub accent: u32,
    pub bloom:  f32,
}

impl TechniqueDescriptor {
    /// Accent color as `#rrggbb`.
    pub fn accent_hex(&self) -> String {
        format!("#{:06x}", self.accent & 0x00FF_FFFF)
    }

    /// Accent color as linear 0–1 RGB.
    pub fn accent_rgb(&self) -> Vec3 {
        let r = (self.accent >> 16) & 0xFF;
        let g = (self.accent >>  8) & 0xFF;
        let b =  self.accent        & 0xFF;
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
