//! Derived geometry: finger extension, curl, thumb, pinch, palm normal.
//!
//! Every function here is a pure read of one [`Hand`].

use glam::Vec3;

use crate::landmark::*;
use crate::thresholds::GestureThresholds;

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The four non-thumb digits.  The thumb bends on a different axis and
/// has its own test ([`is_thumb_up`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> usize {
        match self {
            Finger::Index  => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring   => RING_TIP,
            Finger::Pinky  => PINKY_TIP,
        }
    }

    pub fn pip(self) -> usize {
        match self {
            Finger::Index  => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring   => RING_PIP,
            Finger::Pinky  => PINKY_PIP,
        }
    }

    pub fn mcp(self) -> usize {
        match self {
            Finger::Index  => INDEX_MCP,
            Finger::Middle => MIDDLE_MCP,
            Finger::Ring   => RING_MCP,
            Finger::Pinky  => PINKY_MCP,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Predicates
// ════════════════════════════════════════════════════════════════════════════

/// How far the fingertip sits above its PIP joint (positive = above).
pub fn extension(hand: &Hand, finger: Finger) -> f32 {
    hand[finger.pip()].y - hand[finger.tip()].y
}

pub fn is_finger_up(hand: &Hand, finger: Finger, th: &GestureThresholds) -> bool {
    extension(hand, finger) > th.extension
}

/// Clearly lowered.  Not the negation of [`is_finger_up`]: extensions in
/// `(not_up, extension]` satisfy neither.
pub fn is_finger_not_up(hand: &Hand, finger: Finger, th: &GestureThresholds) -> bool {
    extension(hand, finger) <= th.not_up
}

/// Fingertip folded back toward the wrist.
pub fn is_curled(hand: &Hand, finger: Finger, th: &GestureThresholds) -> bool {
    hand[finger.tip()].planar_distance(hand.wrist()) < th.curl
}

/// Thumb tip clears its IP joint by the margin and sits above its MCP.
pub fn is_thumb_up(hand: &Hand, th: &GestureThresholds) -> bool {
    let tip = hand[THUMB_TIP].y;
    tip < hand[THUMB_IP].y - th.thumb_margin && tip < hand[THUMB_MCP].y
}

/// Thumb-tip to index-tip distance in the image plane.
pub fn pinch_distance(hand: &Hand) -> f32 {
    hand[INDEX_TIP].planar_distance(hand[THUMB_TIP])
}

/// Unit normal of the palm plane: `(index_mcp − wrist) × (pinky_mcp − wrist)`.
///
/// In image coordinates a negative `z` means the palm faces the camera.
/// A degenerate palm (collinear knuckles) yields `+Z`.
pub fn palm_normal(hand: &Hand) -> Vec3 {
    let wrist = hand.wrist().to_vec3();
    let v1 = hand[INDEX_MCP].to_vec3() - wrist;
    let v2 = hand[PINKY_MCP].to_vec3() - wrist;
    v1.cross(v2).try_normalize().unwrap_or(Vec3::Z)
}

// ════════════════════════════════════════════════════════════════════════════
// FingerStates
// ════════════════════════════════════════════════════════════════════════════

/// Every boolean the classifier needs, measured once per hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FingerStates {
    pub thumb_up:    bool,
    /// Indexed by `Finger as usize`.
    pub up:          [bool; 4],
    pub not_up:      [bool; 4],
    pub curled:      [bool; 4],
    pub pinch:       f32,
    pub palm_normal: Vec3,
}

impl FingerStates {
    pub fn measure(hand: &Hand, th: &GestureThresholds) -> Self {
        FingerStates {
            thumb_up:    is_thumb_up(hand, th),
            up:          Finger::ALL.map(|f| is_finger_up(hand, f, th)),
            not_up:      Finger::ALL.map(|f| is_finger_not_up(hand, f, th)),
            curled:      Finger::ALL.map(|f| is_curled(hand, f, th)),
            pinch:       pinch_distance(hand),
            palm_normal: palm_normal(hand),
        }
    }

    pub fn is_up(&self, finger: Finger) -> bool {
        self.up[finger as usize]
    }

    pub fn is_down(&self, finger: Finger) -> bool {
        self.not_up[finger as usize]
    }

    /// All four fingertips curled and none registering up.
    pub fn is_fist(&self) -> bool {
        self.curled.iter().all(|&c| c) && self.up.iter().all(|&u| !u)
    }

    /// Thumb and all four fingers up.
    pub fn is_open_palm(&self) -> bool {
        self.thumb_up && self.up.iter().all(|&u| u)
    }

    pub fn palm_faces_viewer(&self, th: &GestureThresholds) -> bool {
        self.palm_normal.z < th.palm_facing_z
    }

    pub fn is_pinching(&self, th: &GestureThresholds) -> bool {
        self.pinch < th.pinch
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
