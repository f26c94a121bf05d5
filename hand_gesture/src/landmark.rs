//! Landmark, hand, and frame types.
//!
//! Indices follow the MediaPipe hand skeleton: 0 is the wrist, then four
//! joints per digit from the palm outward (thumb 1–4, index 5–8, middle
//! 9–12, ring 13–16, pinky 17–20).

use std::ops::Index;

use glam::{Vec2, Vec3};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Skeleton indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongLandmarkCount(usize),

    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),

    #[error("invalid gesture thresholds: {0}")]
    InvalidThresholds(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One skeleton point: `x`, `y` normalised to the video frame (`y` grows
/// downward), `z` relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Distance in the image plane, ignoring depth.
    pub fn planar_distance(self, other: Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// A detected hand: exactly [`LANDMARK_COUNT`] landmarks.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Hand { landmarks }
    }

    /// Build from a detector slice, rejecting wrong lengths and NaNs.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, HandError> {
        let landmarks: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| HandError::WrongLandmarkCount(points.len()))?;
        if let Some(bad) = landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(HandError::NonFinite(bad));
        }
        Ok(Hand { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn wrist(&self) -> Landmark {
        self.landmarks[WRIST]
    }

    /// Index fingertip in pixels for a `width × height` viewport.
    pub fn index_tip_screen(&self, width: f32, height: f32) -> Vec2 {
        let tip = self.landmarks[INDEX_TIP];
        Vec2::new(tip.x * width, tip.y * height)
    }

    /// Mirror horizontally (`x → 1 − x`), as a selfie camera does.
    pub fn mirrored(&self) -> Hand {
        let mut landmarks = self.landmarks;
        for lm in &mut landmarks {
            lm.x = 1.0 - lm.x;
        }
        Hand { landmarks }
    }
}

impl Index<usize> for Hand {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// Every hand the detector reported for one video frame, in detection
/// order.  Frames carry no identity across time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandFrame {
    pub hands: Vec<Hand>,
}

impl HandFrame {
    pub fn empty() -> Self {
        HandFrame::default()
    }

    pub fn single(hand: Hand) -> Self {
        HandFrame { hands: vec![hand] }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    pub fn first(&self) -> Option<&Hand> {
        self.hands.first()
    }

    /// Index fingertips of every hand, in pixels.  Empty when no hand is
    /// present.
    pub fn index_tip_screen_points(&self, width: f32, height: f32) -> Vec<Vec2> {
        self.hands
            .iter()
            .map(|h| h.index_tip_screen(width, height))
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize) -> Vec<Landmark> {
        (0..n).map(|i| Landmark::new(i as f32 / 21.0, 0.5, 0.0)).collect()
    }

    #[test]
    fn from_slice_accepts_exactly_21() {
        let hand = Hand::from_slice(&flat(21)).unwrap();
        assert_eq!(hand[INDEX_TIP].x, 8.0 / 21.0);
    }

    #[test]
    fn from_slice_rejects_wrong_count() {
        assert_eq!(Hand::from_slice(&flat(20)), Err(HandError::WrongLandmarkCount(20)));
        assert_eq!(Hand::from_slice(&flat(22)), Err(HandError::WrongLandmarkCount(22)));
    }

    #[test]
    fn from_slice_rejects_nan() {
        let mut pts = flat(21);
        pts[7].y = f32::NAN;
        assert_eq!(Hand::from_slice(&pts), Err(HandError::NonFinite(7)));
    }

    #[test]
    fn screen_points_follow_index_tips() {
        let hand = Hand::from_slice(&flat(21)).unwrap();
        let frame = HandFrame { hands: vec![hand.clone(), hand] };
        let pts = frame.index_tip_screen_points(210.0, 100.0);
        assert_eq!(pts.len(), 2);
        assert!((pts[0].x - 80.0).abs() < 1e-4);
        assert_eq!(pts[0].y, 50.0);
        assert!(HandFrame::empty().index_tip_screen_points(1.0, 1.0).is_empty());
    }

    #[test]
    fn mirroring_flips_x_only() {
        let hand = Hand::from_slice(&flat(21)).unwrap();
        let m = hand.mirrored();
        assert!((m[INDEX_TIP].x - (1.0 - 8.0 / 21.0)).abs() < 1e-6);
        assert_eq!(m[INDEX_TIP].y, hand[INDEX_TIP].y);
    }
}
