//! Synthetic hand poses.
//!
//! Builds plausible 21-point skeletons from a per-digit description.  Used
//! by the keyboard simulation source and by tests that need landmark input
//! matching one finger-state pattern exactly.
//!
//! The skeleton is an upright right hand seen from behind (palm normal
//! `+z`); [`HandPose::facing_viewer`] mirrors it so the palm points at the
//! camera.

use crate::landmark::*;

/// Posture of a single digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Digit {
    /// Clearly extended.
    Up,
    /// Lowered below its PIP joint but not folded to the palm.
    Down,
    /// Folded so the tip sits close to the wrist.
    Curled,
    /// Near horizontal: neither up nor down under default thresholds.
    Hover,
}

// Layout in normalised image units.
const WRIST_AT:   (f32, f32) = (0.50, 0.90);
const FINGER_X:   [f32; 4]   = [0.42, 0.48, 0.54, 0.60];
const MCP_Y:      f32 = 0.72;
const PIP_Y:      f32 = 0.62;
const THUMB_CMC_AT: (f32, f32) = (0.42, 0.85);
const THUMB_MCP_AT: (f32, f32) = (0.38, 0.78);
const PINCH_OFFSET: f32 = 0.01;

/// Builder for a synthetic [`Hand`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    thumb:   Digit,
    fingers: [Digit; 4],
    pinch:   bool,
    facing:  bool,
    shift:   (f32, f32),
}

impl Default for HandPose {
    fn default() -> Self {
        Self::new()
    }
}

impl HandPose {
    /// Relaxed hand: thumb and every finger lowered.
    pub fn new() -> Self {
        HandPose {
            thumb:   Digit::Down,
            fingers: [Digit::Down; 4],
            pinch:   false,
            facing:  false,
            shift:   (0.0, 0.0),
        }
    }

    pub fn thumb(mut self, d: Digit) -> Self  { self.thumb = d; self }
    pub fn index(mut self, d: Digit) -> Self  { self.fingers[0] = d; self }
    pub fn middle(mut self, d: Digit) -> Self { self.fingers[1] = d; self }
    pub fn ring(mut self, d: Digit) -> Self   { self.fingers[2] = d; self }
    pub fn pinky(mut self, d: Digit) -> Self  { self.fingers[3] = d; self }

    pub fn all_fingers(mut self, d: Digit) -> Self {
        self.fingers = [d; 4];
        self
    }

    /// Put the thumb tip against the index tip.
    pub fn pinch(mut self) -> Self {
        self.pinch = true;
        self
    }

    /// Turn the palm toward the camera.
    pub fn facing_viewer(mut self) -> Self {
        self.facing = true;
        self
    }

    /// Translate the whole hand in image space.
    pub fn shifted(mut self, dx: f32, dy: f32) -> Self {
        self.shift = (dx, dy);
        self
    }

    pub fn build(&self) -> Hand {
        let mut lm = [Landmark::default(); LANDMARK_COUNT];
        lm[WRIST] = point(WRIST_AT);

        for (f, (&digit, &x)) in self.fingers.iter().zip(FINGER_X.iter()).enumerate() {
            let mcp = INDEX_MCP + f * 4;
            let (dip_y, tip_y) = finger_tip_y(digit);
            lm[mcp]     = point((x, MCP_Y));
            lm[mcp + 1] = point((x, PIP_Y));
            lm[mcp + 2] = point((x, dip_y));
            lm[mcp + 3] = point((x, tip_y));
        }

        let (ip, tip) = match self.thumb {
            Digit::Up    => ((0.34, 0.66), (0.33, 0.55)),
            Digit::Hover => ((0.35, 0.70), (0.34, 0.70)),
            Digit::Down | Digit::Curled => ((0.36, 0.70), (0.37, 0.74)),
        };
        lm[THUMB_CMC] = point(THUMB_CMC_AT);
        lm[THUMB_MCP] = point(THUMB_MCP_AT);
        lm[THUMB_IP]  = point(ip);
        lm[THUMB_TIP] = point(tip);
        if self.pinch {
            let index = lm[INDEX_TIP];
            lm[THUMB_TIP] = Landmark::new(index.x + PINCH_OFFSET, index.y + PINCH_OFFSET, 0.0);
        }

        for p in &mut lm {
            p.x += self.shift.0;
            p.y += self.shift.1;
        }
        let hand = Hand::new(lm);
        if self.facing { hand.mirrored() } else { hand }
    }
}

fn point((x, y): (f32, f32)) -> Landmark {
    Landmark::new(x, y, 0.0)
}

/// `(dip_y, tip_y)` for a finger whose PIP sits at `PIP_Y`.
fn finger_tip_y(d: Digit) -> (f32, f32) {
    match d {
        Digit::Up     => (0.55, 0.48),
        Digit::Down   => (0.64, 0.66),
        Digit::Curled => (0.70, 0.80),
        Digit::Hover  => (0.61, 0.60),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Presets
// ════════════════════════════════════════════════════════════════════════════

impl HandPose {
    pub fn red() -> Self {
        Self::new().index(Digit::Up)
    }

    pub fn void() -> Self {
        Self::new().index(Digit::Up).middle(Digit::Up)
    }

    pub fn purple() -> Self {
        Self::new().middle(Digit::Up).pinch()
    }

    pub fn shrine() -> Self {
        Self::new().middle(Digit::Up).ring(Digit::Up)
    }

    pub fn mahito() -> Self {
        Self::new().thumb(Digit::Up).pinky(Digit::Up)
    }

    pub fn hakari() -> Self {
        Self::new().thumb(Digit::Up)
    }

    pub fn megumi() -> Self {
        Self::new().index(Digit::Up).pinky(Digit::Up)
    }

    pub fn dismantle() -> Self {
        Self::new().index(Digit::Up).middle(Digit::Up).ring(Digit::Up)
    }

    pub fn fist() -> Self {
        Self::new().all_fingers(Digit::Curled)
    }

    pub fn blood() -> Self {
        Self::new().thumb(Digit::Up).all_fingers(Digit::Up).facing_viewer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_every_landmark() {
        let base = HandPose::red().build();
        let moved = HandPose::red().shifted(0.1, -0.05).build();
        for (a, b) in base.landmarks().iter().zip(moved.landmarks()) {
            assert!((b.x - a.x - 0.1).abs() < 1e-6);
            assert!((b.y - a.y + 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn pinch_tracks_a_lowered_index() {
        let hand = HandPose::purple().build();
        assert!(hand[THUMB_TIP].planar_distance(hand[INDEX_TIP]) < 0.02);
    }

    #[test]
    fn every_landmark_is_inside_the_frame() {
        for pose in [HandPose::fist(), HandPose::blood(), HandPose::dismantle()] {
            for lm in pose.build().landmarks() {
                assert!((0.0..=1.0).contains(&lm.x) && (0.0..=1.0).contains(&lm.y));
            }
        }
    }
}
