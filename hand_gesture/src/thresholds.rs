//! Calibration constants for the finger-state tests.
//!
//! All distances are in normalised image units.  None of these are derived;
//! they were tuned by hand against a webcam and are exposed so they can be
//! recalibrated from the scene config.

use serde::Deserialize;

use crate::landmark::HandError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// A finger is *up* when its tip is above its PIP joint by more than
    /// this margin.
    pub extension: f32,
    /// A finger is *not up* when its tip is above its PIP joint by at most
    /// this margin.  Must be below `extension`; the gap is a dead zone.
    pub not_up: f32,
    /// A fingertip closer than this to the wrist is *curled*.
    pub curl: f32,
    /// Thumb-tip to index-tip distance below which the hand is pinching.
    pub pinch: f32,
    /// How far the thumb tip must clear its IP joint to count as up.
    pub thumb_margin: f32,
    /// Palm normal z below this means the palm faces the viewer.
    pub palm_facing_z: f32,
    /// Consecutive fist frames before Black Flash fires.
    pub fist_confirm_frames: u32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        GestureThresholds {
            extension:           0.03,
            not_up:              0.01,
            curl:                0.22,
            pinch:               0.06,
            thumb_margin:        0.01,
            palm_facing_z:       -0.2,
            fist_confirm_frames: 3,
        }
    }
}

impl GestureThresholds {
    /// Reject combinations that would make the classifier contradictory.
    pub fn validate(&self) -> Result<(), HandError> {
        let finite = [
            self.extension, self.not_up, self.curl, self.pinch,
            self.thumb_margin, self.palm_facing_z,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(HandError::InvalidThresholds("non-finite value".into()));
        }
        if self.not_up >= self.extension {
            return Err(HandError::InvalidThresholds(format!(
                "not_up ({}) must be below extension ({})",
                self.not_up, self.extension
            )));
        }
        if self.curl <= 0.0 || self.pinch <= 0.0 {
            return Err(HandError::InvalidThresholds(
                "curl and pinch distances must be positive".into(),
            ));
        }
        if self.fist_confirm_frames == 0 {
            return Err(HandError::InvalidThresholds(
                "fist_confirm_frames must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
