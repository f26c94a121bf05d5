//! # hand_gesture
//!
//! Turns one frame of 21-point hand landmarks into exactly one
//! [`Technique`](technique_field::Technique).
//!
//! ## Pipeline
//!
//! ```text
//! HandFrame ──► FingerStates::measure (per hand) ──► classify ──► Classification
//!                 up / not-up / curled / thumb /        first deciding hand wins,
//!                 pinch / palm normal                   fist needs N frames
//! ```
//!
//! ## Gesture → Technique
//!
//! Evaluated top to bottom, first match wins:
//!
//! | # | Pose | Technique |
//! |---|---|---|
//! | 1 | no hands | `neutral` |
//! | 2 | one hand, all five up, palm facing viewer | `blood` |
//! | 2 | fist held for 3 frames | `blackflash` |
//! | 3 | pinch + middle up | `purple` |
//! | 4 | thumb + pinky up | `mahito` |
//! | 5 | thumb up only | `hakari` |
//! | 6 | index + pinky up | `megumi` |
//! | 7 | index + middle + ring up | `dismantle` |
//! | 8 | middle + ring up | `shrine` |
//! | 9 | index + middle up, ring down | `void` |
//! | 10 | index up, middle down | `red` |
//! | 11 | anything else | `neutral` |
//!
//! "Up" and "down" use separate thresholds: a finger that is neither
//! clearly raised nor clearly lowered matches no rule, which keeps a
//! half-bent finger from flickering between two techniques.

pub mod landmark;
pub mod thresholds;
pub mod geometry;
pub mod classifier;
pub mod poses;
pub mod label;

pub use landmark::{Hand, HandError, HandFrame, Landmark, LANDMARK_COUNT};
pub use thresholds::GestureThresholds;
pub use geometry::{Finger, FingerStates};
pub use classifier::{classify, Classification, GestureClassifier};
pub use poses::{Digit, HandPose};
pub use label::hand_label;
