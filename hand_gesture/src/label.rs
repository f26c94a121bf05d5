//! Short per-hand labels for debug overlays.

use technique_field::Technique;

use crate::geometry::{is_curled, Finger};
use crate::landmark::*;
use crate::thresholds::GestureThresholds;

/// Label for one hand, given how many hands were detected and the
/// technique the frame classified to.
///
/// Uses raw tip-above-PIP tests rather than the classifier's margins: the
/// label describes what the hand looks like, not what it triggered.
pub fn hand_label(
    hand:       &Hand,
    hand_count: usize,
    detected:   Technique,
    th:         &GestureThresholds,
) -> &'static str {
    let single = hand_count == 1;
    if single {
        match detected {
            Technique::Megumi     => return "Index + Pinky",
            Technique::Blood      => return "Open Palm",
            Technique::BlackFlash => return "Fist",
            _ => {}
        }
    }

    let raised = |f: Finger| hand[f.tip()].y < hand[f.pip()].y;
    let thumb = hand[THUMB_TIP].y < hand[THUMB_IP].y && hand[THUMB_TIP].y < hand[THUMB_MCP].y;
    if single && thumb && Finger::ALL.into_iter().all(raised) {
        return "Open Palm";
    }
    if single && Finger::ALL.into_iter().all(|f| is_curled(hand, f, th)) {
        return "Fist";
    }
    "Hand Detected"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses::{Digit, HandPose};

    fn label(pose: HandPose, count: usize, detected: Technique) -> &'static str {
        hand_label(&pose.build(), count, detected, &GestureThresholds::default())
    }

    #[test]
    fn detected_technique_names_the_pose() {
        assert_eq!(label(HandPose::new(), 1, Technique::Megumi), "Index + Pinky");
        assert_eq!(label(HandPose::new(), 1, Technique::BlackFlash), "Fist");
    }

    #[test]
    fn shape_is_described_while_confirming() {
        assert_eq!(label(HandPose::fist(), 1, Technique::Neutral), "Fist");
        let palm = HandPose::new().thumb(Digit::Up).all_fingers(Digit::Up);
        assert_eq!(label(palm, 1, Technique::Neutral), "Open Palm");
    }

    #[test]
    fn two_hands_get_the_generic_label() {
        assert_eq!(label(HandPose::fist(), 2, Technique::BlackFlash), "Hand Detected");
        assert_eq!(label(HandPose::red(), 1, Technique::Red), "Hand Detected");
    }
}
