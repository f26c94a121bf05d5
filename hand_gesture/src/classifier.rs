//! Frame → technique decision procedure.
//!
//! Rules are evaluated per hand, first match wins:
//!
//! | # | Condition                                        | Technique    |
//! |---|--------------------------------------------------|--------------|
//! | 1 | no hands                                         | `neutral`    |
//! | 2 | single hand, open palm facing the viewer         | `blood`      |
//! | 2 | fist held for `fist_confirm_frames` frames       | `blackflash` |
//! | 3 | pinch + middle up                                | `purple`     |
//! | 4 | thumb up, I/M/R down, pinky up                   | `mahito`     |
//! | 5 | thumb up, I/M/R/P down                           | `hakari`     |
//! | 6 | index up, M/R down, pinky up                     | `megumi`     |
//! | 7 | I/M/R up, pinky down                             | `dismantle`  |
//! | 8 | index down, M/R up, pinky down                   | `shrine`     |
//! | 9 | I/M up, ring down                                | `void`       |
//! | 10| index up, middle down                            | `red`        |
//! | 11| otherwise                                        | `neutral`    |
//!
//! With several hands, hands are visited in detection order and the first
//! one with a technique settles the frame.  A fist that is still confirming
//! only holds the previous technique when no later hand decides; a later
//! decision wins and resets the fist counter.

use log::debug;
use technique_field::Technique;

use crate::geometry::Finger::{Index, Middle, Pinky, Ring};
use crate::geometry::FingerStates;
use crate::landmark::HandFrame;
use crate::thresholds::GestureThresholds;

/// Outcome of one classification step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub technique:     Technique,
    /// Counter to carry into the next frame.
    pub fist_frames:   u32,
    /// Detection-order index of the hand that settled the frame.
    pub deciding_hand: Option<usize>,
}

enum Verdict {
    Decided(Technique),
    FistPending,
    Undecided,
}

/// Pure classifier.  `fist_frames` is the consecutive-fist counter from
/// the previous frame, `previous` the technique currently active.
pub fn classify(
    frame:       &HandFrame,
    fist_frames: u32,
    previous:    Technique,
    th:          &GestureThresholds,
) -> Classification {
    let single = frame.hand_count() == 1;
    let mut pending = None;

    for (idx, hand) in frame.hands.iter().enumerate() {
        let states = FingerStates::measure(hand, th);
        let settled = |technique, fist_frames| Classification {
            technique,
            fist_frames,
            deciding_hand: Some(idx),
        };

        match evaluate(&states, single, th) {
            Verdict::Decided(t) => return settled(t, 0),
            Verdict::FistPending if pending.is_none() => {
                let count = fist_frames.saturating_add(1);
                if count >= th.fist_confirm_frames {
                    return settled(Technique::BlackFlash, count);
                }
                debug!("fist held {count}/{} frames", th.fist_confirm_frames);
                pending = Some(settled(previous, count));
            }
            Verdict::FistPending | Verdict::Undecided => {}
        }
    }

    pending.unwrap_or(Classification {
        technique:     Technique::Neutral,
        fist_frames:   0,
        deciding_hand: None,
    })
}

fn evaluate(s: &FingerStates, single: bool, th: &GestureThresholds) -> Verdict {
    if single && s.is_open_palm() && s.palm_faces_viewer(th) {
        return Verdict::Decided(Technique::Blood);
    }
    if s.is_fist() {
        return Verdict::FistPending;
    }
    match finger_pattern(s, th) {
        Some(t) => Verdict::Decided(t),
        None => Verdict::Undecided,
    }
}

fn finger_pattern(s: &FingerStates, th: &GestureThresholds) -> Option<Technique> {
    let up   = |f| s.is_up(f);
    let down = |f| s.is_down(f);

    let technique = if s.is_pinching(th) && up(Middle) {
        Technique::Purple
    } else if s.thumb_up && down(Index) && down(Middle) && down(Ring) && up(Pinky) {
        Technique::Mahito
    } else if s.thumb_up && down(Index) && down(Middle) && down(Ring) && down(Pinky) {
        Technique::Hakari
    } else if up(Index) && down(Middle) && down(Ring) && up(Pinky) {
        Technique::Megumi
    } else if up(Index) && up(Middle) && up(Ring) && down(Pinky) {
        Technique::Dismantle
    } else if down(Index) && up(Middle) && up(Ring) && down(Pinky) {
        Technique::Shrine
    } else if up(Index) && up(Middle) && down(Ring) {
        Technique::Void
    } else if up(Index) && down(Middle) {
        Technique::Red
    } else {
        return None;
    };
    Some(technique)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Stateful wrapper that carries the fist counter and the current
/// technique between frames.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    thresholds:  GestureThresholds,
    fist_frames: u32,
    current:     Technique,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        GestureClassifier { thresholds, fist_frames: 0, current: Technique::Neutral }
    }

    /// Classify one detection frame and remember the result.
    pub fn update(&mut self, frame: &HandFrame) -> Classification {
        let c = classify(frame, self.fist_frames, self.current, &self.thresholds);
        self.fist_frames = c.fist_frames;
        self.current = c.technique;
        c
    }

    pub fn current(&self) -> Technique {
        self.current
    }

    pub fn fist_frames(&self) -> u32 {
        self.fist_frames
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureThresholds::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses::{Digit, HandPose};

    fn one(pose: HandPose) -> HandFrame {
        HandFrame::single(pose.build())
    }

    fn classify_once(frame: &HandFrame) -> Technique {
        classify(frame, 0, Technique::Neutral, &GestureThresholds::default()).technique
    }

    #[test]
    fn no_hands_is_neutral() {
        let c = classify(&HandFrame::empty(), 2, Technique::Red, &GestureThresholds::default());
        assert_eq!(c.technique, Technique::Neutral);
        assert_eq!(c.fist_frames, 0);
        assert_eq!(c.deciding_hand, None);
    }

    #[test]
    fn each_documented_pattern_maps_to_its_technique() {
        let cases = [
            (HandPose::purple(),    Technique::Purple),
            (HandPose::mahito(),    Technique::Mahito),
            (HandPose::hakari(),    Technique::Hakari),
            (HandPose::megumi(),    Technique::Megumi),
            (HandPose::dismantle(), Technique::Dismantle),
            (HandPose::shrine(),    Technique::Shrine),
            (HandPose::void(),      Technique::Void),
            (HandPose::red(),       Technique::Red),
            (HandPose::blood(),     Technique::Blood),
        ];
        for (pose, expected) in cases {
            assert_eq!(classify_once(&one(pose)), expected);
        }
    }

    #[test]
    fn relaxed_hand_is_neutral() {
        assert_eq!(classify_once(&one(HandPose::new())), Technique::Neutral);
    }

    #[test]
    fn hovering_finger_does_not_flip_either_rule() {
        let hover_index = HandPose::new().index(Digit::Hover);
        assert_eq!(classify_once(&one(hover_index)), Technique::Neutral);

        let hover_middle = HandPose::new().index(Digit::Up).middle(Digit::Hover);
        assert_eq!(classify_once(&one(hover_middle)), Technique::Neutral);
    }

    #[test]
    fn open_palm_away_from_viewer_is_not_blood() {
        let away = HandPose::new().thumb(Digit::Up).all_fingers(Digit::Up);
        assert_eq!(classify_once(&one(away)), Technique::Neutral);
    }

    #[test]
    fn blood_needs_a_single_hand() {
        let palm = HandPose::blood().build();
        let frame = HandFrame { hands: vec![palm.clone(), palm] };
        assert_ne!(classify_once(&frame), Technique::Blood);
    }

    #[test]
    fn fist_fires_on_third_consecutive_frame() {
        let mut c = GestureClassifier::default();
        let fist = one(HandPose::fist());
        assert_eq!(c.update(&fist).technique, Technique::Neutral);
        assert_eq!(c.update(&fist).technique, Technique::Neutral);
        assert_eq!(c.update(&fist).technique, Technique::BlackFlash);
        assert_eq!(c.update(&fist).technique, Technique::BlackFlash);
    }

    #[test]
    fn interrupted_fist_never_fires() {
        let mut c = GestureClassifier::default();
        let fist = one(HandPose::fist());
        c.update(&fist);
        c.update(&fist);
        assert_eq!(c.update(&one(HandPose::new())).technique, Technique::Neutral);
        assert_eq!(c.fist_frames(), 0);
        c.update(&fist);
        assert_eq!(c.update(&fist).technique, Technique::Neutral);
    }

    #[test]
    fn pending_fist_keeps_previous_technique() {
        let mut c = GestureClassifier::default();
        c.update(&one(HandPose::red()));
        let pending = c.update(&one(HandPose::fist()));
        assert_eq!(pending.technique, Technique::Red);
        assert_eq!(pending.fist_frames, 1);
    }

    #[test]
    fn confirmation_length_is_configurable() {
        let th = GestureThresholds { fist_confirm_frames: 1, ..GestureThresholds::default() };
        let c = classify(&one(HandPose::fist()), 0, Technique::Neutral, &th);
        assert_eq!(c.technique, Technique::BlackFlash);
    }

    #[test]
    fn first_decisive_hand_wins() {
        let frame = HandFrame {
            hands: vec![HandPose::new().build(), HandPose::red().build(), HandPose::void().build()],
        };
        let c = classify(&frame, 0, Technique::Neutral, &GestureThresholds::default());
        assert_eq!(c.technique, Technique::Red);
        assert_eq!(c.deciding_hand, Some(1));
    }

    #[test]
    fn later_hand_overrides_a_confirming_fist() {
        let frame = HandFrame {
            hands: vec![HandPose::fist().build(), HandPose::red().shifted(0.2, 0.0).build()],
        };
        let c = classify(&frame, 0, Technique::Neutral, &GestureThresholds::default());
        assert_eq!(c.technique, Technique::Red);
        assert_eq!(c.fist_frames, 0);
        assert_eq!(c.deciding_hand, Some(1));
    }

    #[test]
    fn confirming_fist_holds_when_no_other_hand_decides() {
        let frame = HandFrame {
            hands: vec![HandPose::fist().build(), HandPose::new().shifted(0.2, 0.0).build()],
        };
        let c = classify(&frame, 1, Technique::Void, &GestureThresholds::default());
        assert_eq!(c.technique, Technique::Void);
        assert_eq!(c.fist_frames, 2);
        assert_eq!(c.deciding_hand, Some(0));
    }

    #[test]
    fn confirmed_fist_is_not_overridden() {
        let frame = HandFrame {
            hands: vec![HandPose::fist().build(), HandPose::red().shifted(0.2, 0.0).build()],
        };
        let c = classify(&frame, 2, Technique::Neutral, &GestureThresholds::default());
        assert_eq!(c.technique, Technique::BlackFlash);
        assert_eq!(c.deciding_hand, Some(0));
    }

    #[test]
    fn two_purple_hands_decide_on_the_first() {
        let frame = HandFrame { hands: vec![HandPose::purple().build(), HandPose::purple().build()] };
        let c = classify(&frame, 0, Technique::Neutral, &GestureThresholds::default());
        assert_eq!(c.technique, Technique::Purple);
        assert_eq!(c.deciding_hand, Some(0));
    }
}
