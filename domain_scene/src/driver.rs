//! Frame driver: the per-frame loop body.
//!
//! ```text
//!   detector thread ──publish──► Mailbox<HandFrame>
//!                                     │ take (never blocks)
//!                                     ▼
//!   tick(dt): classify ─► Scene::set_technique ─► Scene::tick ─► orientation ─► RenderFrame
//! ```
//!
//! A tick with nothing new in the mailbox reuses the previous
//! classification unchanged.

use glam::{Quat, Vec2};
use log::{debug, info};

use hand_gesture::{hand_label, FingerStates, GestureClassifier, HandFrame};
use technique_field::{ShadowGarden, Technique, TechniqueDescriptor};

use crate::config::SceneConfig;
use crate::listener::{FrameDiagnostics, SceneListener};
use crate::mailbox::Mailbox;
use crate::orientation::OrientationController;
use crate::palm::{palm_direction, SceneMapping};
use crate::scene::{ParticleBuffers, Scene};
use crate::source::SourceHandle;

// ════════════════════════════════════════════════════════════════════════════
// RenderFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything a renderer needs for one frame.
pub struct RenderFrame<'a> {
    pub particles:    &'a ParticleBuffers,
    pub rotation:     Quat,
    /// Camera shake in pixels.
    pub shake_offset: Vec2,
    pub technique:    Technique,
    pub descriptor:   TechniqueDescriptor,
    pub garden:       &'a ShadowGarden,
    pub diagnostics:  &'a FrameDiagnostics,
    /// Index fingertips of the last detection, in viewport pixels.
    pub hand_points:  &'a [Vec2],
    /// Per-hand debug labels of the last detection.
    pub hand_labels:  &'a [&'static str],
}

// ════════════════════════════════════════════════════════════════════════════
// FrameDriver
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameDriver<L: SceneListener> {
    config:      SceneConfig,
    mapping:     SceneMapping,
    viewport:    Vec2,
    mailbox:     Mailbox<HandFrame>,
    classifier:  GestureClassifier,
    scene:       Scene,
    orientation: OrientationController,
    listener:    L,

    // ── last detection ───────────────────────────────────────────────────
    diagnostics: FrameDiagnostics,
    hand_points: Vec<Vec2>,
    hand_labels: Vec<&'static str>,

    source:      Option<SourceHandle>,
    running:     bool,
}

impl<L: SceneListener> FrameDriver<L> {
    /// `viewport` is the output size in pixels, used for hover points.
    pub fn new(config: SceneConfig, viewport: Vec2, listener: L) -> Self {
        let scene = Scene::new(&config);
        Self::with_scene(config, scene, viewport, listener)
    }

    /// Same as [`new`](Self::new) with reproducible particle draws.
    pub fn seeded(config: SceneConfig, seed: u64, viewport: Vec2, listener: L) -> Self {
        let scene = Scene::seeded(&config, seed);
        Self::with_scene(config, scene, viewport, listener)
    }

    fn with_scene(config: SceneConfig, scene: Scene, viewport: Vec2, listener: L) -> Self {
        let neutral = Technique::Neutral.descriptor();
        FrameDriver {
            mapping:     SceneMapping::new(config.scene_scale, config.depth_scale),
            viewport,
            mailbox:     Mailbox::new(),
            classifier:  GestureClassifier::new(config.thresholds.clone()),
            scene,
            orientation: OrientationController::new(config.orientation_lerp, config.neutral_yaw_step),
            listener,
            diagnostics: FrameDiagnostics { technique_name: neutral.name, ..FrameDiagnostics::default() },
            hand_points: Vec::new(),
            hand_labels: Vec::new(),
            source:      None,
            running:     true,
            config,
        }
    }

    /// Handle for producers.  Publishing to it feeds the next tick.
    pub fn mailbox(&self) -> Mailbox<HandFrame> {
        self.mailbox.clone()
    }

    /// Take ownership of a running source so [`shutdown`](Self::shutdown)
    /// stops it together with the loop.
    pub fn attach_source(&mut self, handle: SourceHandle) {
        if let Some(mut old) = self.source.replace(handle) {
            old.stop();
        }
    }

    // ── detection path ───────────────────────────────────────────────────

    /// Classify one detection frame and apply the result to the scene.
    pub fn process_detection(&mut self, frame: &HandFrame) {
        self.hand_points = frame.index_tip_screen_points(self.viewport.x, self.viewport.y);
        self.listener.hand_screen_points(&self.hand_points);

        let c = self.classifier.update(frame);

        if let Some(first) = frame.first() {
            self.orientation.observe(palm_direction(first));
        }
        if c.technique == Technique::Blood {
            if let Some(hand) = c.deciding_hand.and_then(|i| frame.hands.get(i)) {
                self.scene.aim_blood(self.mapping.blood_origin(hand), palm_direction(hand));
            }
        }

        self.scene.set_technique(c.technique, &mut self.listener);

        let th = self.classifier.thresholds();
        self.hand_labels = frame
            .hands
            .iter()
            .map(|h| hand_label(h, frame.hand_count(), c.technique, th))
            .collect();
        let palm_facing = match frame.hands.as_slice() {
            [only] => Some(FingerStates::measure(only, th).palm_faces_viewer(th)),
            _ => None,
        };
        self.diagnostics = FrameDiagnostics {
            hands_detected:     frame.hand_count(),
            technique_name:     self.scene.descriptor().name,
            gesture_recognized: c.technique != Technique::Neutral,
            palm_facing,
        };
        self.listener.diagnostics(&self.diagnostics);
    }

    // ── render path ──────────────────────────────────────────────────────

    /// One display frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> RenderFrame<'_> {
        if self.running {
            if let Some(frame) = self.mailbox.take() {
                self.process_detection(&frame);
            }
            self.scene.tick(dt);
            self.orientation.step(self.scene.technique());
        }
        let (dx, dy) = self.scene.shake_offset(self.config.shake_pixels);
        self.render_frame(Vec2::new(dx, dy))
    }

    fn render_frame(&self, shake_offset: Vec2) -> RenderFrame<'_> {
        RenderFrame {
            particles:    self.scene.live(),
            rotation:     self.orientation.rotation(),
            shake_offset,
            technique:    self.scene.technique(),
            descriptor:   self.scene.descriptor(),
            garden:       self.scene.garden(),
            diagnostics:  &self.diagnostics,
            hand_points:  &self.hand_points,
            hand_labels:  &self.hand_labels,
        }
    }

    // ── teardown ─────────────────────────────────────────────────────────

    /// Stop the source and freeze the loop.  Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
        }
        if self.running {
            self.running = false;
            self.mailbox.clear();
            info!("frame driver stopped");
        } else {
            debug!("frame driver already stopped");
        }
    }

    pub fn is_running(&self) -> bool { self.running }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn technique(&self) -> Technique { self.scene.technique() }
    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn orientation(&self) -> &OrientationController { &self.orientation }
    pub fn classifier(&self) -> &GestureClassifier { &self.classifier }
    pub fn diagnostics(&self) -> &FrameDiagnostics { &self.diagnostics }
    pub fn listener(&self) -> &L { &self.listener }
    pub fn config(&self) -> &SceneConfig { &self.config }
}

impl<L: SceneListener> Drop for FrameDriver<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::HandPose;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<String>,
        points:  Vec<usize>,
        diags:   usize,
    }

    impl SceneListener for Recorder {
        fn technique_changed(&mut self, name: &str, _accent_hex: &str) {
            self.changes.push(name.to_string());
        }
        fn hand_screen_points(&mut self, points: &[Vec2]) {
            self.points.push(points.len());
        }
        fn diagnostics(&mut self, _diag: &FrameDiagnostics) {
            self.diags += 1;
        }
    }

    fn driver() -> FrameDriver<Recorder> {
        let cfg = SceneConfig { particle_count: 300, ..SceneConfig::default() };
        FrameDriver::seeded(cfg, 11, Vec2::new(640.0, 480.0), Recorder::default())
    }

    #[test]
    fn tick_without_detection_keeps_state() {
        let mut d = driver();
        let before = d.scene().rebuild_count();
        let rf = d.tick(1.0 / 60.0);
        assert_eq!(rf.technique, Technique::Neutral);
        assert!(rf.hand_points.is_empty());
        assert_eq!(d.scene().rebuild_count(), before);
        assert_eq!(d.listener().diags, 0);
    }

    #[test]
    fn mailbox_detection_is_applied_once() {
        let mut d = driver();
        d.mailbox().publish(HandFrame::single(HandPose::red().build()));
        assert_eq!(d.tick(0.016).technique, Technique::Red);
        d.tick(0.016);
        assert_eq!(d.listener().changes.len(), 1);
        assert_eq!(d.listener().diags, 1);
    }

    #[test]
    fn only_the_newest_detection_counts() {
        let mut d = driver();
        let mb = d.mailbox();
        mb.publish(HandFrame::single(HandPose::red().build()));
        mb.publish(HandFrame::single(HandPose::void().build()));
        d.tick(0.016);
        assert_eq!(d.technique(), Technique::Void);
        assert_eq!(d.listener().changes, vec!["Domain Expansion: Infinite Void".to_string()]);
    }

    #[test]
    fn hover_points_follow_every_detection() {
        let mut d = driver();
        let two = HandFrame { hands: vec![HandPose::red().build(), HandPose::new().build()] };
        d.process_detection(&two);
        d.process_detection(&HandFrame::empty());
        assert_eq!(d.listener().points, vec![2, 0]);
    }

    #[test]
    fn diagnostics_report_single_hand_palm() {
        let mut d = driver();
        d.process_detection(&HandFrame::single(HandPose::blood().build()));
        let diag = d.diagnostics();
        assert_eq!(diag.hands_detected, 1);
        assert!(diag.gesture_recognized);
        assert_eq!(diag.palm_facing, Some(true));
        assert_eq!(diag.technique_name, "Blood Manipulation");
    }

    #[test]
    fn blood_aims_from_the_palm() {
        let mut d = driver();
        d.process_detection(&HandFrame::single(HandPose::blood().build()));
        let field = d.scene().field();
        assert!(field.origin.z > 1.0);
        d.tick(0.016);
        assert!(d.scene().field().direction.z > 0.9);
    }

    #[test]
    fn shutdown_is_idempotent_and_freezes_ticks() {
        let mut d = driver();
        d.shutdown();
        d.shutdown();
        assert!(!d.is_running());
        d.mailbox().publish(HandFrame::single(HandPose::red().build()));
        assert_eq!(d.tick(0.016).technique, Technique::Neutral);
    }
}
