//! End-to-end scenarios through the public frame-driver API.

use glam::Vec2;

use domain_scene::{FrameDriver, SceneConfig, SceneListener};
use hand_gesture::{HandFrame, HandPose};
use technique_field::Technique;

#[derive(Default)]
struct Recorder {
    changes: Vec<(String, String)>,
    points:  Vec<Vec<Vec2>>,
}

impl SceneListener for Recorder {
    fn technique_changed(&mut self, name: &str, accent_hex: &str) {
        self.changes.push((name.to_string(), accent_hex.to_string()));
    }

    fn hand_screen_points(&mut self, points: &[Vec2]) {
        self.points.push(points.to_vec());
    }
}

fn driver() -> FrameDriver<Recorder> {
    let cfg = SceneConfig { particle_count: 500, ..SceneConfig::default() };
    FrameDriver::seeded(cfg, 42, Vec2::new(1280.0, 720.0), Recorder::default())
}

fn feed(d: &mut FrameDriver<Recorder>, frame: HandFrame) -> Technique {
    d.mailbox().publish(frame);
    d.tick(1.0 / 60.0).technique
}

#[test]
fn no_hands_is_neutral() {
    let mut d = driver();
    assert_eq!(feed(&mut d, HandFrame::empty()), Technique::Neutral);

    let desc = d.scene().descriptor();
    assert_eq!(desc.name, "Neutral State");
    assert_eq!(desc.accent_hex(), "#00ffff");
    assert!(d.listener().changes.is_empty());
    assert_eq!(d.listener().points, vec![Vec::<Vec2>::new()]);
}

#[test]
fn index_only_is_red() {
    let mut d = driver();
    assert_eq!(feed(&mut d, HandFrame::single(HandPose::red().build())), Technique::Red);

    let (name, hex) = &d.listener().changes[0];
    assert!(name.contains("Red"));
    assert_eq!(hex, "#ff3333");
    assert_eq!(d.listener().points[0].len(), 1);
}

#[test]
fn open_palm_facing_viewer_is_blood() {
    let mut d = driver();
    assert_eq!(feed(&mut d, HandFrame::single(HandPose::blood().build())), Technique::Blood);
    assert_eq!(d.diagnostics().palm_facing, Some(true));
}

#[test]
fn two_purple_hands_decided_by_the_first() {
    let mut d = driver();
    let frame = HandFrame {
        hands: vec![
            HandPose::purple().build(),
            HandPose::purple().shifted(0.2, 0.0).build(),
        ],
    };
    assert_eq!(feed(&mut d, frame), Technique::Purple);
    assert_eq!(d.listener().changes.len(), 1);
    assert_eq!(d.listener().points[0].len(), 2);
}

#[test]
fn fist_needs_three_consecutive_detections() {
    let mut d = driver();
    let fist = || HandFrame::single(HandPose::fist().build());

    assert_eq!(feed(&mut d, fist()), Technique::Neutral);
    assert_eq!(feed(&mut d, fist()), Technique::Neutral);
    assert_eq!(feed(&mut d, HandFrame::single(HandPose::new().build())), Technique::Neutral);
    assert_eq!(feed(&mut d, fist()), Technique::Neutral);
    assert_eq!(feed(&mut d, fist()), Technique::Neutral);
    assert_eq!(feed(&mut d, fist()), Technique::BlackFlash);
}

#[test]
fn repeated_technique_rebuilds_and_notifies_once() {
    let mut d = driver();
    let before = d.scene().rebuild_count();
    feed(&mut d, HandFrame::single(HandPose::void().build()));
    feed(&mut d, HandFrame::single(HandPose::void().build()));
    feed(&mut d, HandFrame::single(HandPose::void().build()));
    assert_eq!(d.scene().rebuild_count(), before + 1);
    assert_eq!(d.listener().changes.len(), 1);
}

#[test]
fn live_buffers_converge_on_a_held_target() {
    let mut d = driver();
    feed(&mut d, HandFrame::single(HandPose::shrine().build()));

    let gap = |d: &FrameDriver<Recorder>| {
        let s = d.scene();
        s.live()
            .positions
            .iter()
            .zip(&s.targets().positions)
            .map(|(l, t)| (t - l).abs())
            .fold(0.0f32, f32::max)
    };

    let mut prev = gap(&d);
    for _ in 0..50 {
        d.tick(1.0 / 60.0);
        let g = gap(&d);
        assert!(g <= prev);
        prev = g;
    }
    for _ in 0..400 {
        d.tick(1.0 / 60.0);
    }
    assert!(gap(&d) < 1e-3);
}

#[test]
fn detection_gap_keeps_previous_technique() {
    let mut d = driver();
    feed(&mut d, HandFrame::single(HandPose::hakari().build()));
    for _ in 0..10 {
        assert_eq!(d.tick(1.0 / 60.0).technique, Technique::Hakari);
    }
}

#[test]
fn teardown_twice_is_harmless() {
    let mut d = driver();
    feed(&mut d, HandFrame::single(HandPose::megumi().build()));
    d.shutdown();
    d.shutdown();
    assert!(!d.is_running());
    assert_eq!(d.technique(), Technique::Megumi);
}
