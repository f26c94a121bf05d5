//! Top-level application loop.
//!
//! `run` wires a landmark source into a [`FrameDriver`], opens the preview
//! window, and drives both until the window closes or the user quits.

use std::sync::mpsc::{self, Sender};
use std::time::Instant;

use log::{info, warn};

use crate::config::{SceneConfig, SceneError};
use crate::driver::FrameDriver;
use crate::listener::LoggingListener;
use crate::source::{
    spawn_hand_source, DetectorProcess, JsonLinesSource, SimHandSource, SimInput,
};
use crate::visualizer::Visualizer;

/// Longest frame step fed to the scene; a stalled window must not make
/// the blend or the garden jump.
const MAX_DT: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where hand landmarks come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Keyboard-selected synthetic poses.
    Sim,
    /// JSON lines on standard input.
    Stdin,
    /// LeapMotion controller (`leap` feature).
    Leap,
    /// External detector process; `argv[0]` is the program.
    Detector(Vec<String>),
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Sim         => "sim",
            SourceKind::Stdin       => "stdin",
            SourceKind::Leap        => "leap",
            SourceKind::Detector(_) => "detector",
        }
    }
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub scene:  SceneConfig,
    pub source: SourceKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scene:  SceneConfig::default(),
            source: SourceKind::Sim,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Source wiring
// ════════════════════════════════════════════════════════════════════════════

/// Resources that must outlive the loop besides the driver itself.
#[derive(Default)]
struct Attached {
    sim_tx:   Option<Sender<SimInput>>,
    detector: Option<DetectorProcess>,
}

fn attach_source(
    kind:   &SourceKind,
    driver: &mut FrameDriver<LoggingListener>,
) -> Result<Attached, SceneError> {
    let mailbox = driver.mailbox();
    let mut attached = Attached::default();

    let handle = match kind {
        SourceKind::Sim => {
            let (tx, rx) = mpsc::channel::<SimInput>();
            attached.sim_tx = Some(tx);
            spawn_hand_source(SimHandSource::new(rx), mailbox)?
        }
        SourceKind::Stdin => spawn_hand_source(JsonLinesSource::stdin(), mailbox)?,
        SourceKind::Detector(argv) => {
            let (process, source) = DetectorProcess::spawn(argv)?;
            attached.detector = Some(process);
            spawn_hand_source(source, mailbox)?
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => spawn_hand_source(crate::source::LeapHandSource, mailbox)?,
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => return Err(SceneError::SourceUnavailable("leap".into())),
    };

    driver.attach_source(handle);
    Ok(attached)
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

/// Run until the window closes.
pub fn run(cfg: AppConfig) -> Result<(), SceneError> {
    cfg.scene.validate()?;
    info!(
        "starting: source={} particles={}",
        cfg.source.name(),
        cfg.scene.particle_count,
    );

    // ── Driver and source ─────────────────────────────────────────────────
    let mut driver = FrameDriver::new(cfg.scene, Visualizer::viewport(), LoggingListener);
    let mut attached = attach_source(&cfg.source, &mut driver)?;

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(attached.sim_tx.take())?;

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut last = Instant::now();
    while vis.is_open() {
        if !vis.poll_input() { break; }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32().min(MAX_DT);
        last = now;

        let frame = driver.tick(dt);
        vis.render(&frame);
    }

    // ── Teardown ──────────────────────────────────────────────────────────
    driver.shutdown();
    if let Some(mut detector) = attached.detector.take() {
        detector.kill();
    }
    if driver.is_running() {
        warn!("frame driver still running after shutdown");
    }
    info!("bye");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::HandFrame;

    fn driver() -> FrameDriver<LoggingListener> {
        let scene = SceneConfig { particle_count: 64, ..SceneConfig::default() };
        FrameDriver::seeded(scene, 5, Visualizer::viewport(), LoggingListener)
    }

    #[test]
    fn default_config_uses_simulation() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.source, SourceKind::Sim);
        assert_eq!(cfg.scene.particle_count, 20_000);
    }

    #[test]
    fn source_names() {
        assert_eq!(SourceKind::Stdin.name(), "stdin");
        assert_eq!(SourceKind::Detector(vec!["x".into()]).name(), "detector");
    }

    #[test]
    fn sim_source_hands_out_a_sender() {
        let mut d = driver();
        let attached = attach_source(&SourceKind::Sim, &mut d).expect("sim source");
        assert!(attached.sim_tx.is_some());
        assert!(attached.detector.is_none());
        d.shutdown();
    }

    #[test]
    fn empty_detector_command_is_rejected() {
        let mut d = driver();
        let err = attach_source(&SourceKind::Detector(Vec::new()), &mut d).err();
        assert!(matches!(err, Some(SceneError::InvalidConfig(_))));
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn leap_without_feature_is_unavailable() {
        let mut d = driver();
        let err = attach_source(&SourceKind::Leap, &mut d).err();
        assert!(matches!(err, Some(SceneError::SourceUnavailable(_))));
    }

    #[test]
    fn sim_quit_drains_to_neutral() {
        let mut d = driver();
        let attached = attach_source(&SourceKind::Sim, &mut d).expect("sim source");
        let tx = attached.sim_tx.expect("sender");
        tx.send(SimInput::Quit).expect("send");
        let mailbox = d.mailbox();
        let deadline = Instant::now() + std::time::Duration::from_secs(2);
        let mut last = None;
        while Instant::now() < deadline {
            if let Some(f) = mailbox.take() {
                last = Some(f);
                if last.as_ref().is_some_and(HandFrame::is_empty) { break; }
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(last.is_some_and(|f| f.is_empty()));
    }
}
