//! Landmark sources.
//!
//! Keyboard simulation, an external detector speaking
//! JSON lines, and LeapMotion hardware.
//!
//! Every source runs on its own thread and publishes [`HandFrame`]s into a
//! [`Mailbox`].  The frame loop never learns which one is attached.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Deserialize;

use hand_gesture::{Hand, HandFrame, HandPose, Landmark};

use crate::config::SceneError;
use crate::mailbox::Mailbox;

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s into a mailbox.
///
/// `run` returns once `stop` is raised or the source is exhausted.  On
/// exhaustion a source publishes an empty frame so the scene falls back to
/// neutral instead of freezing on the last pose.
pub trait HandSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>, mailbox: Mailbox<HandFrame>, stop: Arc<AtomicBool>);
}

// ════════════════════════════════════════════════════════════════════════════
// Spawn helper
// ════════════════════════════════════════════════════════════════════════════

/// Running source.  Dropping it requests a stop.
pub struct SourceHandle {
    name:   &'static str,
    stop:   Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SourceHandle {
    /// Request the source to stop.  A read already in flight is allowed to
    /// finish; its result is not published.  Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            info!("stopping hand source {}", self.name);
        }
        if self.thread.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(t) = self.thread.take() {
                let _ = t.join();
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn a hand source on its own thread.
pub fn spawn_hand_source<S: HandSource>(
    source:  S,
    mailbox: Mailbox<HandFrame>,
) -> Result<SourceHandle, SceneError> {
    let name = source.name();
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name(format!("hand-source-{name}"))
        .spawn(move || Box::new(source).run(mailbox, flag))
        .map_err(|source| SceneError::Source { name: name.to_string(), source })?;
    info!("hand source {name} started");
    Ok(SourceHandle { name, stop, thread: Some(thread) })
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard simulation
// ════════════════════════════════════════════════════════════════════════════

/// Pose selected from the preview window's keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    NoHands,
    Red,
    Void,
    Purple,
    Shrine,
    Mahito,
    Hakari,
    Megumi,
    Fist,
    Dismantle,
    Blood,
    /// Two hands pinching, for the multi-hand rule.
    TwinPurple,
}

impl SimPose {
    pub fn frame(self) -> HandFrame {
        let pose = match self {
            SimPose::NoHands    => return HandFrame::empty(),
            SimPose::TwinPurple => {
                return HandFrame {
                    hands: vec![
                        HandPose::purple().shifted(-0.2, 0.0).build(),
                        HandPose::purple().shifted(0.2, 0.0).build(),
                    ],
                };
            }
            SimPose::Red       => HandPose::red(),
            SimPose::Void      => HandPose::void(),
            SimPose::Purple    => HandPose::purple(),
            SimPose::Shrine    => HandPose::shrine(),
            SimPose::Mahito    => HandPose::mahito(),
            SimPose::Hakari    => HandPose::hakari(),
            SimPose::Megumi    => HandPose::megumi(),
            SimPose::Fist      => HandPose::fist(),
            SimPose::Dismantle => HandPose::dismantle(),
            SimPose::Blood     => HandPose::blood(),
        };
        HandFrame::single(pose.build())
    }
}

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    Pose(SimPose),
    /// Nudge the simulated hand in image space.
    Drift { dx: f32, dy: f32 },
    Quit,
}

/// Hand source driven by [`SimInput`] events from the preview window.
///
/// Republishes the held pose at a detector-like cadence so multi-frame
/// rules such as fist confirmation behave as they would with a camera.
pub struct SimHandSource {
    pub rx:     Receiver<SimInput>,
    pub period: Duration,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandSource { rx, period: Duration::from_millis(33) }
    }
}

impl HandSource for SimHandSource {
    fn name(&self) -> &'static str { "sim" }

    fn run(self: Box<Self>, mailbox: Mailbox<HandFrame>, stop: Arc<AtomicBool>) {
        let mut pose  = SimPose::NoHands;
        let mut shift = (0.0f32, 0.0f32);
        let mut next  = Instant::now();

        while !stop.load(Ordering::SeqCst) {
            let wait = next.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(wait) {
                Ok(SimInput::Pose(p)) => {
                    debug!("sim pose {p:?}");
                    pose = p;
                    continue;
                }
                Ok(SimInput::Drift { dx, dy }) => {
                    shift.0 = (shift.0 + dx).clamp(-0.3, 0.3);
                    shift.1 = (shift.1 + dy).clamp(-0.3, 0.3);
                    continue;
                }
                Ok(SimInput::Quit) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let mut frame = pose.frame();
            for hand in &mut frame.hands {
                *hand = shifted(hand, shift);
            }
            mailbox.publish(frame);
            next = Instant::now() + self.period;
        }
        mailbox.publish(HandFrame::empty());
    }
}

fn shifted(hand: &Hand, (dx, dy): (f32, f32)) -> Hand {
    let mut lm = *hand.landmarks();
    for p in &mut lm {
        p.x += dx;
        p.y += dy;
    }
    Hand::new(lm)
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource: external detector output
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    landmarks: Vec<LandmarkJson>,
    #[serde(default)]
    handedness: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector line:
///
/// ```json
/// {"hands":[{"landmarks":[{"x":0.5,"y":0.9,"z":0.0}, …21 entries]}]}
/// ```
///
/// Hands with the wrong landmark count or non-finite coordinates are
/// dropped with a warning; the rest of the frame survives.  A detector
/// `error` field yields an empty frame.
pub fn parse_detection_line(line: &str) -> Result<HandFrame, SceneError> {
    let det: DetectionJson = serde_json::from_str(line)?;
    if let Some(err) = det.error {
        warn!("detector reported: {err}");
        return Ok(HandFrame::empty());
    }
    let hands = det
        .hands
        .into_iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let points: Vec<Landmark> =
                h.landmarks.iter().map(|p| Landmark::new(p.x, p.y, p.z)).collect();
            match Hand::from_slice(&points) {
                Ok(hand) => Some(hand),
                Err(e) => {
                    let side = h.handedness.as_deref().unwrap_or("unknown");
                    warn!("dropping hand {i} ({side}): {e}");
                    None
                }
            }
        })
        .collect();
    Ok(HandFrame { hands })
}

/// Reads detector frames, one JSON object per line.
pub struct JsonLinesSource<R> {
    reader: R,
    label:  &'static str,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R, label: &'static str) -> Self {
        JsonLinesSource { reader, label }
    }
}

impl JsonLinesSource<BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()), "stdin")
    }
}

impl<R: BufRead + Send + 'static> HandSource for JsonLinesSource<R> {
    fn name(&self) -> &'static str { self.label }

    fn run(self: Box<Self>, mailbox: Mailbox<HandFrame>, stop: Arc<AtomicBool>) {
        let JsonLinesSource { reader, label } = *self;
        let mut published = 0u64;
        for (n, line) in reader.lines().enumerate() {
            if stop.load(Ordering::SeqCst) {
                return;
            }
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("{label}: read failed: {e}");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_detection_line(line) {
                Ok(frame) => {
                    mailbox.publish(frame);
                    published += 1;
                }
                Err(e) => warn!("{label}: skipping line {}: {e}", n + 1),
            }
        }
        info!("{label}: end of input after {published} frames");
        if !stop.load(Ordering::SeqCst) {
            mailbox.publish(HandFrame::empty());
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorProcess: child process speaking JSON lines
// ════════════════════════════════════════════════════════════════════════════

/// An external landmark detector.  The child is killed on drop.
pub struct DetectorProcess {
    child: Child,
}

impl DetectorProcess {
    /// Start `argv[0]` with the remaining arguments; stdout is piped into
    /// the returned source.
    pub fn spawn(
        argv: &[String],
    ) -> Result<(Self, JsonLinesSource<BufReader<ChildStdout>>), SceneError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SceneError::InvalidConfig("empty detector command".into()))?;

        info!("starting detector: {}", argv.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SceneError::Source { name: program.clone(), source })?;

        let stdout = child.stdout.take().ok_or_else(|| SceneError::Source {
            name:   program.clone(),
            source: io::Error::other("detector stdout was not captured"),
        })?;
        let source = JsonLinesSource::new(BufReader::new(stdout), "detector");
        Ok((DetectorProcess { child }, source))
    }

    /// Kill the child.  Safe to call repeatedly.
    pub fn kill(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => debug!("detector already exited: {status}"),
            _ => {
                if let Err(e) = self.child.kill() {
                    debug!("detector kill: {e}");
                }
                let _ = self.child.wait();
            }
        }
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Leap joints (millimetres, `+y` up) are projected into the 21-point
/// image-space skeleton the classifier expects:
///
/// * wrist ← arm bone's distal joint
/// * per digit: proximal base, intermediate base, distal base, distal tip
#[cfg(feature = "leap")]
pub struct LeapHandSource;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn name(&self) -> &'static str { "leap" }

    fn run(self: Box<Self>, mailbox: Mailbox<HandFrame>, stop: Arc<AtomicBool>) {
        use leaprs::{Connection, ConnectionConfig, EventRef};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::error!("cannot create LeapC connection: {e:?}");
                mailbox.publish(HandFrame::empty());
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("cannot open LeapMotion device: {e:?}");
            mailbox.publish(HandFrame::empty());
            return;
        }

        while !stop.load(Ordering::SeqCst) {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let EventRef::Tracking(frame) = msg.event() {
                let hands = frame.hands().iter().map(leap_hand).collect();
                mailbox.publish(HandFrame { hands });
            }
        }
    }
}

/// Interaction box used for the projection, millimetres.
#[cfg(any(feature = "leap", test))]
const LEAP_SPAN_X: f32 = 300.0;
#[cfg(any(feature = "leap", test))]
const LEAP_FLOOR_Y: f32 = 80.0;
#[cfg(any(feature = "leap", test))]
const LEAP_SPAN_Y: f32 = 350.0;

/// Leap joint `[x, y, z]` in millimetres to an image-space landmark.
#[cfg(any(feature = "leap", test))]
fn leap_point_to_image([x, y, z]: [f32; 3]) -> Landmark {
    Landmark::new(
        0.5 + x / LEAP_SPAN_X,
        1.0 - (y - LEAP_FLOOR_Y) / LEAP_SPAN_Y,
        z / LEAP_SPAN_X,
    )
}

#[cfg(feature = "leap")]
fn leap_to_image(v: leaprs::LeapVectorRef<'_>) -> Landmark {
    leap_point_to_image(v.array())
}

#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::HandRef<'_>) -> Hand {
    let mut lm = [Landmark::default(); hand_gesture::LANDMARK_COUNT];
    lm[0] = leap_to_image(hand.arm().next_joint());
    for (d, digit) in hand.digits().iter().enumerate() {
        let base = 1 + d * 4;
        lm[base]     = leap_to_image(digit.proximal().prev_joint());
        lm[base + 1] = leap_to_image(digit.intermediate().prev_joint());
        lm[base + 2] = leap_to_image(digit.distal().prev_joint());
        lm[base + 3] = leap_to_image(digit.distal().next_joint());
    }
    Hand::new(lm)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn hand_json(n: usize) -> String {
        let pts: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f32 / 40.0))
            .collect();
        format!(r#"{{"landmarks":[{}]}}"#, pts.join(","))
    }

    #[test]
    fn parses_hands_and_drops_short_ones() {
        let line = format!(r#"{{"hands":[{},{}]}}"#, hand_json(21), hand_json(20));
        let frame = parse_detection_line(&line).unwrap();
        assert_eq!(frame.hand_count(), 1);
    }

    #[test]
    fn missing_hands_key_is_an_empty_frame() {
        assert!(parse_detection_line("{}").unwrap().is_empty());
        assert!(parse_detection_line(r#"{"error":"camera busy"}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_line_is_an_error() {
        assert!(matches!(parse_detection_line("{\"hands\": ["), Err(SceneError::Json(_))));
    }

    #[test]
    fn json_source_skips_garbage_and_ends_neutral() {
        let input = format!(
            "not json\n\n{{\"hands\":[{}]}}\n",
            hand_json(21)
        );
        let mailbox = Mailbox::new();
        let source = Box::new(JsonLinesSource::new(Cursor::new(input), "test"));
        source.run(mailbox.clone(), Arc::new(AtomicBool::new(false)));
        // the last published frame is the end-of-input empty frame
        assert_eq!(mailbox.take(), Some(HandFrame::empty()));
    }

    #[test]
    fn json_source_honours_stop() {
        let input = format!("{{\"hands\":[{}]}}\n", hand_json(21));
        let mailbox = Mailbox::new();
        let source = Box::new(JsonLinesSource::new(Cursor::new(input), "test"));
        source.run(mailbox.clone(), Arc::new(AtomicBool::new(true)));
        assert!(mailbox.is_empty());
    }

    #[test]
    fn sim_source_publishes_held_pose() {
        let (tx, rx) = mpsc::channel();
        let mailbox = Mailbox::new();
        let mut handle = spawn_hand_source(
            SimHandSource { rx, period: Duration::from_millis(1) },
            mailbox.clone(),
        )
        .unwrap();
        tx.send(SimInput::Pose(SimPose::Red)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut seen = None;
        while Instant::now() < deadline {
            if let Some(f) = mailbox.take() {
                if !f.is_empty() {
                    seen = Some(f);
                    break;
                }
            }
            thread::sleep(Duration::from_millis(2));
        }
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
        assert_eq!(seen.map(|f| f.hand_count()), Some(1));
    }

    #[test]
    fn sim_poses_build_expected_hand_counts() {
        assert!(SimPose::NoHands.frame().is_empty());
        assert_eq!(SimPose::TwinPurple.frame().hand_count(), 2);
        assert_eq!(SimPose::Fist.frame().hand_count(), 1);
    }

    #[test]
    fn empty_detector_command_is_rejected() {
        assert!(matches!(DetectorProcess::spawn(&[]), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn leap_joints_project_into_image_space() {
        let centre = leap_point_to_image([0.0, LEAP_FLOOR_Y + LEAP_SPAN_Y / 2.0, 0.0]);
        assert!((centre.x - 0.5).abs() < 1e-6);
        assert!((centre.y - 0.5).abs() < 1e-6);

        // Higher above the sensor is further up the image.
        let high = leap_point_to_image([0.0, 300.0, 0.0]);
        let low  = leap_point_to_image([0.0, 120.0, 0.0]);
        assert!(high.y < low.y);

        let right = leap_point_to_image([150.0, 200.0, -30.0]);
        assert!((right.x - 1.0).abs() < 1e-6);
        assert!((right.z + 0.1).abs() < 1e-6);
    }
}
