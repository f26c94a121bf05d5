//! Output boundary: what the scene tells the outside world.

use std::fmt;

use glam::Vec2;
use log::{debug, info};

// ════════════════════════════════════════════════════════════════════════════
// FrameDiagnostics
// ════════════════════════════════════════════════════════════════════════════

/// Per-detection summary for debug displays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameDiagnostics {
    pub hands_detected:     usize,
    pub technique_name:     &'static str,
    pub gesture_recognized: bool,
    /// `None` unless exactly one hand is present.
    pub palm_facing:        Option<bool>,
}

impl fmt::Display for FrameDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let palm = match self.palm_facing {
            None        => "n/a",
            Some(true)  => "facing camera",
            Some(false) => "not facing",
        };
        write!(
            f,
            "hands={}  technique={}  recognized={}  palm={}",
            self.hands_detected,
            self.technique_name,
            if self.gesture_recognized { "yes" } else { "no" },
            palm,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SceneListener
// ════════════════════════════════════════════════════════════════════════════

/// Callbacks fired from the frame path.  All default to no-ops.
pub trait SceneListener {
    /// Exactly once per technique transition.
    fn technique_changed(&mut self, _name: &str, _accent_hex: &str) {}

    /// Every processed detection; empty when no hand is present.
    fn hand_screen_points(&mut self, _points: &[Vec2]) {}

    fn diagnostics(&mut self, _diag: &FrameDiagnostics) {}
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullListener;

impl SceneListener for NullListener {}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingListener;

impl SceneListener for LoggingListener {
    fn technique_changed(&mut self, name: &str, accent_hex: &str) {
        info!("technique → {name} ({accent_hex})");
    }

    fn diagnostics(&mut self, diag: &FrameDiagnostics) {
        debug!("{diag}");
    }
}

impl<L: SceneListener + ?Sized> SceneListener for &mut L {
    fn technique_changed(&mut self, name: &str, accent_hex: &str) {
        (**self).technique_changed(name, accent_hex);
    }

    fn hand_screen_points(&mut self, points: &[Vec2]) {
        (**self).hand_screen_points(points);
    }

    fn diagnostics(&mut self, diag: &FrameDiagnostics) {
        (**self).diagnostics(diag);
    }
}
