//! Cloud orientation: palm-driven aim plus per-technique spin.
//!
//! | Technique    | Rotation                                          |
//! |--------------|---------------------------------------------------|
//! | `neutral`    | free yaw about `+y`                               |
//! | `blood`      | identity, so the stream reads in world space      |
//! | anything else| aim `−z` at the smoothed palm direction, then spin |

use glam::{EulerRot, Quat, Vec3};
use log::trace;

use technique_field::Technique;

/// Reference axis the palm direction is aligned to.
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Euler `(x, y, z)` radians added to the spin each frame.
pub fn spin_step(t: Technique) -> Vec3 {
    match t {
        Technique::Red        => Vec3::new(0.0,   0.0,   -0.1),
        Technique::Purple     => Vec3::new(0.0,   0.05,  0.2),
        Technique::Mahito     => Vec3::new(0.005, 0.01,  0.0),
        Technique::Hakari     => Vec3::new(0.0,   0.08,  0.0),
        Technique::BlackFlash => Vec3::new(0.0,   0.1,   0.15),
        Technique::Dismantle  => Vec3::new(0.0,   0.003, 0.002),
        _ => Vec3::ZERO,
    }
}

#[derive(Clone, Debug)]
pub struct OrientationController {
    lerp:          f32,
    neutral_step:  f32,
    target:        Vec3,
    smoothed:      Vec3,
    spin:          Vec3,
    neutral_yaw:   f32,
    last:          Technique,
    rotation:      Quat,
}

impl OrientationController {
    pub fn new(lerp: f32, neutral_step: f32) -> Self {
        OrientationController {
            lerp,
            neutral_step,
            target:       Vec3::Z,
            smoothed:     Vec3::Z,
            spin:         Vec3::ZERO,
            neutral_yaw:  0.0,
            last:         Technique::Neutral,
            rotation:     Quat::IDENTITY,
        }
    }

    /// Latest palm direction (scene space).  Call only when a hand is
    /// present; without new observations the smoothed aim coasts.
    pub fn observe(&mut self, direction: Vec3) {
        if let Some(d) = direction.try_normalize() {
            self.target = d;
        }
    }

    /// Advance one frame and return the composed cloud rotation.
    pub fn step(&mut self, technique: Technique) -> Quat {
        if technique != self.last {
            self.spin = Vec3::ZERO;
            self.last = technique;
        }

        self.rotation = match technique {
            Technique::Neutral => {
                self.neutral_yaw = (self.neutral_yaw + self.neutral_step) % std::f32::consts::TAU;
                Quat::from_rotation_y(self.neutral_yaw)
            }
            Technique::Blood => Quat::IDENTITY,
            _ => {
                self.smoothed += (self.target - self.smoothed) * self.lerp;
                self.spin += spin_step(technique);
                let aim = self.smoothed.try_normalize().unwrap_or(FORWARD);
                let spin = Quat::from_euler(EulerRot::XYZ, self.spin.x, self.spin.y, self.spin.z);
                Quat::from_rotation_arc(FORWARD, aim) * spin
            }
        };
        trace!("orientation {technique}: smoothed={:?} spin={:?}", self.smoothed, self.spin);
        self.rotation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn smoothed(&self) -> Vec3 {
        self.smoothed
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spin(&self) -> Vec3 {
        self.spin
    }
}

impl Default for OrientationController {
    fn default() -> Self {
        Self::new(0.11, 0.005)
    }
}
