//! Chimera Shadow Garden overlay.
//!
//! The liquid shadow ground and the
//! tendrils that rise out of it while `megumi` is active.
//!
//! This is not part of the particle field: it is a small set of animated
//! values (expansion, per-tendril rise, ground ripple) that a renderer
//! draws alongside the particles.

use std::f32::consts::TAU;

use glam::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

pub const TENDRIL_COUNT: usize = 12;

/// Height of the shadow ground plane in scene space.
pub const GROUND_Y: f32 = -22.0;

/// Full tendril height when `rise == 1`.
pub const TENDRIL_HEIGHT: f32 = 20.0;

const RISE_DURATION: f32 = 0.35;
const HOLD_DURATION: f32 = 0.15;
const FALL_DURATION: f32 = 0.35;
const CYCLE_LENGTH:  f32 = RISE_DURATION + HOLD_DURATION + FALL_DURATION;
const TENDRIL_SPEED: f32 = 0.12;

/// Expansion units per second, both growing and receding.
const EXPANSION_RATE: f32 = 1.2;

// ════════════════════════════════════════════════════════════════════════════
// Tendril
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tendril {
    /// Base position on the ground plane.
    pub x: f32,
    pub z: f32,
    /// Offset into the rise cycle, `[0, 0.9)`.
    pub phase: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// ShadowGarden
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ShadowGarden {
    time:      f32,
    expansion: f32,
    tendrils:  [Tendril; TENDRIL_COUNT],
}

impl Default for ShadowGarden {
    fn default() -> Self { Self::new() }
}

impl ShadowGarden {
    pub fn new() -> Self {
        let tendrils = std::array::from_fn(|i| {
            let i      = i as f32;
            let angle  = seeded_random(i * 13.0) * TAU;
            let radius = 25.0 + seeded_random(i * 17.0) * 70.0;
            Tendril {
                x:     angle.cos() * radius,
                z:     angle.sin() * radius,
                phase: seeded_random(i * 7.0) * 0.9,
            }
        });
        ShadowGarden { time: 0.0, expansion: 0.0, tendrils }
    }

    /// Advance by `dt` seconds; the garden grows while `active` and recedes
    /// otherwise.
    pub fn tick(&mut self, dt: f32, active: bool) {
        let dt = dt.max(0.0);
        self.time += dt;
        let step = EXPANSION_RATE * dt;
        self.expansion = if active {
            (self.expansion + step).min(1.0)
        } else {
            (self.expansion - step).max(0.0)
        };
    }

    pub fn time(&self) -> f32 { self.time }

    /// 0 = hidden, 1 = fully spread.
    pub fn expansion(&self) -> f32 { self.expansion }

    pub fn is_visible(&self) -> bool { self.expansion > 0.0 }

    /// Ground-plane opacity.
    pub fn ground_alpha(&self) -> f32 {
        0.92 * smoothstep(0.0, 0.25, self.expansion)
    }

    /// Tendril opacity at full rise.
    pub fn tendril_alpha(&self) -> f32 {
        0.85 * smoothstep(0.0, 0.2, self.expansion)
    }

    pub fn tendrils(&self) -> &[Tendril; TENDRIL_COUNT] { &self.tendrils }

    /// Rise fraction of tendril `idx` at the current time, `[0, 1]`.
    pub fn tendril_rise(&self, idx: usize) -> f32 {
        let Some(t) = self.tendrils.get(idx) else { return 0.0 };
        let cycle = (self.time * TENDRIL_SPEED + t.phase).fract() * CYCLE_LENGTH;
        rise_phase(cycle).max(0.0)
    }

    /// Base and tip of tendril `idx` in scene space.
    pub fn tendril_segment(&self, idx: usize) -> Option<(Vec3, Vec3)> {
        let t = self.tendrils.get(idx)?;
        let base = Vec3::new(t.x, GROUND_Y, t.z);
        let tip  = base + Vec3::Y * (TENDRIL_HEIGHT * self.tendril_rise(idx));
        Some((base, tip))
    }

    /// Ripple height of the ground plane at `(x, z)`.
    pub fn ground_elevation(&self, x: f32, z: f32) -> f32 {
        let t = self.time;
        let r = (x * x + z * z).sqrt();
        let ripple = (r * 0.4 - t * 1.2).sin() * 0.15
            + (r * 0.7 + t * 0.8).sin() * 0.08
            + (x * 0.5 + z * 0.5 - t).sin() * 0.06;
        ripple + (x * 0.2 + t * 0.5).sin() * (z * 0.2 + t * 0.3).cos() * 0.1
    }
}

/// Rise fraction for a position inside one rise/hold/fall cycle.
fn rise_phase(cycle: f32) -> f32 {
    if cycle < RISE_DURATION {
        return cycle / RISE_DURATION;
    }
    if cycle < RISE_DURATION + HOLD_DURATION {
        return 1.0;
    }
    1.0 - (cycle - RISE_DURATION - HOLD_DURATION) / FALL_DURATION
}

/// Deterministic `[0, 1)` hash of a seed.
fn seeded_random(seed: f32) -> f32 {
    let x = (seed * 9999.0).sin() * 10000.0;
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tendrils_sit_on_the_ground_ring() {
        let g = ShadowGarden::new();
        for t in g.tendrils() {
            let r = (t.x * t.x + t.z * t.z).sqrt();
            assert!((25.0..=95.0).contains(&r), "radius {r}");
            assert!((0.0..0.9).contains(&t.phase));
        }
    }

    #[test]
    fn layout_is_reproducible() {
        assert_eq!(ShadowGarden::new().tendrils(), ShadowGarden::new().tendrils());
    }

    #[test]
    fn rise_phase_shape() {
        assert_eq!(rise_phase(0.0), 0.0);
        assert!((rise_phase(0.175) - 0.5).abs() < 1e-5);
        assert_eq!(rise_phase(0.4), 1.0);
        assert!((rise_phase(CYCLE_LENGTH) - 0.0).abs() < 1e-5);
    }

    #[test]
    fn expansion_grows_then_recedes() {
        let mut g = ShadowGarden::new();
        assert!(!g.is_visible());
        for _ in 0..120 { g.tick(1.0 / 60.0, true); }
        assert_eq!(g.expansion(), 1.0);
        assert!((g.ground_alpha() - 0.92).abs() < 1e-6);
        for _ in 0..120 { g.tick(1.0 / 60.0, false); }
        assert_eq!(g.expansion(), 0.0);
        assert_eq!(g.tendril_alpha(), 0.0);
    }

    #[test]
    fn rise_stays_in_unit_range() {
        let mut g = ShadowGarden::new();
        for _ in 0..600 {
            g.tick(1.0 / 30.0, true);
            for i in 0..TENDRIL_COUNT {
                let r = g.tendril_rise(i);
                assert!((0.0..=1.0).contains(&r));
            }
        }
        assert_eq!(g.tendril_rise(TENDRIL_COUNT), 0.0);
        assert!(g.tendril_segment(TENDRIL_COUNT).is_none());
    }
}
