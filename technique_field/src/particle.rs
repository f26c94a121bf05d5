//! Per-particle target record and the sampling helpers the generators share.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

// ════════════════════════════════════════════════════════════════════════════
// ParticleTarget
// ════════════════════════════════════════════════════════════════════════════

/// What one particle should look like under the current technique.
///
/// Colors are linear RGB and may exceed 1.0; the bloom pass relies on that
/// for the hot cores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleTarget {
    pub position: Vec3,
    pub color:    Vec3,
    pub size:     f32,
}

impl ParticleTarget {
    /// Sentinel for "this particle is not used by the technique": at the
    /// origin, black, zero size.
    pub const INACTIVE: ParticleTarget = ParticleTarget {
        position: Vec3::ZERO,
        color:    Vec3::ZERO,
        size:     0.0,
    };

    pub fn new(position: Vec3, color: Vec3, size: f32) -> Self {
        ParticleTarget { position, color, size }
    }

    pub fn is_inactive(&self) -> bool {
        self.size == 0.0 && self.color == Vec3::ZERO && self.position == Vec3::ZERO
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.color.is_finite() && self.size.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sampling helpers
// ════════════════════════════════════════════════════════════════════════════

/// Fractional position of `i` in `0..count`.
pub(crate) fn band(i: usize, count: usize) -> f32 {
    i as f32 / count.max(1) as f32
}

/// Uniform draw in `[0, 1)`.
pub(crate) fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>()
}

/// Uniform draw in `[-span/2, span/2)`.
pub(crate) fn centered<R: Rng + ?Sized>(rng: &mut R, span: f32) -> f32 {
    (unit(rng) - 0.5) * span
}

/// Point at `radius` given azimuth `theta` and polar angle `phi`.
pub(crate) fn spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Uniformly distributed point on a sphere shell of `radius`.
///
/// The polar angle is inverse-transform sampled (`acos(2u − 1)`) so points
/// do not bunch at the poles.
pub(crate) fn shell<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = unit(rng) * TAU;
    let phi   = (2.0 * unit(rng) - 1.0).acos();
    spherical(radius, theta, phi)
}

/// Random azimuth in `[0, 2π)`.
pub(crate) fn azimuth<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    unit(rng) * TAU
}

/// Index-derived pseudo-random value in `[0, 1)`: `((i·a + b) mod 100) / 100`.
///
/// Stable for a fixed index, which is what the per-frame blood stream needs.
pub(crate) fn index_jitter(i: usize, a: usize, b: usize) -> f32 {
    (i.wrapping_mul(a).wrapping_add(b) % 100) as f32 / 100.0
}

/// Polar angle for a deterministic, roughly uniform sphere sample.
pub(crate) fn index_polar(u: f32) -> f32 {
    (2.0 * u - 1.0).clamp(-1.0, 1.0).acos()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
