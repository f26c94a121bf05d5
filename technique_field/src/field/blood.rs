//! Blood Manipulation.
//!
//! Piercing Blood fired from the open palm.
//!
//! Unlike every other technique this one is rebuilt each frame from the
//! live palm pose, so it uses index-derived jitter only: the same
//! `(i, count, elapsed, origin, direction)` always lands on the same target
//! and the stream does not shimmer between frames.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::field::FieldContext;
use crate::particle::{band, index_jitter, index_polar, spherical, ParticleTarget};

/// Full stream length in scene units.
pub const BLOOD_STREAM_LENGTH: f32 = 70.0;

/// Seconds for the stream to extend to full length after activation.
pub const BLOOD_CHARGE_SECS: f32 = 1.0;

/// Stream lengths travelled per second by the flowing core.
const FLOW_SPEED: f32 = 0.6;

const BRIGHT_BEAM: Vec3 = Vec3::new(0.95, 0.1, 0.15);
const CRIMSON:     Vec3 = Vec3::new(0.55, 0.0, 0.05);
const MAROON:      Vec3 = Vec3::new(0.35, 0.0, 0.08);
const DARK_MIST:   Vec3 = Vec3::new(0.2, 0.0, 0.03);

pub(super) fn piercing_blood(i: usize, count: usize, ctx: &FieldContext) -> ParticleTarget {
    let t = band(i, count);
    let (dir, side, up) = stream_basis(ctx.direction);
    let charge = (ctx.elapsed / BLOOD_CHARGE_SECS).clamp(0.0, 1.0);
    let length = BLOOD_STREAM_LENGTH * charge;
    let u = index_jitter(i, 17, 1);
    let v = index_jitter(i, 31, 3);

    // Core stream, flowing outward from the palm.
    if t < 0.35 {
        let s      = (t / 0.35 + ctx.elapsed * FLOW_SPEED).fract();
        let spread = 0.6 + s * 1.2;
        let pos = ctx.origin
            + dir * (s * length)
            + side * ((u - 0.5) * spread)
            + up * ((v - 0.5) * spread);
        let heat = 1.0 + (1.0 - s) * 0.3;
        return ParticleTarget::new(pos, BRIGHT_BEAM * heat, 2.5 - s);
    }

    // Helical sheath wound around the core, three strands.
    if t < 0.55 {
        let s      = (t - 0.35) / 0.2;
        let strand = (i % 3) as f32 * (TAU / 3.0);
        let angle  = s * 40.0 + ctx.elapsed * 6.0 + strand;
        let radius = 1.5 + u * 0.8;
        let pos = ctx.origin
            + dir * (s * length)
            + (side * angle.cos() + up * angle.sin()) * radius;
        return ParticleTarget::new(pos, CRIMSON, 1.2);
    }

    // Mist cone trailing behind the palm, widening with distance.
    if t < 0.85 {
        let s     = (t - 0.55) / 0.3;
        let back  = u * 18.0;
        let cone  = back * 0.6 * v;
        let angle = index_jitter(i, 37, 11) * TAU + ctx.elapsed * 0.8;
        let pos = ctx.origin
            - dir * back
            + (side * angle.cos() + up * angle.sin()) * cone;
        return ParticleTarget::new(pos, DARK_MIST, 0.6 + s * 0.4);
    }

    // Condensed orb at the palm, breathing.
    if t < 0.95 {
        let s      = (t - 0.85) / 0.1;
        let theta  = u * TAU + ctx.elapsed * 2.0;
        let phi    = index_polar(v);
        let radius = 2.5 + (ctx.elapsed * 4.0 + s * TAU).sin() * 0.5;
        let pos = ctx.origin + dir + spherical(radius, theta, phi);
        return ParticleTarget::new(pos, MAROON, 1.5);
    }

    ParticleTarget::INACTIVE
}

/// Orthonormal `(forward, side, up)` around `direction`.
///
/// Zero or non-finite directions fall back to +Z; when `direction` is
/// nearly parallel to +Y the helper axis switches to +X.
fn stream_basis(direction: Vec3) -> (Vec3, Vec3, Vec3) {
    let dir = direction.try_normalize().unwrap_or(Vec3::Z);
    let helper = if dir.dot(Vec3::Y).abs() > 0.99 { Vec3::X } else { Vec3::Y };
    let side = dir.cross(helper).normalize();
    let up   = side.cross(dir);
    (dir, side, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(elapsed: f32, direction: Vec3) -> FieldContext {
        FieldContext { elapsed, origin: Vec3::new(1.0, 2.0, 3.0), direction }
    }

    #[test]
    fn basis_is_orthonormal_for_awkward_directions() {
        for d in [Vec3::Y, -Vec3::Y, Vec3::ZERO, Vec3::new(0.0, 0.999, 0.01), Vec3::new(3.0, -1.0, 2.0)] {
            let (f, s, u) = stream_basis(d);
            for axis in [f, s, u] {
                assert!((axis.length() - 1.0).abs() < 1e-4, "{d:?}");
            }
            assert!(f.dot(s).abs() < 1e-4);
            assert!(f.dot(u).abs() < 1e-4);
            assert!(s.dot(u).abs() < 1e-4);
        }
    }

    #[test]
    fn stream_extends_along_direction_when_charged() {
        let c = ctx(5.0, Vec3::X);
        let n = 1000;
        let reach = (0..350)
            .map(|i| (piercing_blood(i, n, &c).position - c.origin).dot(Vec3::X))
            .fold(f32::MIN, f32::max);
        assert!(reach > BLOOD_STREAM_LENGTH * 0.9);
    }

    #[test]
    fn stream_is_collapsed_at_activation() {
        let c = ctx(0.0, Vec3::Z);
        for i in 0..350 {
            let offset = piercing_blood(i, 1000, &c).position - c.origin;
            assert!(offset.dot(Vec3::Z).abs() < 1e-4, "index {i}");
        }
    }

    #[test]
    fn mist_trails_behind_the_palm() {
        let c = ctx(2.0, Vec3::Z);
        for i in 551..850 {
            let offset = piercing_blood(i, 1000, &c).position - c.origin;
            assert!(offset.z <= 1e-4, "index {i}");
        }
    }
}
