//! Domain Expansion: Chimera Shadow Garden.
//!
//! A shadow pool on the ground,
//! swaying tendrils, three shikigami silhouettes, and a dark haze.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, centered, shell, unit, ParticleTarget};

const GROUND_Y: f32 = -18.0;
const TENDRILS: usize = 8;

/// Beast centers on the xz plane, picked by `i % 3`.
const BEASTS: [(f32, f32); 3] = [(20.0, 10.0), (-15.0, -10.0), (0.0, 20.0)];

pub(super) fn chimera_shadow_garden<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    if t < 0.3 {
        let radius = unit(rng) * 40.0;
        let angle  = azimuth(rng);
        let pos = Vec3::new(radius * angle.cos(), GROUND_Y + unit(rng) * 2.0, radius * angle.sin());
        return ParticleTarget::new(pos, Vec3::new(0.06, 0.01, 0.12), 1.0);
    }

    if t < 0.5 {
        let tendril = i % TENDRILS;
        let angle   = tendril as f32 / TENDRILS as f32 * TAU;
        let height  = (t - 0.3) * 5.0 * 40.0;
        let sway    = (height * 0.1 + tendril as f32).sin() * 3.0;
        let dist    = 10.0 + tendril as f32 * 2.0;
        let pos = Vec3::new(
            dist * angle.cos() + sway,
            GROUND_Y + height,
            dist * angle.sin() + sway * 0.5,
        );
        return ParticleTarget::new(pos, Vec3::new(0.18, 0.04, 0.28), 1.5);
    }

    if t < 0.65 {
        let (bx, bz) = BEASTS[i % BEASTS.len()];
        let radius   = unit(rng) * 8.0;
        let p = shell(rng, radius);
        let pos = Vec3::new(bx + p.x, -5.0 + p.y * 1.5, bz + p.z);
        return ParticleTarget::new(pos, Vec3::new(0.1, 0.0, 0.15), 1.8);
    }

    if t < 0.8 {
        let radius = 15.0 + unit(rng) * 50.0;
        let theta  = azimuth(rng);
        let pos = Vec3::new(radius * theta.cos(), centered(rng, 40.0), radius * theta.sin());
        return ParticleTarget::new(pos, Vec3::new(0.08, 0.02, 0.12), 0.4);
    }

    ParticleTarget::INACTIVE
}
