//! Domain Expansion: Self-Embodiment of Perfection.
//!
//! A pulsing organic mass
//! with six writhing arms and a loose drift ring.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, centered, shell, unit, ParticleTarget};

const ARMS: usize = 6;

pub(super) fn self_embodiment<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    if t < 0.25 {
        let radius  = 8.0 + (t * 20.0).sin() * 4.0 + unit(rng) * 3.0;
        let stretch = 1.0 + (t * 15.0).sin() * 0.5;
        let p = shell(rng, radius);
        return ParticleTarget::new(
            Vec3::new(p.x, p.y * stretch, p.z),
            Vec3::new(0.05, 0.65, 0.55),
            2.0,
        );
    }

    if t < 0.5 {
        let arm       = (i % ARMS) as f32;
        let arm_angle = arm / ARMS as f32 * TAU;
        let dist      = (t - 0.25) * 4.0 * 35.0;
        let wave      = (dist * 0.3 + arm).sin() * 5.0;
        let pos = Vec3::new(
            dist * arm_angle.cos() + wave,
            wave * 0.5,
            dist * arm_angle.sin() + wave * 0.3,
        );
        return ParticleTarget::new(pos, Vec3::new(0.05, 0.45, 0.45), 1.2);
    }

    if t < 0.7 {
        let radius = 20.0 + unit(rng) * 25.0;
        let theta  = azimuth(rng);
        let pos = Vec3::new(radius * theta.cos(), centered(rng, 30.0), radius * theta.sin());
        return ParticleTarget::new(pos, Vec3::new(0.15, 0.75, 0.65), 0.5);
    }

    ParticleTarget::INACTIVE
}
