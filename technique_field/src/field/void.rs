//! Domain Expansion: Infinite Void.
//!
//! A thin event-horizon ring inside a
//! wide starfield shell.

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, centered, shell, unit, ParticleTarget};

const HORIZON_RADIUS: f32 = 26.0;

pub(super) fn infinite_void<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    if band(i, count) < 0.15 {
        let angle = azimuth(rng);
        let pos = Vec3::new(
            HORIZON_RADIUS * angle.cos(),
            HORIZON_RADIUS * angle.sin(),
            centered(rng, 1.0),
        );
        return ParticleTarget::new(pos, Vec3::new(0.9, 0.95, 1.0), 2.5);
    }

    let radius = 30.0 + unit(rng) * 90.0;
    ParticleTarget::new(shell(rng, radius), Vec3::new(0.05, 0.5, 0.9), 0.7)
}
