//! Domain Expansion: Malevolent Shrine.
//!
//! Floor, four pillars, curved roof.

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, centered, unit, ParticleTarget};

const FLOOR_Y: f32 = -15.0;

pub(super) fn malevolent_shrine<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    if t < 0.3 {
        let pos = Vec3::new(centered(rng, 80.0), FLOOR_Y, centered(rng, 80.0));
        return ParticleTarget::new(pos, Vec3::new(0.4, 0.0, 0.0), 0.8);
    }

    if t < 0.4 {
        // Pillar corner from `i % 4`: (±12, ±8).
        let corner = i % 4;
        let px = if corner < 2 { 12.0 } else { -12.0 };
        let pz = if corner % 2 == 0 { 8.0 } else { -8.0 };
        let pos = Vec3::new(
            px + centered(rng, 2.0),
            FLOOR_Y + unit(rng) * 30.0,
            pz + centered(rng, 2.0),
        );
        return ParticleTarget::new(pos, Vec3::splat(0.2), 0.6);
    }

    if t < 0.6 {
        let theta = azimuth(rng);
        let rad   = unit(rng) * 30.0;
        let curve = (rad / 30.0).powi(2) * 10.0;
        let pos = Vec3::new(
            rad * theta.cos(),
            15.0 - curve + unit(rng) * 2.0,
            rad * theta.sin() * 0.6,
        );
        return ParticleTarget::new(pos, Vec3::new(0.6, 0.0, 0.0), 0.6);
    }

    ParticleTarget::INACTIVE
}
