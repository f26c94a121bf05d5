//! Cursed Technique: Dismantle.
//!
//! Seven razor slash lines, cursed-energy
//! cracks, warped space, a two-sided cut wake, and a thin haze.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, centered, shell, unit, ParticleTarget};

const SLASHES: usize = 7;
const CRACKS: usize = 15;

pub(super) fn dismantle<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    if t < 0.2 {
        let slash  = i % SLASHES;
        let angle  = slash as f32 / SLASHES as f32 * PI + unit(rng) * 0.2;
        let dist   = t / 0.2 * 50.0 - 25.0;
        let offset = (slash as f32 - 3.0) * 6.0;
        let pos = Vec3::new(
            dist * angle.cos() + centered(rng, 0.3),
            offset + centered(rng, 0.5),
            dist * angle.sin() * 0.4,
        );
        return ParticleTarget::new(pos, Vec3::new(0.85, 0.02, 0.05), 2.8);
    }

    if t < 0.38 {
        let crack  = (i % CRACKS) as f32;
        let cx     = centered(rng, 60.0);
        let cy     = centered(rng, 40.0);
        let branch = (crack * 3.7 + cx * 0.2).sin() * 8.0;
        let pos = Vec3::new(cx + branch * 0.3, cy + (cx * 0.5).sin() * 3.0, centered(rng, 15.0));
        return ParticleTarget::new(pos, Vec3::new(0.5 + unit(rng) * 0.3, 0.0, 0.0), 1.6);
    }

    if t < 0.55 {
        let radius = 5.0 + unit(rng) * 35.0;
        let warp   = (radius * 0.3).sin() * 5.0;
        let p      = shell(rng, radius);
        let pos = Vec3::new(p.x + warp, p.y, p.z + warp * 0.5);
        return ParticleTarget::new(pos, Vec3::new(0.08, 0.0, 0.04), 0.5);
    }

    if t < 0.7 {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let px   = centered(rng, 50.0);
        let py   = centered(rng, 30.0);
        let pos = Vec3::new(
            px + side * (2.0 + unit(rng) * 3.0),
            py + side * unit(rng) * 1.5,
            centered(rng, 20.0),
        );
        return ParticleTarget::new(pos, Vec3::new(0.15, 0.05, 0.05), 0.9);
    }

    if t < 0.85 {
        let radius = 20.0 + unit(rng) * 50.0;
        let theta  = azimuth(rng);
        let pos = Vec3::new(radius * theta.cos(), centered(rng, 45.0), radius * theta.sin());
        return ParticleTarget::new(pos, Vec3::new(0.12, 0.0, 0.02), 0.3);
    }

    ParticleTarget::INACTIVE
}
