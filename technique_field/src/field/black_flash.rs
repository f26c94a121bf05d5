//! Black Flash.
//!
//! Explosive impact: a black core, twelve jagged bolts, a
//! red shockwave ring, warped space, and a spark cylinder.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, centered, shell, unit, ParticleTarget};

const BOLTS: usize = 12;

pub(super) fn black_flash<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    if t < 0.12 {
        let radius = 2.0 + unit(rng) * 3.0;
        return ParticleTarget::new(shell(rng, radius), Vec3::new(0.08, 0.0, 0.0), 3.5);
    }

    if t < 0.28 {
        let bolt  = i % BOLTS;
        let angle = bolt as f32 / BOLTS as f32 * TAU + unit(rng) * 0.3;
        let dist  = (t - 0.12) * 6.25 * 45.0;
        let jag   = (dist * 1.5 + bolt as f32 * 7.0).sin() * (3.0 + unit(rng) * 4.0);
        let jag_y = (dist * 2.1 + bolt as f32 * 5.0).cos() * 3.0;
        let pos = Vec3::new(
            dist * angle.cos() + jag,
            jag_y,
            dist * angle.sin() + jag * 0.6,
        );
        let color = Vec3::new(0.12 + unit(rng) * 0.08, 0.0, 0.02);
        return ParticleTarget::new(pos, color, 2.0 + unit(rng));
    }

    if t < 0.45 {
        let phase     = (t - 0.28) * 5.88;
        let ring_r    = 8.0 + phase * 50.0;
        let angle     = azimuth(rng);
        let thickness = 1.5 + unit(rng) * 2.0;
        let pos = Vec3::new(
            ring_r * angle.cos() + centered(rng, thickness),
            centered(rng, thickness),
            ring_r * angle.sin() + centered(rng, thickness),
        );
        return ParticleTarget::new(pos, Vec3::new(0.7, 0.02, 0.05), 1.4);
    }

    if t < 0.65 {
        let radius = 5.0 + unit(rng) * 55.0;
        let pos    = shell(rng, radius);
        let dark   = unit(rng);
        let color = Vec3::new(
            if dark > 0.5 { 0.6 } else { 0.04 },
            0.0,
            if dark > 0.7 { 0.08 } else { 0.0 },
        );
        return ParticleTarget::new(pos, color, 0.6 + unit(rng) * 0.8);
    }

    if t < 0.82 {
        let radius = 15.0 + unit(rng) * 40.0;
        let theta  = azimuth(rng);
        let spark  = unit(rng) > 0.6;
        let pos = Vec3::new(
            radius * theta.cos() + centered(rng, 10.0),
            centered(rng, 50.0),
            radius * theta.sin() + centered(rng, 10.0),
        );
        return if spark {
            ParticleTarget::new(pos, Vec3::new(0.9, 0.1, 0.15), 1.8)
        } else {
            ParticleTarget::new(pos, Vec3::new(0.06, 0.0, 0.03), 0.3)
        };
    }

    ParticleTarget::INACTIVE
}
