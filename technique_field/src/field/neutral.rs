//! Neutral: a sparse ambient drift shell, everything else parked.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use crate::particle::{azimuth, band, spherical, unit, ParticleTarget};

const AMBIENT: Vec3 = Vec3::new(0.1, 0.1, 0.2);

pub(super) fn ambient_drift<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    if band(i, count) < 0.05 {
        let radius = 15.0 + unit(rng) * 20.0;
        let theta  = azimuth(rng);
        let phi    = unit(rng) * PI;
        return ParticleTarget::new(spherical(radius, theta, phi), AMBIENT, 0.4);
    }
    ParticleTarget::INACTIVE
}
