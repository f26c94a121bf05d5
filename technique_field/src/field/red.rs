//! Reverse Cursed Technique: Red.
//!
//! A hot core and a three-arm spiral.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::particle::{band, centered, shell, unit, ParticleTarget};

const ARMS: usize = 3;

pub(super) fn red<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    // Core: solid ball, overdriven for bloom.
    if t < 0.1 {
        let radius = unit(rng) * 9.0;
        return ParticleTarget::new(shell(rng, radius), Vec3::new(2.5, 0.15, 0.2), 2.5);
    }

    // Archimedean spiral arms; `i % ARMS` picks the arm.
    let arm    = (i % ARMS) as f32;
    let angle  = t * 15.0 + arm * (TAU / ARMS as f32);
    let radius = 2.0 + t * 40.0;
    let pos = Vec3::new(
        radius * angle.cos(),
        radius * angle.sin(),
        centered(rng, 10.0 * t),
    );
    ParticleTarget::new(pos, Vec3::new(0.9, 0.05, 0.1), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn arm_particles_sit_on_the_spiral_radius() {
        let mut rng = StdRng::seed_from_u64(2);
        let n = 1000;
        for i in 100..n {
            let p = red(i, n, &mut rng);
            let expected = 2.0 + band(i, n) * 40.0;
            let planar = p.position.truncate().length();
            assert!((planar - expected).abs() < 1e-3, "index {i}");
        }
    }

    #[test]
    fn core_stays_inside_nine_units() {
        let mut rng = StdRng::seed_from_u64(2);
        for i in 0..100 {
            assert!(red(i, 1000, &mut rng).position.length() <= 9.0 + 1e-4);
        }
    }
}
