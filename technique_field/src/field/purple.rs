//! Secret Technique: Hollow Purple.
//!
//! A dense sphere with a loose halo.

use glam::Vec3;
use rand::Rng;

use crate::particle::{centered, shell, ParticleTarget};

/// Every fifth particle belongs to the halo.
const HALO_STRIDE: usize = 5;

pub(super) fn hollow_purple<R: Rng + ?Sized>(i: usize, _count: usize, rng: &mut R) -> ParticleTarget {
    if i % HALO_STRIDE == 0 {
        let pos = Vec3::new(centered(rng, 100.0), centered(rng, 100.0), centered(rng, 100.0));
        return ParticleTarget::new(pos, Vec3::new(0.45, 0.4, 0.65), 0.8);
    }
    ParticleTarget::new(shell(rng, 20.0), Vec3::new(0.55, 0.35, 0.95), 2.5)
}
