//! Domain Expansion: Idle Death Gamble.
//!
//! Pachinko gold: a jackpot core,
//! three spinning rings, a rainbow sparkle burst, and falling coins.

use glam::Vec3;
use rand::Rng;

use crate::particle::{band, centered, shell, unit, ParticleTarget};

const GOLD: Vec3 = Vec3::new(1.0, 0.75, 0.05);
const COIN: Vec3 = Vec3::new(1.0, 0.85, 0.0);

pub(super) fn idle_death_gamble<R: Rng + ?Sized>(i: usize, count: usize, rng: &mut R) -> ParticleTarget {
    let t = band(i, count);

    if t < 0.15 {
        let radius = 6.0 + unit(rng) * 2.0;
        return ParticleTarget::new(shell(rng, radius), GOLD, 3.0);
    }

    if t < 0.35 {
        let ring   = i % 3;
        let ring_r = 15.0 + ring as f32 * 8.0;
        let angle  = t * 50.0 + ring as f32 * 2.0;
        let y      = (ring as f32 - 1.0) * 5.0;
        let pos = Vec3::new(ring_r * angle.cos(), y + centered(rng, 2.0), ring_r * angle.sin());
        let color = Vec3::new(1.0, 0.55 + unit(rng) * 0.35, unit(rng) * 0.2);
        return ParticleTarget::new(pos, color, 1.5);
    }

    if t < 0.6 {
        let radius = 10.0 + unit(rng) * 40.0;
        let pos    = shell(rng, radius);
        let hue    = unit(rng);
        let color  = sparkle_color(hue);
        return ParticleTarget::new(pos, color, 0.8 + unit(rng));
    }

    if t < 0.75 {
        let pos = Vec3::new(centered(rng, 60.0), 30.0 - unit(rng) * 60.0, centered(rng, 20.0));
        return ParticleTarget::new(pos, COIN, 1.2);
    }

    ParticleTarget::INACTIVE
}

/// Cheap three-channel rainbow from a single `[0, 1)` hue.
fn sparkle_color(hue: f32) -> Vec3 {
    let r = if hue > 0.5 { 1.0 } else { hue * 2.0 };
    let g = if hue > 0.3 && hue < 0.7 { 1.0 } else { 0.3 };
    let b = if hue < 0.5 { 1.0 } else { (1.0 - hue) * 2.0 };
    Vec3::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkle_color_spans_the_wheel() {
        assert_eq!(sparkle_color(0.0), Vec3::new(0.0, 0.3, 1.0));
        assert_eq!(sparkle_color(0.5), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(sparkle_color(0.75), Vec3::new(1.0, 0.3, 0.5));
    }
}
