//! Technique → generator dispatch.
//!
//! Every generator has the shape
//! `fn(i, count, &FieldContext, &mut impl Rng) -> ParticleTarget` and is
//! independent per index: rebuilding the whole target buffer is just a
//! loop over `0..count`.

mod neutral;
mod red;
mod void;
mod purple;
mod shrine;
mod mahito;
mod hakari;
mod megumi;
mod black_flash;
mod dismantle;
mod blood;

use glam::Vec3;
use rand::Rng;

use crate::particle::ParticleTarget;
use crate::technique::Technique;

pub use blood::{BLOOD_CHARGE_SECS, BLOOD_STREAM_LENGTH};

// ════════════════════════════════════════════════════════════════════════════
// FieldContext
// ════════════════════════════════════════════════════════════════════════════

/// Continuous inputs for time-varying techniques.
///
/// Static techniques ignore it entirely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldContext {
    /// Seconds since the current technique became active.
    pub elapsed:   f32,
    /// Palm centroid in scene space.
    pub origin:    Vec3,
    /// Smoothed palm direction in scene space.  Need not be unit length.
    pub direction: Vec3,
}

impl Default for FieldContext {
    fn default() -> Self {
        FieldContext { elapsed: 0.0, origin: Vec3::ZERO, direction: Vec3::Z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Dispatch
// ════════════════════════════════════════════════════════════════════════════

/// Target attributes for particle `i` of `count` under `technique`.
///
/// Indices past `count` and `count == 0` yield [`ParticleTarget::INACTIVE`].
pub fn target<R: Rng + ?Sized>(
    technique: Technique,
    i:         usize,
    count:     usize,
    ctx:       &FieldContext,
    rng:       &mut R,
) -> ParticleTarget {
    if i >= count {
        return ParticleTarget::INACTIVE;
    }
    match technique {
        Technique::Neutral    => neutral::ambient_drift(i, count, rng),
        Technique::Red        => red::red(i, count, rng),
        Technique::Void       => void::infinite_void(i, count, rng),
        Technique::Purple     => purple::hollow_purple(i, count, rng),
        Technique::Shrine     => shrine::malevolent_shrine(i, count, rng),
        Technique::Mahito     => mahito::self_embodiment(i, count, rng),
        Technique::Hakari     => hakari::idle_death_gamble(i, count, rng),
        Technique::Megumi     => megumi::chimera_shadow_garden(i, count, rng),
        Technique::BlackFlash => black_flash::black_flash(i, count, rng),
        Technique::Dismantle  => dismantle::dismantle(i, count, rng),
        Technique::Blood      => blood::piercing_blood(i, count, ctx),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
