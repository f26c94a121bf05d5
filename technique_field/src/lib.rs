//! # technique_field
//!
//! The closed set of cursed techniques the scene can display, their static
//! descriptors, and one particle *target* generator per technique.
//!
//! A generator maps a particle index `i` in `0..count` to a
//! [`ParticleTarget`] (position, color, size).  Membership in a sub-pattern
//! is derived purely from `i / count` (contiguous fractional bands) and
//! `i % k` (interleaved banding); no per-particle state is stored anywhere,
//! so the full target buffer can be rebuilt by calling the generator for
//! every index independently.
//!
//! ## Techniques
//!
//! | Technique | Gesture | Bands |
//! |---|---|---|
//! | `neutral` | no hand | 5 % ambient drift, rest inactive |
//! | `red` | index up | core sphere + three-arm spiral |
//! | `void` | index + middle | event-horizon ring + outer shell |
//! | `purple` | pinch + middle | sphere + 20 % interleaved halo |
//! | `shrine` | middle + ring | floor, four pillars, curved roof |
//! | `mahito` | thumb + pinky | pulsing mass, six arms, drift ring |
//! | `hakari` | thumb only | jackpot core, rings, sparkles, coins |
//! | `megumi` | index + pinky | shadow pool, tendrils, beasts, haze |
//! | `blackflash` | fist (confirmed) | core, bolts, shockwave, warp, sparks |
//! | `dismantle` | index + middle + ring | slashes, cracks, warp, wake, haze |
//! | `blood` | open palm facing viewer | stream, sheath, mist cone, orb |
//!
//! `blood` is the only time-varying technique: it reads the palm origin,
//! the smoothed palm direction, and the time since activation from a
//! [`FieldContext`], and uses index-derived jitter only, so it is stable
//! from frame to frame for fixed inputs.

pub mod technique;
pub mod particle;
pub mod field;
pub mod shadow_garden;

pub use technique::{Technique, TechniqueDescriptor, UnknownTechnique, ALL_TECHNIQUES};
pub use particle::ParticleTarget;
pub use field::{target, FieldContext};
pub use shadow_garden::ShadowGarden;
