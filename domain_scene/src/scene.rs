//! Scene state machine.
//!
//! `Scene` owns the current technique, the live particle buffers, and the
//! target buffers they chase.  Targets are rebuilt in full on every
//! transition and, for time-varying techniques, on every tick.

use glam::Vec3;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use technique_field::{target, FieldContext, ParticleTarget, ShadowGarden, Technique, TechniqueDescriptor};

use crate::config::SceneConfig;
use crate::listener::SceneListener;

// Below this the shake is snapped to zero.
const SHAKE_EPSILON: f32 = 1e-3;

// ════════════════════════════════════════════════════════════════════════════
// ParticleBuffers
// ════════════════════════════════════════════════════════════════════════════

/// Flat attribute arrays: positions and colors are `3N`, sizes `N`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleBuffers {
    pub positions: Vec<f32>,
    pub colors:    Vec<f32>,
    pub sizes:     Vec<f32>,
}

impl ParticleBuffers {
    pub fn zeroed(count: usize) -> Self {
        ParticleBuffers {
            positions: vec![0.0; count * 3],
            colors:    vec![0.0; count * 3],
            sizes:     vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn color(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[i * 3..i * 3 + 3])
    }

    pub fn set(&mut self, i: usize, p: &ParticleTarget) {
        p.position.write_to_slice(&mut self.positions[i * 3..i * 3 + 3]);
        p.color.write_to_slice(&mut self.colors[i * 3..i * 3 + 3]);
        self.sizes[i] = p.size;
    }

    /// Move every attribute `fraction` of the way toward `target`.
    pub fn blend_toward(&mut self, target: &ParticleBuffers, fraction: f32) {
        lerp_into(&mut self.positions, &target.positions, fraction);
        lerp_into(&mut self.colors, &target.colors, fraction);
        lerp_into(&mut self.sizes, &target.sizes, fraction);
    }
}

fn lerp_into(live: &mut [f32], target: &[f32], t: f32) {
    for (l, &g) in live.iter_mut().zip(target) {
        *l += (g - *l) * t;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene {
    technique:   Technique,
    live:        ParticleBuffers,
    targets:     ParticleBuffers,
    blend:       f32,

    // ── time-varying inputs ──────────────────────────────────────────────
    field:       FieldContext,
    aim:         Vec3,
    blood_lerp:  f32,
    active_secs: f32,

    // ── transition effects ───────────────────────────────────────────────
    shake:            f32,
    transition_shake: f32,
    shake_decay:      f32,
    garden:           ShadowGarden,

    rebuilds:    u64,
    rng:         StdRng,
}

impl Scene {
    pub fn new(cfg: &SceneConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_os_rng())
    }

    /// Reproducible scene for tests and recordings.
    pub fn seeded(cfg: &SceneConfig, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: &SceneConfig, rng: StdRng) -> Self {
        let mut scene = Scene {
            technique:        Technique::Neutral,
            live:             ParticleBuffers::zeroed(cfg.particle_count),
            targets:          ParticleBuffers::zeroed(cfg.particle_count),
            blend:            cfg.blend_fraction,
            field:            FieldContext::default(),
            aim:              Vec3::Z,
            blood_lerp:       cfg.blood_lerp,
            active_secs:      0.0,
            shake:            0.0,
            transition_shake: cfg.transition_shake,
            shake_decay:      cfg.shake_decay,
            garden:           ShadowGarden::new(),
            rebuilds:         0,
            rng,
        };
        scene.rebuild_targets();
        scene
    }

    // ── transitions ──────────────────────────────────────────────────────

    /// Switch technique.  Returns `false` (and does nothing) when
    /// `technique` is already current.
    pub fn set_technique(&mut self, technique: Technique, listener: &mut dyn SceneListener) -> bool {
        if technique == self.technique {
            return false;
        }
        let from = self.technique;
        self.technique = technique;
        self.active_secs = 0.0;
        self.field.elapsed = 0.0;
        self.shake = if technique == Technique::Neutral { 0.0 } else { self.transition_shake };

        let d = technique.descriptor();
        info!("{from} → {technique}: {} (bloom {:.1})", d.name, d.bloom);
        listener.technique_changed(d.name, &d.accent_hex());

        self.rebuild_targets();
        true
    }

    /// Switch by identifier.  Unknown names fall back to `neutral`.
    pub fn set_technique_by_name(&mut self, id: &str, listener: &mut dyn SceneListener) -> bool {
        let technique = id.parse().unwrap_or_else(|e| {
            warn!("{e}; falling back to neutral");
            Technique::Neutral
        });
        self.set_technique(technique, listener)
    }

    /// Palm origin and raw direction for the blood stream.  The direction
    /// is smoothed on each tick.
    pub fn aim_blood(&mut self, origin: Vec3, direction: Vec3) {
        self.field.origin = origin;
        if let Some(d) = direction.try_normalize() {
            self.aim = d;
        }
    }

    // ── per frame ────────────────────────────────────────────────────────

    /// Advance by `dt` seconds: refresh time-varying targets, blend the
    /// live buffers, decay the shake, and animate the overlay.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.active_secs += dt;

        if self.technique.is_time_varying() {
            self.field.direction += (self.aim - self.field.direction) * self.blood_lerp;
            self.field.elapsed = self.active_secs;
            self.rebuild_targets();
        }

        self.live.blend_toward(&self.targets, self.blend);

        self.shake *= self.shake_decay;
        if self.shake < SHAKE_EPSILON {
            self.shake = 0.0;
        }

        self.garden.tick(dt, self.technique == Technique::Megumi);
    }

    fn rebuild_targets(&mut self) {
        let count = self.targets.len();
        for i in 0..count {
            let p = target(self.technique, i, count, &self.field, &mut self.rng);
            self.targets.set(i, &p);
        }
        self.rebuilds += 1;
    }

    /// Screen offset for this frame's camera shake, in pixels.
    pub fn shake_offset(&mut self, pixels_per_unit: f32) -> (f32, f32) {
        if self.shake <= 0.0 {
            return (0.0, 0.0);
        }
        let scale = self.shake * pixels_per_unit;
        let dx = (self.rng.random::<f32>() - 0.5) * scale;
        let dy = (self.rng.random::<f32>() - 0.5) * scale;
        (dx, dy)
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn technique(&self) -> Technique { self.technique }
    pub fn descriptor(&self) -> TechniqueDescriptor { self.technique.descriptor() }
    pub fn live(&self) -> &ParticleBuffers { &self.live }
    pub fn targets(&self) -> &ParticleBuffers { &self.targets }
    pub fn particle_count(&self) -> usize { self.live.len() }
    pub fn field(&self) -> &FieldContext { &self.field }
    pub fn shake(&self) -> f32 { self.shake }
    pub fn garden(&self) -> &ShadowGarden { &self.garden }
    /// Seconds since the current technique became active.
    pub fn active_secs(&self) -> f32 { self.active_secs }
    /// Number of full target rebuilds so far, including the initial one.
    pub fn rebuild_count(&self) -> u64 { self.rebuilds }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<(String, String)>,
    }

    impl SceneListener for Recorder {
        fn technique_changed(&mut self, name: &str, accent_hex: &str) {
            self.changes.push((name.to_string(), accent_hex.to_string()));
        }
    }

    fn small() -> SceneConfig {
        SceneConfig { particle_count: 400, ..SceneConfig::default() }
    }

    #[test]
    fn repeated_switch_rebuilds_once_and_notifies_once() {
        let mut scene = Scene::seeded(&small(), 1);
        let mut rec = Recorder::default();
        let base = scene.rebuild_count();

        assert!(scene.set_technique(Technique::Red, &mut rec));
        assert!(!scene.set_technique(Technique::Red, &mut rec));

        assert_eq!(scene.rebuild_count(), base + 1);
        assert_eq!(rec.changes.len(), 1);
        assert!(rec.changes[0].0.contains("Red"));
        assert_eq!(rec.changes[0].1, "#ff3333");
    }

    #[test]
    fn static_technique_is_not_rebuilt_per_tick() {
        let mut scene = Scene::seeded(&small(), 2);
        scene.set_technique(Technique::Void, &mut Recorder::default());
        let n = scene.rebuild_count();
        for _ in 0..5 {
            scene.tick(1.0 / 60.0);
        }
        assert_eq!(scene.rebuild_count(), n);
    }

    #[test]
    fn blood_is_rebuilt_every_tick() {
        let mut scene = Scene::seeded(&small(), 3);
        scene.aim_blood(Vec3::new(0.0, -5.0, 2.0), Vec3::Z);
        scene.set_technique(Technique::Blood, &mut Recorder::default());
        let n = scene.rebuild_count();
        for _ in 0..5 {
            scene.tick(1.0 / 60.0);
        }
        assert_eq!(scene.rebuild_count(), n + 5);
        assert!((scene.field().elapsed - 5.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn blood_direction_is_smoothed_toward_aim() {
        let mut scene = Scene::seeded(&small(), 4);
        scene.aim_blood(Vec3::ZERO, Vec3::X);
        scene.set_technique(Technique::Blood, &mut Recorder::default());
        scene.tick(0.016);
        let d = scene.field().direction;
        assert!((d.x - 0.12).abs() < 1e-5);
        assert!((d.z - 0.88).abs() < 1e-5);
    }

    #[test]
    fn unknown_name_falls_back_to_neutral() {
        let mut scene = Scene::seeded(&small(), 5);
        let mut rec = Recorder::default();
        scene.set_technique(Technique::Hakari, &mut rec);
        scene.set_technique_by_name("domain-of-nonsense", &mut rec);
        assert_eq!(scene.technique(), Technique::Neutral);
        assert_eq!(rec.changes.last().unwrap(), &("Neutral State".to_string(), "#00ffff".to_string()));
    }

    #[test]
    fn live_buffers_converge_geometrically() {
        let mut scene = Scene::seeded(&small(), 6);
        scene.set_technique(Technique::Shrine, &mut Recorder::default());
        let gap = |s: &Scene| {
            s.live().positions.iter().zip(&s.targets().positions)
                .map(|(l, t)| (t - l).abs())
                .fold(0.0f32, f32::max)
        };

        let mut prev = gap(&scene);
        assert!(prev > 1.0);
        for _ in 0..20 {
            scene.tick(1.0 / 60.0);
            let g = gap(&scene);
            assert!((g / prev - 0.9).abs() < 1e-3, "ratio {}", g / prev);
            prev = g;
        }
        for _ in 0..300 {
            scene.tick(1.0 / 60.0);
        }
        assert!(gap(&scene) < 1e-4);
    }

    #[test]
    fn shake_is_set_on_transition_and_decays() {
        let mut scene = Scene::seeded(&small(), 7);
        scene.set_technique(Technique::Purple, &mut Recorder::default());
        assert_eq!(scene.shake(), 0.4);
        scene.tick(0.016);
        assert!((scene.shake() - 0.36).abs() < 1e-6);
        for _ in 0..100 {
            scene.tick(0.016);
        }
        assert_eq!(scene.shake(), 0.0);
        assert_eq!(scene.shake_offset(40.0), (0.0, 0.0));
    }

    #[test]
    fn entering_neutral_clears_shake() {
        let mut scene = Scene::seeded(&small(), 8);
        let mut rec = Recorder::default();
        scene.set_technique(Technique::Red, &mut rec);
        scene.set_technique(Technique::Neutral, &mut rec);
        assert_eq!(scene.shake(), 0.0);
    }

    #[test]
    fn shake_offset_is_bounded() {
        let mut scene = Scene::seeded(&small(), 9);
        scene.set_technique(Technique::BlackFlash, &mut Recorder::default());
        for _ in 0..50 {
            let (dx, dy) = scene.shake_offset(40.0);
            assert!(dx.abs() <= 8.0 && dy.abs() <= 8.0);
        }
    }

    #[test]
    fn garden_grows_only_under_megumi() {
        let mut scene = Scene::seeded(&small(), 10);
        scene.tick(0.5);
        assert!(!scene.garden().is_visible());
        scene.set_technique(Technique::Megumi, &mut Recorder::default());
        scene.tick(0.5);
        assert!(scene.garden().expansion() > 0.5);
    }
}
