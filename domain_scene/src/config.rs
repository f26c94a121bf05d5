//! Scene configuration and the crate's error type.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use hand_gesture::{GestureThresholds, HandError};

// ════════════════════════════════════════════════════════════════════════════
// SceneError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Thresholds(#[from] HandError),

    #[error("cannot open preview window: {0}")]
    Window(String),

    #[error("cannot start hand source {name}: {source}")]
    Source {
        name:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("hand source {0} is not available in this build")]
    SourceUnavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// SceneConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tunables for the scene, orientation and frame driver.
///
/// Every field has a default, so a JSON file only needs the keys it wants
/// to override:
///
/// ```json
/// { "particle_count": 8000, "thresholds": { "extension": 0.04 } }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub particle_count:    usize,
    /// Fraction of the remaining distance live particles cover per frame.
    pub blend_fraction:    f32,
    /// Smoothing factor for the palm-driven cloud orientation.
    pub orientation_lerp:  f32,
    /// Smoothing factor for the blood stream direction.
    pub blood_lerp:        f32,
    /// Radians per frame of free yaw in the neutral state.
    pub neutral_yaw_step:  f32,
    /// Shake intensity set on entering any non-neutral technique.
    pub transition_shake:  f32,
    /// Per-frame multiplier applied to the shake intensity.
    pub shake_decay:       f32,
    /// Pixels of offset per unit of shake intensity.
    pub shake_pixels:      f32,
    /// Landmark → scene scale in x and y.
    pub scene_scale:       f32,
    /// Landmark → scene scale for depth.
    pub depth_scale:       f32,
    pub thresholds:        GestureThresholds,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            particle_count:   20_000,
            blend_fraction:   0.1,
            orientation_lerp: 0.11,
            blood_lerp:       0.12,
            neutral_yaw_step: 0.005,
            transition_shake: 0.4,
            shake_decay:      0.9,
            shake_pixels:     40.0,
            scene_scale:      50.0,
            depth_scale:      30.0,
            thresholds:       GestureThresholds::default(),
        }
    }
}

/// Largest particle cloud the scene will allocate.
pub const MAX_PARTICLES: usize = 2_000_000;

impl SceneConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let cfg: SceneConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLES {
            return Err(SceneError::InvalidConfig(format!(
                "particle_count must be in 1..={MAX_PARTICLES}, got {}",
                self.particle_count,
            )));
        }
        let fractions = [
            ("blend_fraction",   self.blend_fraction),
            ("orientation_lerp", self.orientation_lerp),
            ("blood_lerp",       self.blood_lerp),
        ];
        for (name, v) in fractions {
            if !(v > 0.0 && v <= 1.0) {
                return Err(SceneError::InvalidConfig(format!("{name} must be in (0, 1], got {v}")));
            }
        }
        if !(0.0..1.0).contains(&self.shake_decay) {
            return Err(SceneError::InvalidConfig(format!(
                "shake_decay must be in [0, 1), got {}",
                self.shake_decay
            )));
        }
        let finite = [
            self.neutral_yaw_step, self.transition_shake, self.shake_pixels,
            self.scene_scale, self.depth_scale,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SceneError::InvalidConfig("non-finite value".into()));
        }
        self.thresholds.validate()?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
