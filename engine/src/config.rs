//! Engine Configuration
//!
//! Every tunable lives in a plain struct with a tuned `Default`. Configs
//! deserialize from JSON with `#[serde(default)]`, so a file only needs the
//! fields it overrides:
//!
//! ```json
//! { "character": { "base_speed": 5.0 }, "controls": { "deadzone": 0.2 } }
//! ```

use std::path::Path;
use std::time::Duration;

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dispatcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Controller axis magnitudes below this become exactly zero
    pub deadzone: f32,
    /// Radians of camera rotation per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.15,
            mouse_sensitivity: 0.002,
        }
    }
}

/// Animation clip names used by the character state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterClips {
    pub idle: String,
    pub walk: String,
    pub sprint: String,
    pub jump: String,
    pub fall: String,
    pub land: String,
}

impl Default for CharacterClips {
    fn default() -> Self {
        Self {
            idle: "idle".into(),
            walk: "walk".into(),
            sprint: "sprint".into(),
            jump: "jump".into(),
            fall: "fall".into(),
            land: "land".into(),
        }
    }
}

/// Character controller tuning.
///
/// The `*_lerp` fields are per-tick interpolation factors in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Walk speed in m/s
    pub base_speed: f32,
    /// Speed multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Upward velocity applied on jump, m/s
    pub jump_velocity: f32,

    pub velocity_lerp: f32,
    pub rotation_lerp: f32,
    pub ground_lerp: f32,

    /// Capsule radius in meters
    pub radius: f32,
    /// Half height of the capsule's cylinder section
    pub half_height: f32,

    /// Height above the body origin the ground probe starts from
    pub ray_offset: f32,
    /// Extra probe length below the capsule's rest height
    pub ground_tolerance: f32,
    /// Bodies rising faster than this (m/s) are never grounded
    pub ascend_epsilon: f32,

    /// Air time before the character counts as falling (also the coyote window)
    pub fall_threshold_ms: u64,
    /// Minimum time after a jump before movement states may change
    pub jump_min_ms: u64,
    /// Minimum air time for a touchdown to play the landing clip
    pub land_min_air_ms: u64,
    /// Portion of the landing clip that blends into the next state
    pub land_mix_threshold_ms: u64,

    /// Horizontal speed above which a touchdown skips the landing clip
    pub land_speed_threshold: f32,
    /// Input magnitude at or below which the character idles
    pub move_threshold: f32,
    /// Cross-fade duration between clips, seconds
    pub fade_duration: f32,

    pub clips: CharacterClips,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            base_speed: 4.0,
            sprint_multiplier: 2.0,
            jump_velocity: 6.0,
            velocity_lerp: 0.2,
            rotation_lerp: 0.2,
            ground_lerp: 0.5,
            radius: 0.35,
            half_height: 0.55,
            ray_offset: 0.5,
            ground_tolerance: 0.1,
            ascend_epsilon: 0.5,
            fall_threshold_ms: 200,
            jump_min_ms: 300,
            land_min_air_ms: 500,
            land_mix_threshold_ms: 150,
            land_speed_threshold: 1.0,
            move_threshold: 0.1,
            fade_duration: 0.2,
            clips: CharacterClips::default(),
        }
    }
}

impl CharacterConfig {
    /// Distance from the body origin to the bottom of the capsule.
    pub fn rest_height(&self) -> f32 {
        self.half_height + self.radius
    }

    pub fn fall_threshold(&self) -> Duration {
        Duration::from_millis(self.fall_threshold_ms)
    }

    pub fn jump_min(&self) -> Duration {
        Duration::from_millis(self.jump_min_ms)
    }

    pub fn land_min_air(&self) -> Duration {
        Duration::from_millis(self.land_min_air_ms)
    }

    pub fn land_mix_threshold(&self) -> Duration {
        Duration::from_millis(self.land_mix_threshold_ms)
    }
}

/// Free-roam (flying) entity tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeRoamConfig {
    /// Flight speed in m/s
    pub speed: f32,
    pub sprint_multiplier: f32,
}

impl Default for FreeRoamConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            sprint_multiplier: 3.0,
        }
    }
}

/// Physics stepping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration in m/s^2
    pub gravity: Vec3,
    /// Fixed simulation step in seconds
    pub fixed_step: f32,
    /// Sub-steps allowed per frame before the backlog is dropped
    pub max_substeps: u32,
    /// Frame delta clamp in seconds
    pub max_frame_delta: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_step: 1.0 / 60.0,
            max_substeps: 5,
            max_frame_delta: 0.1,
        }
    }
}

/// Follow camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance behind the target, meters
    pub distance: f32,
    /// Height above the target, meters
    pub height: f32,
    /// Pitch limits in radians
    pub pitch_min: f32,
    pub pitch_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            height: 1.5,
            pitch_min: -1.2,
            pitch_max: 0.8,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub controls: ControlsConfig,
    pub character: CharacterConfig,
    pub free_roam: FreeRoamConfig,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}
