//! Free-Roam Mover
//!
//! A flying entity with no physics body. It moves along the camera-relative
//! input direction, rises and sinks with UP/DOWN, and speeds up with SPRINT.

use glam::Vec3;

use crate::config::FreeRoamConfig;
use crate::input::action::names;
use crate::input::InputFrame;

#[derive(Debug, Clone)]
pub struct FreeRoamMover {
    position: Vec3,
    velocity: Vec3,
    config: FreeRoamConfig,
}

impl FreeRoamMover {
    pub fn new(position: Vec3, config: FreeRoamConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            config,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move for `dt` seconds.
    ///
    /// Horizontal speed scales with the analog input magnitude; vertical
    /// speed with `UP - DOWN`.
    pub fn update(&mut self, input: &InputFrame, dt: f32) {
        let multiplier = if input.is_active(names::SPRINT) {
            self.config.sprint_multiplier
        } else {
            1.0
        };
        let speed = self.config.speed * multiplier;

        let vertical = input.action(names::UP) - input.action(names::DOWN);
        self.velocity = input.direction * input.magnitude * speed + Vec3::Y * vertical * speed;
        self.position += self.velocity * dt.max(0.0);
    }
}
