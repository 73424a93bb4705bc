//! Orbit Camera Module
//!
//! Third-person follow camera. Mouse movement rotates the view around the
//! followed entity; the camera sits `distance` behind and `height` above it.
//!
//! Orientation convention (right-handed, -Z forward):
//! - yaw rotates about +Y; positive yaw turns the view to the left
//! - pitch rotates about +X; positive pitch looks up
//! - the world quaternion is `Quat::from_euler(YXZ, yaw, pitch, 0)`

use glam::{EulerRot, Quat, Vec2, Vec3};

use super::CameraView;
use crate::config::CameraConfig;

/// Third-person camera orbiting a target point.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point being followed (usually the primary entity's position)
    pub target: Vec3,
    /// Horizontal angle (radians), unrestricted
    pub yaw: f32,
    /// Vertical angle (radians), clamped to the configured limits
    pub pitch: f32,
    config: CameraConfig,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Follow a new target position.
    #[inline]
    pub fn follow(&mut self, target: Vec3) {
        self.target = target;
    }

    #[inline]
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Set the pitch (clamped to the configured limits).
    #[inline]
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.config.pitch_min, self.config.pitch_max);
    }

    /// Rotate by a mouse delta that is already scaled to radians.
    ///
    /// Moving the mouse right turns the view right (yaw decreases); moving it
    /// down looks down.
    pub fn apply_mouse_delta(&mut self, delta: Vec2) {
        self.yaw -= delta.x;
        self.set_pitch(self.pitch - delta.y);
    }

    /// Unit vector the camera looks along.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.world_quaternion() * Vec3::NEG_Z
    }

    /// World-space camera position: behind the target along the view
    /// direction, raised by the configured height.
    pub fn position(&self) -> Vec3 {
        self.target + Vec3::Y * self.config.height - self.forward() * self.config.distance
    }
}

impl CameraView for OrbitCamera {
    fn world_quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = OrbitCamera::default();
        let forward = camera.forward();
        assert!(forward.x.abs() < 0.001);
        assert!(forward.y.abs() < 0.001);
        assert!((forward.z + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_mouse_right_turns_right() {
        let mut camera = OrbitCamera::default();
        camera.apply_mouse_delta(Vec2::new(0.3, 0.0));

        assert!((camera.yaw + 0.3).abs() < 0.001);
        assert!(camera.forward().x > 0.0);
    }

    #[test]
    fn test_mouse_down_looks_down() {
        let mut camera = OrbitCamera::default();
        camera.apply_mouse_delta(Vec2::new(0.0, 0.2));

        assert!((camera.pitch + 0.2).abs() < 0.001);
        assert!(camera.forward().y < 0.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = OrbitCamera::default();
        camera.apply_mouse_delta(Vec2::new(0.0, -100.0));
        assert!((camera.pitch - camera.config().pitch_max).abs() < 0.001);

        camera.apply_mouse_delta(Vec2::new(0.0, 100.0));
        assert!((camera.pitch - camera.config().pitch_min).abs() < 0.001);
    }

    #[test]
    fn test_position_behind_target() {
        let mut camera = OrbitCamera::default();
        camera.follow(Vec3::new(1.0, 0.0, 2.0));

        let position = camera.position();
        let expected_z = 2.0 + camera.config().distance;
        assert!((position.z - expected_z).abs() < 0.001);
        assert!((position.y - camera.config().height).abs() < 0.001);
        assert!((position.x - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_quaternion_round_trips_yaw() {
        let mut camera = OrbitCamera::default();
        camera.set_yaw(0.8);
        camera.set_pitch(-0.4);

        let (yaw, pitch, _) = camera.world_quaternion().to_euler(EulerRot::YXZ);
        assert!((yaw - 0.8).abs() < 0.001);
        assert!((pitch + 0.4).abs() < 0.001);
    }
}
