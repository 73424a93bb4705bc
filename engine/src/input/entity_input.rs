//! Entity Input Aggregation
//!
//! Per-entity input state: the latest value of every resolved action plus
//! the mouse delta accumulated since the last tick. Once per tick the state
//! is folded into an [`InputFrame`] holding a camera-relative direction.

use std::collections::HashMap;

use glam::{EulerRot, Quat, Vec2, Vec3};
use uuid::Uuid;

use super::action::names;
use crate::camera::CameraView;

/// Input state of one entity registered with the controls dispatcher.
#[derive(Debug, Clone)]
pub struct EntityInput {
    uuid: Uuid,
    controls_id: String,
    player_number: Option<u8>,
    actions: HashMap<String, f32>,
    mouse_movement: Vec2,
}

impl EntityInput {
    pub fn new(uuid: Uuid, controls_id: impl Into<String>, player_number: Option<u8>) -> Self {
        Self {
            uuid,
            controls_id: controls_id.into(),
            player_number,
            actions: HashMap::new(),
            mouse_movement: Vec2::ZERO,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn controls_id(&self) -> &str {
        &self.controls_id
    }

    pub fn player_number(&self) -> Option<u8> {
        self.player_number
    }

    /// Player number used to match gamepad input; unset means player 0.
    pub fn effective_player(&self) -> u8 {
        self.player_number.unwrap_or(0)
    }

    /// Record the value of an action (clamped to `[0, 1]`).
    pub fn set_action(&mut self, name: &str, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match self.actions.get_mut(name) {
            Some(current) => *current = value,
            None => {
                self.actions.insert(name.to_string(), value);
            }
        }
    }

    /// Current value of an action, `0.0` if never set.
    pub fn action(&self, name: &str) -> f32 {
        self.actions.get(name).copied().unwrap_or(0.0)
    }

    pub fn add_mouse_movement(&mut self, delta: Vec2) {
        self.mouse_movement += delta;
    }

    /// Accumulated mouse delta without consuming it.
    pub fn peek_mouse_movement(&self) -> Vec2 {
        self.mouse_movement
    }

    /// Zero every action and the pending mouse delta.
    pub fn reset(&mut self) {
        for value in self.actions.values_mut() {
            *value = 0.0;
        }
        self.mouse_movement = Vec2::ZERO;
    }

    /// Drop every recorded action.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.mouse_movement = Vec2::ZERO;
    }

    /// Consume this tick's input.
    ///
    /// The mouse delta is snapshotted and zeroed first, so every tick sees
    /// exactly one frame of mouse motion. When `has_bindings` is false the
    /// frame carries no movement.
    pub fn take_frame(&mut self, camera: &dyn CameraView, has_bindings: bool) -> InputFrame {
        let mouse_delta = std::mem::take(&mut self.mouse_movement);

        if !has_bindings {
            return InputFrame {
                mouse_delta,
                ..InputFrame::default()
            };
        }

        let local = self.local_vector();
        let direction = camera_relative(local, camera.world_quaternion());

        InputFrame {
            local,
            direction,
            magnitude: local.length().min(1.0),
            mouse_delta,
            actions: self.actions.clone(),
        }
    }

    /// Movement vector in local space: forward is -Z, right is +X.
    ///
    /// Action values are analog, so partial input gives partial magnitude.
    pub fn local_vector(&self) -> Vec3 {
        let mut vector = Vec3::ZERO;
        vector.z -= self.action(names::FORWARD);
        vector.z += self.action(names::BACKWARD);
        vector.x -= self.action(names::LEFT);
        vector.x += self.action(names::RIGHT);
        vector
    }
}

/// Strip pitch and roll from a camera orientation, keeping only yaw.
pub fn yaw_only(rotation: Quat) -> Quat {
    let (yaw, _pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}

/// Rotate a local input vector into camera space and normalize it.
///
/// Only the camera's yaw is applied, so forward input never gains elevation.
/// A zero vector stays zero.
pub fn camera_relative(local: Vec3, camera_rotation: Quat) -> Vec3 {
    (yaw_only(camera_rotation) * local).normalize_or_zero()
}

/// One tick of aggregated input for an entity.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    /// Raw local-space vector before camera rotation.
    pub local: Vec3,
    /// Unit (or zero) camera-relative direction on the horizontal plane.
    pub direction: Vec3,
    /// Length of the raw vector, clamped to 1.
    pub magnitude: f32,
    /// Mouse motion consumed this tick (already sensitivity-scaled).
    pub mouse_delta: Vec2,
    actions: HashMap<String, f32>,
}

impl InputFrame {
    /// Frame moving along `direction` with no actions set.
    pub fn with_direction(direction: Vec3, magnitude: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            magnitude: magnitude.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Builder for setting an action value.
    pub fn with_action(mut self, name: &str, value: f32) -> Self {
        self.actions.insert(name.to_string(), value.clamp(0.0, 1.0));
        self
    }

    /// Value of an action this tick, `0.0` if unset.
    pub fn action(&self, name: &str) -> f32 {
        self.actions.get(name).copied().unwrap_or(0.0)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.action(name) > 0.0
    }

    pub fn has_movement(&self) -> bool {
        self.direction.length_squared() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn input() -> EntityInput {
        EntityInput::new(Uuid::new_v4(), "character", None)
    }

    #[test]
    fn test_forward_maps_to_negative_z() {
        let mut input = input();
        input.set_action(names::FORWARD, 1.0);

        let frame = input.take_frame(&Quat::IDENTITY, true);
        assert_eq!(frame.local, Vec3::new(0.0, 0.0, -1.0));
        assert!((frame.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert!((frame.magnitude - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_analog_magnitude() {
        let mut input = input();
        input.set_action(names::RIGHT, 0.4);

        let frame = input.take_frame(&Quat::IDENTITY, true);
        assert!((frame.local.x - 0.4).abs() < 1e-6);
        assert!((frame.magnitude - 0.4).abs() < 1e-6);
        assert!((frame.direction - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_zero_vector_never_nan() {
        let mut input = input();
        let pitched = Quat::from_euler(EulerRot::YXZ, 1.2, -0.7, 0.0);

        let frame = input.take_frame(&pitched, true);
        assert_eq!(frame.direction, Vec3::ZERO);
        assert!(!frame.direction.is_nan());
        assert_eq!(frame.magnitude, 0.0);
    }

    #[test]
    fn test_camera_pitch_is_ignored() {
        let local = Vec3::new(0.0, 0.0, -1.0);
        let looking_down = Quat::from_euler(EulerRot::YXZ, 0.0, -1.0, 0.0);

        let direction = camera_relative(local, looking_down);
        assert!(direction.y.abs() < 1e-6);
        assert!((direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_yaw_rotates_direction() {
        let local = Vec3::new(0.0, 0.0, -1.0);
        let turned = Quat::from_rotation_y(FRAC_PI_2);

        // Yawing +90 degrees about Y turns -Z into -X.
        let direction = camera_relative(local, turned);
        assert!((direction - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_mouse_delta_consumed_once() {
        let mut input = input();
        input.add_mouse_movement(Vec2::new(0.5, -0.25));
        input.add_mouse_movement(Vec2::new(0.5, 0.0));

        let frame = input.take_frame(&Quat::IDENTITY, true);
        assert_eq!(frame.mouse_delta, Vec2::new(1.0, -0.25));

        let frame = input.take_frame(&Quat::IDENTITY, true);
        assert_eq!(frame.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn test_no_bindings_means_no_movement() {
        let mut input = input();
        input.set_action(names::FORWARD, 1.0);

        let frame = input.take_frame(&Quat::IDENTITY, false);
        assert_eq!(frame.direction, Vec3::ZERO);
        assert_eq!(frame.action(names::FORWARD), 0.0);
    }

    #[test]
    fn test_reset_zeroes_actions() {
        let mut input = input();
        input.set_action(names::JUMP, 1.0);
        input.add_mouse_movement(Vec2::ONE);
        input.reset();

        assert_eq!(input.action(names::JUMP), 0.0);
        assert_eq!(input.peek_mouse_movement(), Vec2::ZERO);
    }
}
