//! Controls Tests - Dispatch, Gamepad Polling, and Player Routing
//!
//! Feeds physical input through the controls dispatcher and checks what each
//! registered entity ends up seeing.

use glam::{Quat, Vec2, Vec3};
use stride_engine::config::ControlsConfig;
use stride_engine::entity::Archetype;
use stride_engine::input::{
    ActionObject, BindingsObject, Controls, GamepadState, InputDevice, KeyId, NoGamepads, codes,
    names,
};
use uuid::Uuid;

fn controls() -> Controls {
    let mut controls = Controls::new(ControlsConfig::default());
    controls.register_bindings(Archetype::Character, None);
    controls
}

fn action(controls: &Controls, uuid: Uuid, name: &str) -> f32 {
    controls.entity(uuid).unwrap().action(name)
}

// ============================================================================
// Gamepad Polling
// ============================================================================

#[test]
fn test_deadzone_exact_zero_and_passthrough() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);

    // Below the deadzone: exactly zero, not a tiny residue.
    controls.poll_gamepads(&vec![GamepadState::new(0).with_axes(&[0.1, -0.14])]);
    assert_eq!(action(&controls, uuid, names::FORWARD), 0.0);
    assert_eq!(action(&controls, uuid, names::RIGHT), 0.0);

    // Above it: passed through unscaled.
    controls.poll_gamepads(&vec![GamepadState::new(0).with_axes(&[0.4, -0.7])]);
    assert_eq!(action(&controls, uuid, names::FORWARD), 0.7);
    assert_eq!(action(&controls, uuid, names::RIGHT), 0.4);
    assert_eq!(action(&controls, uuid, names::LEFT), 0.0);
}

#[test]
fn test_sustained_zero_not_redispatched() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);
    let idle = vec![GamepadState::new(0).with_axes(&[0.0, 0.0]).with_buttons(&[0.0])];

    controls.poll_gamepads(&idle);
    controls.set_actions(&KeyId::Code(codes::SPACE), 1.0, InputDevice::Keyboard, None);

    // The pad's JUMP button is still at zero; it must not cancel the key.
    controls.poll_gamepads(&idle);
    assert_eq!(action(&controls, uuid, names::JUMP), 1.0);
}

#[test]
fn test_button_release_dispatched_once() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);

    controls.poll_gamepads(&vec![GamepadState::new(0).with_buttons(&[1.0])]);
    assert_eq!(action(&controls, uuid, names::JUMP), 1.0);

    controls.poll_gamepads(&vec![GamepadState::new(0).with_buttons(&[0.0])]);
    assert_eq!(action(&controls, uuid, names::JUMP), 0.0);
}

#[test]
fn test_analog_trigger_value_passes_through() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);

    let mut buttons = vec![0.0; 11];
    buttons[10] = 0.35;
    controls.poll_gamepads(&vec![GamepadState::new(0).with_buttons(&buttons)]);

    assert!((action(&controls, uuid, names::SPRINT) - 0.35).abs() < 1e-6);
}

#[test]
fn test_no_pads_is_noop() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);

    controls.poll_gamepads(&NoGamepads);
    assert_eq!(action(&controls, uuid, names::FORWARD), 0.0);
}

// ============================================================================
// Player Routing
// ============================================================================

#[test]
fn test_controller_reaches_only_its_player() {
    let mut controls = controls();
    let p0 = Uuid::new_v4();
    let p1 = Uuid::new_v4();
    let unset = Uuid::new_v4();
    controls.register_entity(p0, "character", Some(0));
    controls.register_entity(p1, "character", Some(1));
    controls.register_entity(unset, "character", None);

    controls.poll_gamepads(&vec![GamepadState::new(1).with_buttons(&[1.0])]);

    assert_eq!(action(&controls, p1, names::JUMP), 1.0);
    assert_eq!(action(&controls, p0, names::JUMP), 0.0);
    assert_eq!(action(&controls, unset, names::JUMP), 0.0);

    // An unset player number is driven by pad 0.
    controls.poll_gamepads(&vec![GamepadState::new(0).with_buttons(&[1.0])]);
    assert_eq!(action(&controls, unset, names::JUMP), 1.0);
    assert_eq!(action(&controls, p0, names::JUMP), 1.0);
}

#[test]
fn test_split_screen_override_per_player() {
    let mut overrides = BindingsObject::new();
    overrides.insert(
        names::JUMP.to_string(),
        ActionObject::default().split_screen("controller", vec![KeyId::button(0), KeyId::button(3)]),
    );

    let mut controls = Controls::default();
    controls.register_bindings(Archetype::Character, Some(&overrides));
    let p0 = Uuid::new_v4();
    let p1 = Uuid::new_v4();
    controls.register_entity(p0, "character", Some(0));
    controls.register_entity(p1, "character", Some(1));

    controls.set_actions(&KeyId::button(3), 1.0, InputDevice::Controller, Some(1));
    assert_eq!(action(&controls, p1, names::JUMP), 1.0);

    controls.set_actions(&KeyId::button(3), 1.0, InputDevice::Controller, Some(0));
    assert_eq!(action(&controls, p0, names::JUMP), 0.0);
}

#[test]
fn test_register_bindings_overrides_win() {
    let mut overrides = BindingsObject::new();
    overrides.insert(
        names::JUMP.to_string(),
        ActionObject::default().key("keyboard", codes::E),
    );

    let mut controls = Controls::default();
    let bindings = controls.register_bindings(Archetype::Character, Some(&overrides));
    assert_eq!(bindings.len(), 6);

    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);

    controls.set_actions(&KeyId::Code(codes::SPACE), 1.0, InputDevice::Keyboard, None);
    assert_eq!(action(&controls, uuid, names::JUMP), 0.0);
    controls.set_actions(&KeyId::Code(codes::E), 1.0, InputDevice::Keyboard, None);
    assert_eq!(action(&controls, uuid, names::JUMP), 1.0);

    // Re-registering does not bring the default key back.
    controls.register_bindings(Archetype::Character, None);
    controls.set_actions(&KeyId::Code(codes::E), 0.0, InputDevice::Keyboard, None);
    controls.set_actions(&KeyId::Code(codes::SPACE), 1.0, InputDevice::Keyboard, None);
    assert_eq!(action(&controls, uuid, names::JUMP), 0.0);
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn test_frame_direction_follows_camera_yaw() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);
    controls.set_actions(&KeyId::Code(codes::W), 1.0, InputDevice::Keyboard, None);

    let camera = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let frame = controls.take_frame(uuid, &camera);

    assert!((frame.local - Vec3::NEG_Z).length() < 1e-6);
    assert!((frame.direction - Vec3::NEG_X).length() < 1e-5);
    assert!((frame.magnitude - 1.0).abs() < 1e-6);
}

#[test]
fn test_diagonal_is_normalized() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);
    controls.set_actions(&KeyId::Code(codes::W), 1.0, InputDevice::Keyboard, None);
    controls.set_actions(&KeyId::Code(codes::D), 1.0, InputDevice::Keyboard, None);

    let frame = controls.take_frame(uuid, &Quat::IDENTITY);
    assert!((frame.direction.length() - 1.0).abs() < 1e-6);
    assert!((frame.magnitude - 1.0).abs() < 1e-6);
}

#[test]
fn test_mouse_delta_once_per_frame() {
    let mut controls = controls();
    let uuid = Uuid::new_v4();
    controls.register_entity(uuid, "character", None);
    controls.set_mouse_sensitivity(0.5);

    controls.mouse_move(4.0, 2.0);
    controls.mouse_move(2.0, 0.0);

    let frame = controls.take_frame(uuid, &Quat::IDENTITY);
    assert_eq!(frame.mouse_delta, Vec2::new(3.0, 1.0));
    let frame = controls.take_frame(uuid, &Quat::IDENTITY);
    assert_eq!(frame.mouse_delta, Vec2::ZERO);
}

#[test]
fn test_disable_resets_primary_and_blocks_input() {
    let mut controls = controls();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    controls.register_entity(first, "character", None);
    controls.register_entity(second, "character", None);
    assert_eq!(controls.primary(), Some(first));

    controls.set_actions(&KeyId::Code(codes::W), 1.0, InputDevice::Keyboard, None);
    controls.set_enabled(false);

    assert_eq!(action(&controls, first, names::FORWARD), 0.0);
    assert_eq!(action(&controls, second, names::FORWARD), 1.0);

    controls.set_actions(&KeyId::Code(codes::S), 1.0, InputDevice::Keyboard, None);
    assert_eq!(action(&controls, second, names::BACKWARD), 0.0);

    controls.set_enabled(true);
    controls.set_actions(&KeyId::Code(codes::S), 1.0, InputDevice::Keyboard, None);
    assert_eq!(action(&controls, second, names::BACKWARD), 1.0);
}

#[test]
fn test_stick_released_during_pause_is_released_after_resume() {
    let mut controls = controls();
    let p0 = Uuid::new_v4();
    let p1 = Uuid::new_v4();
    controls.register_entity(p0, "character", Some(0));
    controls.register_entity(p1, "character", Some(1));

    controls.poll_gamepads(&vec![GamepadState::new(1).with_axes(&[0.0, -1.0])]);
    assert_eq!(action(&controls, p1, names::FORWARD), 1.0);

    // Player 1 is not primary, so pausing leaves its value in place.
    controls.set_enabled(false);
    let rest = vec![GamepadState::new(1).with_axes(&[0.0, 0.0])];
    controls.poll_gamepads(&rest);
    controls.set_enabled(true);

    for _ in 0..10 {
        controls.poll_gamepads(&rest);
    }
    assert_eq!(action(&controls, p1, names::FORWARD), 0.0);
}

#[test]
fn test_stick_held_through_pause_drives_after_resume() {
    let mut controls = controls();
    let p0 = Uuid::new_v4();
    controls.register_entity(p0, "character", Some(0));
    let held = vec![GamepadState::new(0).with_axes(&[0.0, -0.8])];

    controls.poll_gamepads(&held);
    controls.set_enabled(false);
    assert_eq!(action(&controls, p0, names::FORWARD), 0.0);

    controls.poll_gamepads(&held);
    controls.set_enabled(true);
    controls.poll_gamepads(&held);
    assert!((action(&controls, p0, names::FORWARD) - 0.8).abs() < 1e-6);
}
