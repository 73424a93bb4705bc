//! winit Event Adapter
//!
//! Translates winit window and device events into [`Controls`] calls.
//! Physical key codes are mapped to the DOM `keyCode` numbering used by the
//! bindings, mouse buttons to their button index.

use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controls::Controls;
use super::keys::{codes, InputDevice, KeyId};

/// Map a physical key to its numeric key code.
pub fn key_code(key: KeyCode) -> Option<u32> {
    let code = match key {
        KeyCode::Backspace => codes::BACKSPACE,
        KeyCode::Tab => codes::TAB,
        KeyCode::Enter | KeyCode::NumpadEnter => codes::ENTER,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => codes::SHIFT,
        KeyCode::ControlLeft | KeyCode::ControlRight => codes::CONTROL,
        KeyCode::AltLeft | KeyCode::AltRight => codes::ALT,
        KeyCode::Escape => codes::ESCAPE,
        KeyCode::Space => codes::SPACE,
        KeyCode::ArrowLeft => codes::ARROW_LEFT,
        KeyCode::ArrowUp => codes::ARROW_UP,
        KeyCode::ArrowRight => codes::ARROW_RIGHT,
        KeyCode::ArrowDown => codes::ARROW_DOWN,

        KeyCode::Digit0 => codes::DIGIT_0,
        KeyCode::Digit1 => codes::DIGIT_0 + 1,
        KeyCode::Digit2 => codes::DIGIT_0 + 2,
        KeyCode::Digit3 => codes::DIGIT_0 + 3,
        KeyCode::Digit4 => codes::DIGIT_0 + 4,
        KeyCode::Digit5 => codes::DIGIT_0 + 5,
        KeyCode::Digit6 => codes::DIGIT_0 + 6,
        KeyCode::Digit7 => codes::DIGIT_0 + 7,
        KeyCode::Digit8 => codes::DIGIT_0 + 8,
        KeyCode::Digit9 => codes::DIGIT_0 + 9,

        KeyCode::KeyA => codes::A,
        KeyCode::KeyB => codes::A + 1,
        KeyCode::KeyC => codes::C,
        KeyCode::KeyD => codes::D,
        KeyCode::KeyE => codes::E,
        KeyCode::KeyF => codes::F,
        KeyCode::KeyG => codes::A + 6,
        KeyCode::KeyH => codes::A + 7,
        KeyCode::KeyI => codes::A + 8,
        KeyCode::KeyJ => codes::A + 9,
        KeyCode::KeyK => codes::A + 10,
        KeyCode::KeyL => codes::A + 11,
        KeyCode::KeyM => codes::A + 12,
        KeyCode::KeyN => codes::A + 13,
        KeyCode::KeyO => codes::A + 14,
        KeyCode::KeyP => codes::A + 15,
        KeyCode::KeyQ => codes::Q,
        KeyCode::KeyR => codes::R,
        KeyCode::KeyS => codes::S,
        KeyCode::KeyT => codes::A + 19,
        KeyCode::KeyU => codes::A + 20,
        KeyCode::KeyV => codes::V,
        KeyCode::KeyW => codes::W,
        KeyCode::KeyX => codes::A + 23,
        KeyCode::KeyY => codes::A + 24,
        KeyCode::KeyZ => codes::A + 25,

        KeyCode::F1 => codes::F1,
        KeyCode::F2 => codes::F1 + 1,
        KeyCode::F3 => codes::F1 + 2,
        KeyCode::F4 => codes::F1 + 3,
        KeyCode::F5 => codes::F1 + 4,
        KeyCode::F6 => codes::F1 + 5,
        KeyCode::F7 => codes::F1 + 6,
        KeyCode::F8 => codes::F1 + 7,
        KeyCode::F9 => codes::F1 + 8,
        KeyCode::F10 => codes::F1 + 9,
        KeyCode::F11 => codes::F1 + 10,
        KeyCode::F12 => codes::F1 + 11,
        _ => return None,
    };
    Some(code)
}

/// Map a mouse button to its button index.
///
/// Buttons numbered from 8 up would read as key codes and are not mapped.
pub fn mouse_button_index(button: MouseButton) -> Option<u32> {
    let index = match button {
        MouseButton::Left => codes::MOUSE_LEFT,
        MouseButton::Middle => codes::MOUSE_MIDDLE,
        MouseButton::Right => codes::MOUSE_RIGHT,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(index) => u32::from(index),
    };
    (index < codes::BACKSPACE).then_some(index)
}

fn pressed_value(state: ElementState) -> f32 {
    match state {
        ElementState::Pressed => 1.0,
        ElementState::Released => 0.0,
    }
}

/// Forward a window event to the controls. Returns true if it was consumed.
///
/// Key repeats are ignored; the held value is already set.
pub fn handle_window_event(controls: &mut Controls, event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if event.repeat {
                return false;
            }
            let PhysicalKey::Code(key) = event.physical_key else {
                return false;
            };
            let Some(code) = key_code(key) else {
                return false;
            };
            controls.set_actions(
                &KeyId::Code(code),
                pressed_value(event.state),
                InputDevice::Keyboard,
                None,
            );
            true
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let Some(index) = mouse_button_index(*button) else {
                return false;
            };
            controls.set_actions(
                &KeyId::Code(index),
                pressed_value(*state),
                InputDevice::Mouse,
                None,
            );
            true
        }
        _ => false,
    }
}

/// Forward raw mouse motion to the controls.
pub fn handle_device_event(controls: &mut Controls, event: &DeviceEvent) -> bool {
    if let DeviceEvent::MouseMotion { delta } = event {
        controls.mouse_move(delta.0 as f32, delta.1 as f32);
        return true;
    }
    false
}
