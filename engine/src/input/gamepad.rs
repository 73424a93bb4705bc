//! Gamepad Polling Support
//!
//! Gamepads are polled once per tick rather than delivering events. The
//! platform layer exposes the connected pads through [`GamepadSource`]; the
//! dispatcher deadzones axes and uses [`AxisHistory`] to avoid re-emitting
//! a sustained zero every frame.

use std::collections::HashMap;

use super::keys::KeyId;

/// Snapshot of one connected gamepad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    /// Gamepad index; doubles as the player number it drives.
    pub index: u8,
    /// Axis values in `[-1, 1]`.
    pub axes: Vec<f32>,
    /// Button values in `[0, 1]` (analog triggers report partial values).
    pub buttons: Vec<f32>,
}

impl GamepadState {
    pub fn new(index: u8) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn with_axes(mut self, axes: &[f32]) -> Self {
        self.axes = axes.to_vec();
        self
    }

    pub fn with_buttons(mut self, buttons: &[f32]) -> Self {
        self.buttons = buttons.to_vec();
        self
    }
}

/// Anything that can report the currently connected gamepads.
pub trait GamepadSource {
    fn gamepads(&self) -> &[GamepadState];
}

impl GamepadSource for [GamepadState] {
    fn gamepads(&self) -> &[GamepadState] {
        self
    }
}

impl GamepadSource for Vec<GamepadState> {
    fn gamepads(&self) -> &[GamepadState] {
        self
    }
}

/// Source with no pads connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGamepads;

impl GamepadSource for NoGamepads {
    fn gamepads(&self) -> &[GamepadState] {
        &[]
    }
}

/// Clamp values whose magnitude is below `deadzone` to exactly zero.
///
/// Values at or above the deadzone pass through unmodified (no rescaling).
#[inline]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone { 0.0 } else { value }
}

/// Last emitted value per `(gamepad, key)`, used to drop sustained zeros.
#[derive(Debug, Clone, Default)]
pub struct AxisHistory {
    previous: HashMap<(u8, KeyId), f32>,
}

impl AxisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` and report whether it should be dispatched.
    ///
    /// A value is suppressed only when it is zero and the previous value for
    /// the same pad and key was zero as well. A key seen for the first time is
    /// always dispatched.
    pub fn should_emit(&mut self, pad: u8, key: &KeyId, value: f32) -> bool {
        let previous = self.previous.insert((pad, key.clone()), value);
        !(value == 0.0 && previous == Some(0.0))
    }

    /// Forget a disconnected pad.
    pub fn forget_pad(&mut self, pad: u8) {
        self.previous.retain(|(index, _), _| *index != pad);
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_clamps_small_values() {
        assert_eq!(apply_deadzone(0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(-0.149, 0.15), 0.0);
    }

    #[test]
    fn test_deadzone_passes_large_values_unmodified() {
        assert_eq!(apply_deadzone(0.15, 0.15), 0.15);
        assert_eq!(apply_deadzone(-0.8, 0.15), -0.8);
        assert_eq!(apply_deadzone(1.0, 0.15), 1.0);
    }

    #[test]
    fn test_history_emits_transition_into_zero_once() {
        let mut history = AxisHistory::new();
        let key = KeyId::axis(0);

        assert!(history.should_emit(0, &key, 0.7));
        assert!(history.should_emit(0, &key, 0.0));
        assert!(!history.should_emit(0, &key, 0.0));
        assert!(!history.should_emit(0, &key, 0.0));
        assert!(history.should_emit(0, &key, -0.4));
    }

    #[test]
    fn test_history_first_zero_is_emitted() {
        let mut history = AxisHistory::new();
        assert!(history.should_emit(0, &KeyId::axis(1), 0.0));
        assert!(!history.should_emit(0, &KeyId::axis(1), 0.0));
    }

    #[test]
    fn test_history_is_per_pad() {
        let mut history = AxisHistory::new();
        let key = KeyId::axis(0);

        history.should_emit(0, &key, 0.0);
        assert!(history.should_emit(1, &key, 0.0));

        history.forget_pad(0);
        assert!(history.should_emit(0, &key, 0.0));
    }
}
