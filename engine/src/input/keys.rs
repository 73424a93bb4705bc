//! Key Identifiers and Input Types
//!
//! Physical inputs are identified by a [`KeyId`]: either a numeric code
//! (keyboard key code or mouse button index) or a string tag for controller
//! axes and buttons (`axes0`, `+axes0`, `-axes0`, `buttons3`).
//!
//! Every binding is filed under an [`InputType`] such as `keyboard`,
//! `controller`, or a per-player variant such as `controller-2` that
//! correlates with a connected gamepad index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BindingError;

/// Keyboard key codes (DOM `keyCode` numbering), used by the default bindings
/// and the winit adapter.
pub mod codes {
    pub const BACKSPACE: u32 = 8;
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 13;
    pub const SHIFT: u32 = 16;
    pub const CONTROL: u32 = 17;
    pub const ALT: u32 = 18;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const DIGIT_0: u32 = 48;
    pub const A: u32 = 65;
    pub const C: u32 = 67;
    pub const D: u32 = 68;
    pub const E: u32 = 69;
    pub const F: u32 = 70;
    pub const Q: u32 = 81;
    pub const R: u32 = 82;
    pub const S: u32 = 83;
    pub const V: u32 = 86;
    pub const W: u32 = 87;
    pub const F1: u32 = 112;

    /// Mouse button indices.
    pub const MOUSE_LEFT: u32 = 0;
    pub const MOUSE_MIDDLE: u32 = 1;
    pub const MOUSE_RIGHT: u32 = 2;
}

/// Physical device family an input originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputDevice {
    Keyboard,
    Mouse,
    Controller,
}

impl InputDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputDevice::Keyboard => "keyboard",
            InputDevice::Mouse => "mouse",
            InputDevice::Controller => "controller",
        }
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag an action's key is filed under: a device plus an optional player number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputType {
    pub device: InputDevice,
    pub player: Option<u8>,
}

impl InputType {
    pub const KEYBOARD: InputType = InputType::shared(InputDevice::Keyboard);
    pub const MOUSE: InputType = InputType::shared(InputDevice::Mouse);
    pub const CONTROLLER: InputType = InputType::shared(InputDevice::Controller);

    /// Input type reachable by every player.
    pub const fn shared(device: InputDevice) -> Self {
        Self { device, player: None }
    }

    /// Input type bound to one player number (split input).
    pub const fn for_player(device: InputDevice, player: u8) -> Self {
        Self {
            device,
            player: Some(player),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.player {
            Some(player) => write!(f, "{}-{}", self.device, player),
            None => write!(f, "{}", self.device),
        }
    }
}

impl FromStr for InputType {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device, player) = match s.split_once('-') {
            Some((device, player)) => {
                let player = player
                    .parse::<u8>()
                    .map_err(|_| BindingError::UnknownInputType(s.to_string()))?;
                (device, Some(player))
            }
            None => (s, None),
        };

        let device = match device {
            "keyboard" => InputDevice::Keyboard,
            "mouse" => InputDevice::Mouse,
            "controller" => InputDevice::Controller,
            _ => return Err(BindingError::UnknownInputType(s.to_string())),
        };

        Ok(Self { device, player })
    }
}

/// Identifier of one physical key, button or controller axis direction.
///
/// Serializes as a bare number (`87`) or string (`"+axes1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyId {
    /// Keyboard key code or mouse button index.
    Code(u32),
    /// Controller tag (`axesN`, `+axesN`, `-axesN`, `buttonsN`).
    Tag(String),
}

const AXIS_PREFIX: &str = "axes";
const BUTTON_PREFIX: &str = "buttons";

impl KeyId {
    /// Undirected controller axis, e.g. `axes0`.
    pub fn axis(index: usize) -> Self {
        KeyId::Tag(format!("{AXIS_PREFIX}{index}"))
    }

    /// Signed controller axis direction, e.g. `+axes0` / `-axes0`.
    pub fn signed_axis(index: usize, positive: bool) -> Self {
        let sign = if positive { '+' } else { '-' };
        KeyId::Tag(format!("{sign}{AXIS_PREFIX}{index}"))
    }

    /// Controller button, e.g. `buttons0`.
    pub fn button(index: usize) -> Self {
        KeyId::Tag(format!("{BUTTON_PREFIX}{index}"))
    }

    /// Axis index if this is an undirected axis tag (`axesN`, no sign).
    pub fn undirected_axis(&self) -> Option<usize> {
        match self {
            KeyId::Tag(tag) => tag.strip_prefix(AXIS_PREFIX)?.parse().ok(),
            KeyId::Code(_) => None,
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Code(code) => write!(f, "{code}"),
            KeyId::Tag(tag) => f.write_str(tag),
        }
    }
}

impl From<u32> for KeyId {
    fn from(code: u32) -> Self {
        KeyId::Code(code)
    }
}

impl From<&str> for KeyId {
    fn from(tag: &str) -> Self {
        KeyId::Tag(tag.to_string())
    }
}
