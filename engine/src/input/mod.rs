//! Input Module
//!
//! Device-agnostic input handling: physical keys resolve through per-archetype
//! [`Bindings`] into named actions, the [`Controls`] dispatcher routes them to
//! registered entities, and each entity folds its actions into one
//! camera-relative [`InputFrame`] per tick.
//!
//! # Example
//!
//! ```rust,ignore
//! use stride_engine::entity::Archetype;
//! use stride_engine::input::{Controls, InputDevice, KeyId, codes};
//!
//! let mut controls = Controls::default();
//! controls.register_bindings(Archetype::Character, None);
//! controls.register_entity(uuid, "character", None);
//!
//! controls.set_actions(&KeyId::Code(codes::W), 1.0, InputDevice::Keyboard, None);
//! let frame = controls.take_frame(uuid, &camera);
//! assert!(frame.has_movement());
//! ```

pub mod action;
pub mod bindings;
pub mod controls;
pub mod entity_input;
pub mod gamepad;
pub mod keys;
pub mod winit_events;

pub use action::{Action, names};
pub use bindings::{ActionObject, BindingOverrides, Bindings, BindingsObject, KeySpec};
pub use controls::Controls;
pub use entity_input::{EntityInput, InputFrame, camera_relative, yaw_only};
pub use gamepad::{GamepadSource, GamepadState, NoGamepads, apply_deadzone};
pub use keys::{InputDevice, InputType, KeyId, codes};
pub use winit_events::{handle_device_event, handle_window_event};
