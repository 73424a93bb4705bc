//! Character Module
//!
//! Physics-driven characters: a locomotion state machine that fuses ground
//! probing, velocity interpolation and animation blending.
//!
//! # Components
//!
//! - [`CharacterController`] - Per-tick state machine over a physics body
//! - [`CharacterState`] - Idle, walking, sprinting, jumping, falling, landing

pub mod controller;
pub mod state;

pub use controller::CharacterController;
pub use state::{CharacterState, StateTransition};
