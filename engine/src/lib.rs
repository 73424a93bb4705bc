//! Stride Engine Library
//!
//! Input-to-locomotion core for a third-person game: configurable input
//! bindings, a multi-entity controls dispatcher with split-screen gamepads,
//! camera-relative movement, and a physics-driven character state machine
//! that drives animation cross-fades.
//!
//! # Modules
//!
//! - [`input`] - Bindings, controls dispatch, per-entity input frames, winit glue
//! - [`character`] - Locomotion state machine over a kinematic capsule
//! - [`physics`] - Physics world seam and a fixed-step kinematic implementation
//! - [`animation`] - Animator seam and a cross-fading clip mixer
//! - [`camera`] - Orbit camera providing the input reference frame
//! - [`entity`] - Archetypes and entity capability sets
//! - [`settings`] - Persisted user settings with change notification
//! - [`world`] - Application object owning every service and running the tick
//!
//! # Example
//!
//! ```ignore
//! use stride_engine::{EngineConfig, World};
//! use stride_engine::input::NoGamepads;
//!
//! let mut world = World::with_system_clock(EngineConfig::default());
//! world.physics_mut().add_ground(0.0, 50.0);
//! let hero = world.spawn_character(glam::Vec3::new(0.0, 0.9, 0.0), None);
//!
//! loop {
//!     world.tick(&NoGamepads);
//!     println!("{:?}", world.entity(hero).and_then(|e| e.state()));
//! }
//! ```

pub mod animation;
pub mod camera;
pub mod character;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod input;
pub mod physics;
pub mod settings;
pub mod world;

pub use animation::{AnimationMixer, Animator};
pub use camera::{CameraView, OrbitCamera};
pub use character::{CharacterController, CharacterState, StateTransition};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use entity::{Archetype, Entity, EntityKind};
pub use error::{BindingError, ConfigError, SettingsError};
pub use input::{Controls, InputFrame};
pub use physics::{KinematicWorld, PhysicsWorld};
pub use settings::{SettingKey, SettingValue, Settings};
pub use world::{World, WorldEvent};
