//! Physics module
//!
//! Custom, dependency-free physics for character control.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//!
//! # Submodules
//!
//! - [`collision`] - Axis-aligned boxes and slab-method ray casts
//! - [`world`] - The [`PhysicsWorld`] contract and the [`KinematicWorld`] implementation

pub mod collision;
pub mod world;

pub use collision::{Aabb, RayHit, aabb_surface_normal, ray_aabb_intersect};
pub use world::{BodyId, KinematicWorld, PhysicsWorld, RigidBody};
