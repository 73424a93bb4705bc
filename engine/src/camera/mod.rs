//! Camera Module
//!
//! The input pipeline only needs the active camera's orientation, so the
//! camera is exposed through the narrow [`CameraView`] contract. The crate
//! ships a third-person [`OrbitCamera`].

pub mod orbit;

pub use orbit::OrbitCamera;

use glam::Quat;

/// Anything that can report a world-space orientation for camera-relative
/// movement.
pub trait CameraView {
    fn world_quaternion(&self) -> Quat;
}

impl CameraView for Quat {
    fn world_quaternion(&self) -> Quat {
        *self
    }
}
