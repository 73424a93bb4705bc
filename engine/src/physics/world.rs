//! Physics World
//!
//! [`PhysicsWorld`] is the narrow contract the character controller drives:
//! read and write a body's state, cast rays, and advance time.
//!
//! [`KinematicWorld`] is a small implementation of it: capsule bodies under
//! gravity, static box geometry, and a fixed-step accumulator.
//!
//! # Stepping
//!
//! `step(elapsed)` clamps the frame delta to `max_frame_delta`, then runs
//! whole `fixed_step` sub-steps out of an accumulator. At most
//! `max_substeps` run per call; any backlog beyond that is dropped so a
//! long stall cannot spiral. The remainder drives interpolation of the
//! transforms returned by `position`/`rotation`.

use glam::{Quat, Vec3};

use super::collision::{Aabb, RayHit};
use crate::config::PhysicsConfig;

/// Handle to a body in a physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// A dynamic capsule body.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub quaternion: Quat,
    /// Capsule radius
    pub radius: f32,
    /// Half height of the capsule's cylinder section
    pub half_height: f32,
    /// 0 disables gravity for this body
    pub gravity_scale: f32,
    previous_position: Vec3,
    previous_quaternion: Quat,
}

impl RigidBody {
    /// Capsule body at `position`.
    pub fn capsule(position: Vec3, radius: f32, half_height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            quaternion: Quat::IDENTITY,
            radius,
            half_height,
            gravity_scale: 1.0,
            previous_position: position,
            previous_quaternion: Quat::IDENTITY,
        }
    }

    /// Distance from the body origin to the bottom of the capsule.
    pub fn rest_height(&self) -> f32 {
        self.half_height + self.radius
    }

    /// Bounding box of the capsule.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(
            self.position,
            Vec3::new(self.radius, self.rest_height(), self.radius),
        )
    }

    /// Horizontal speed (ignoring Y).
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Move the body without interpolating from its old position.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.previous_position = position;
    }
}

/// Physics services used by the character controller.
pub trait PhysicsWorld {
    /// Interpolated body position.
    fn position(&self, body: BodyId) -> Option<Vec3>;
    /// Interpolated body rotation.
    fn rotation(&self, body: BodyId) -> Option<Quat>;
    fn body(&self, body: BodyId) -> Option<&RigidBody>;
    fn body_mut(&mut self, body: BodyId) -> Option<&mut RigidBody>;
    /// Nearest hit along `direction` (normalized) within `max_distance`,
    /// ignoring `exclude`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyId>,
    ) -> Option<RayHit>;
    /// Advance the simulation by `elapsed` seconds.
    fn step(&mut self, elapsed: f32);
}

/// Gravity-and-boxes physics world with fixed-step sub-stepping.
#[derive(Debug, Clone)]
pub struct KinematicWorld {
    config: PhysicsConfig,
    bodies: Vec<(BodyId, RigidBody)>,
    statics: Vec<Aabb>,
    next_id: u32,
    accumulator: f32,
    alpha: f32,
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl KinematicWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            statics: Vec::new(),
            next_id: 0,
            accumulator: 0.0,
            alpha: 0.0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push((id, body));
        id
    }

    pub fn remove_body(&mut self, id: BodyId) -> Option<RigidBody> {
        let index = self.bodies.iter().position(|(body_id, _)| *body_id == id)?;
        Some(self.bodies.remove(index).1)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Add immovable box geometry.
    pub fn add_static(&mut self, aabb: Aabb) {
        self.statics.push(aabb);
    }

    /// Add a flat ground slab whose top face sits at `height`.
    pub fn add_ground(&mut self, height: f32, half_extent: f32) {
        self.add_static(Aabb::new(
            Vec3::new(-half_extent, height - 1.0, -half_extent),
            Vec3::new(half_extent, height, half_extent),
        ));
    }

    /// Interpolation factor between the last two sub-steps.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Run one fixed sub-step.
    pub fn substep(&mut self, dt: f32) {
        let gravity = self.config.gravity;

        for (_, body) in &mut self.bodies {
            body.previous_position = body.position;
            body.previous_quaternion = body.quaternion;

            body.velocity += gravity * body.gravity_scale * dt;
            body.position += body.velocity * dt;

            resolve_floor(body, &self.statics);
        }
    }

    fn find(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies
            .iter()
            .find(|(body_id, _)| *body_id == id)
            .map(|(_, body)| body)
    }
}

/// Stop a body that crossed the top face of a static box this sub-step.
fn resolve_floor(body: &mut RigidBody, statics: &[Aabb]) {
    let rest = body.rest_height();
    let previous_foot = body.previous_position.y - rest;
    let foot = body.position.y - rest;

    for aabb in statics {
        let top = aabb.max.y;
        let crossed = previous_foot >= top - 1e-4 && foot < top;
        if crossed && aabb.contains_xz(body.position) {
            body.position.y = top + rest;
            body.velocity.y = body.velocity.y.max(0.0);
        }
    }
}

impl PhysicsWorld for KinematicWorld {
    fn position(&self, body: BodyId) -> Option<Vec3> {
        self.find(body)
            .map(|b| b.previous_position.lerp(b.position, self.alpha))
    }

    fn rotation(&self, body: BodyId) -> Option<Quat> {
        self.find(body)
            .map(|b| b.previous_quaternion.slerp(b.quaternion, self.alpha))
    }

    fn body(&self, body: BodyId) -> Option<&RigidBody> {
        self.find(body)
    }

    fn body_mut(&mut self, body: BodyId) -> Option<&mut RigidBody> {
        self.bodies
            .iter_mut()
            .find(|(body_id, _)| *body_id == body)
            .map(|(_, body)| body)
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyId>,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let statics = self
            .statics
            .iter()
            .filter_map(|aabb| aabb.raycast(origin, direction, max_distance));
        let bodies = self
            .bodies
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .filter_map(|(_, body)| body.bounds().raycast(origin, direction, max_distance));

        statics
            .chain(bodies)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn step(&mut self, elapsed: f32) {
        let fixed_step = self.config.fixed_step;
        if fixed_step <= 0.0 {
            return;
        }

        self.accumulator += elapsed.clamp(0.0, self.config.max_frame_delta);

        let mut steps = 0;
        while self.accumulator >= fixed_step && steps < self.config.max_substeps {
            self.substep(fixed_step);
            self.accumulator -= fixed_step;
            steps += 1;
        }

        if self.accumulator >= fixed_step {
            self.accumulator = 0.0;
        }
        self.alpha = self.accumulator / fixed_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / 60.0;

    fn world() -> KinematicWorld {
        let mut world = KinematicWorld::default();
        world.add_ground(0.0, 50.0);
        world
    }

    #[test]
    fn test_gravity_accelerates_body() {
        let mut world = KinematicWorld::default();
        let id = world.add_body(RigidBody::capsule(Vec3::new(0.0, 10.0, 0.0), 0.35, 0.55));

        world.step(STEP);
        let body = world.body(id).unwrap();
        assert!((body.velocity.y + 9.81 * STEP).abs() < 1e-4);
        assert!(body.position.y < 10.0);
    }

    #[test]
    fn test_body_lands_on_ground() {
        let mut world = world();
        let id = world.add_body(RigidBody::capsule(Vec3::new(0.0, 3.0, 0.0), 0.35, 0.55));

        for _ in 0..120 {
            world.step(STEP);
        }

        let body = world.body(id).unwrap();
        assert!((body.position.y - 0.9).abs() < 1e-4);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_substeps_capped_and_delta_clamped() {
        let mut world = KinematicWorld::default();
        let id = world.add_body(RigidBody::capsule(Vec3::ZERO, 0.35, 0.55));
        world.body_mut(id).unwrap().velocity = Vec3::X;

        // 10 seconds clamps to 0.1s = 6 steps, capped at 5.
        world.step(10.0);
        let x = world.body(id).unwrap().position.x;
        assert!((x - 5.0 * STEP).abs() < 1e-4);
    }

    #[test]
    fn test_interpolated_position() {
        let mut world = KinematicWorld::default();
        let mut body = RigidBody::capsule(Vec3::ZERO, 0.35, 0.55);
        body.gravity_scale = 0.0;
        body.velocity = Vec3::X * 60.0;
        let id = world.add_body(body);

        world.step(STEP * 1.5);
        let raw = world.body(id).unwrap().position.x;
        let interpolated = world.position(id).unwrap().x;

        assert!((raw - 1.0).abs() < 1e-3);
        assert!((interpolated - 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_raycast_hits_ground_and_excludes_self() {
        let mut world = world();
        let id = world.add_body(RigidBody::capsule(Vec3::new(0.0, 0.9, 0.0), 0.35, 0.55));

        let hit = world
            .raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 5.0, Some(id))
            .unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::Y);

        // Without exclusion the capsule's top (y = 1.8) is hit first.
        let hit = world.raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 5.0, None).unwrap();
        assert!((hit.distance - 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_remove_body() {
        let mut world = world();
        let id = world.add_body(RigidBody::capsule(Vec3::ZERO, 0.35, 0.55));
        assert!(world.remove_body(id).is_some());
        assert!(world.body(id).is_none());
        assert_eq!(world.body_count(), 0);
    }
}
