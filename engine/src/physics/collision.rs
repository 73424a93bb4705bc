//! Collision detection module
//!
//! Ray queries against axis-aligned boxes. Static level geometry is a set of
//! [`Aabb`]s, and dynamic capsule bodies are approximated by their bounding
//! box for ray casts.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used: for each axis the ray's entry and exit times
//! through the pair of parallel planes are computed, and the ray hits the box
//! if the latest entry precedes the earliest exit.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Result of a successful ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// World-space position where the ray hit
    pub point: Vec3,
    /// Outward surface normal at the hit point
    pub normal: Vec3,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on `center` with the given half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Whether `point` lies within the box on the horizontal (XZ) plane.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Cast a ray against this box, returning the hit within `max_distance`.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let distance = ray_aabb_intersect(origin, direction, self.min, self.max)?;
        if distance > max_distance {
            return None;
        }
        let point = origin + direction * distance;
        Some(RayHit {
            distance,
            point,
            normal: aabb_surface_normal(point, self.min, self.max),
        })
    }
}

/// Ray-AABB intersection using the slab method.
///
/// `ray_dir` must be normalized. Returns the distance to the nearest
/// intersection at or in front of the origin; a ray starting inside the box
/// reports its exit distance.
pub fn ray_aabb_intersect(ray_origin: Vec3, ray_dir: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb_min[axis], aabb_max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be between the planes.
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

/// Outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!((t.unwrap() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let t = ray_aabb_intersect(Vec3::new(0.0, 5.0, -5.0), Vec3::Z, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_starts_inside_aabb() {
        let t = ray_aabb_intersect(Vec3::ZERO, Vec3::Z, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!((t.unwrap() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(t.is_none());
    }

    #[test]
    fn test_downward_ray_hits_top_face() {
        let ground = Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
        let hit = ground.raycast(Vec3::new(2.0, 3.0, 1.0), Vec3::NEG_Y, 10.0).unwrap();

        assert!((hit.distance - 3.0).abs() < 0.001);
        assert!(hit.point.y.abs() < 0.001);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let hit = unit_box().raycast(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 3.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_surface_normal_faces() {
        let b = unit_box();
        assert_eq!(aabb_surface_normal(Vec3::new(1.0, 0.0, 0.0), b.min, b.max), Vec3::X);
        assert_eq!(aabb_surface_normal(Vec3::new(0.0, -1.0, 0.0), b.min, b.max), Vec3::NEG_Y);
        assert_eq!(aabb_surface_normal(Vec3::new(0.0, 0.2, 1.0), b.min, b.max), Vec3::Z);
    }

    #[test]
    fn test_new_orders_corners() {
        let b = Aabb::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 2.0));
    }
}
