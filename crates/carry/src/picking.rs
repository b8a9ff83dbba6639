//! Ray casting against boxes, used by the headless scene raycaster

use glam::Vec3;
use shared::Transform;

use crate::geometry::Aabb;

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest intersection of a ray with a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHit {
    /// Ray parameter at the hit
    pub t: f32,
    /// Outward normal of the box face that was hit, in the box's space
    pub normal: Vec3,
}

/// Ray-AABB intersection using the slab method.
/// Returns the ray parameter of the entry point and the normal of the entered face.
/// Rays starting inside the box report no hit.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<BoxHit> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if d.abs() < 1e-12 {
            // Parallel to this slab
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t1, mut t2) = ((lo - o) * inv, (hi - o) * inv);
        let mut sign = -1.0;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            sign = 1.0;
        }

        if t1 > tmin {
            tmin = t1;
            normal = Vec3::ZERO;
            normal[axis] = sign;
        }
        tmax = tmax.min(t2);

        if tmin > tmax {
            return None;
        }
    }

    if tmin < 0.0 || tmax < 0.0 {
        return None;
    }

    Some(BoxHit { t: tmin, normal })
}

/// Intersect a world ray with a local AABB placed by `transform`.
/// The returned `t` is in world units along the world ray; the normal stays local.
pub fn ray_oriented_box(ray: &Ray, transform: &Transform, local: &Aabb) -> Option<BoxHit> {
    let local_ray = Ray {
        origin: transform.point_to_local(ray.origin),
        direction: transform.direction_to_local(ray.direction),
    };
    let hit = ray_aabb(&local_ray, local)?;
    let world_point = transform.point_to_world(local_ray.at(hit.t));
    let t = (world_point - ray.origin).dot(ray.direction) / ray.direction.length_squared();
    Some(BoxHit { t, normal: hit.normal })
}
