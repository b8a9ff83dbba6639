//! Factory functions for common test scenes.
//!
//! Surfaces are thin slabs whose local +Y face is the usable side.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use shared::{EntityId, Transform};

use crate::harness::TestHarness;

/// Slab thickness for floors, walls, and ceilings.
pub const SLAB_THICKNESS: f32 = 0.1;

// ── Surface factories ───────────────────────────────────────────

/// Floor whose top face is at `y = height`.
pub fn floor(h: &mut TestHarness, height: f32) -> EntityId {
    h.spawn_surface(
        "floor",
        Vec3::new(20.0, SLAB_THICKNESS, 20.0),
        Transform::from_position(Vec3::new(0.0, height - SLAB_THICKNESS * 0.5, 0.0)),
    )
}

/// Ceiling whose bottom face is at `y = height`.
pub fn ceiling(h: &mut TestHarness, height: f32) -> EntityId {
    h.spawn_surface(
        "ceiling",
        Vec3::new(20.0, SLAB_THICKNESS, 20.0),
        Transform {
            position: Vec3::new(0.0, height + SLAB_THICKNESS * 0.5, 0.0),
            rotation: Quat::from_rotation_x(PI),
            scale: Vec3::ONE,
        },
    )
}

/// Wall facing +X whose surface is at `x = offset`.
pub fn wall_facing_x(h: &mut TestHarness, offset: f32) -> EntityId {
    h.spawn_surface(
        "wall",
        Vec3::new(20.0, SLAB_THICKNESS, 20.0),
        Transform {
            position: Vec3::new(offset - SLAB_THICKNESS * 0.5, 0.0, 0.0),
            rotation: Quat::from_rotation_z(-FRAC_PI_2),
            scale: Vec3::ONE,
        },
    )
}

// ── Object factories ────────────────────────────────────────────

/// Unit cube resting above the origin.
pub fn unit_cube(h: &mut TestHarness) -> EntityId {
    h.spawn_object("cube", Vec3::ONE, Vec3::new(0.0, 0.5, 0.0))
}

// ── Scene factories ─────────────────────────────────────────────

/// Floor at y = 0 and a unit cube, camera above looking straight down at the
/// origin. Returns (floor, cube).
pub fn scene_floor_and_cube(h: &mut TestHarness) -> (EntityId, EntityId) {
    let floor = floor(h, 0.0);
    let cube = h.spawn_object("cube", Vec3::ONE, Vec3::new(3.0, 0.5, 3.0));
    h.aim(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y);
    (floor, cube)
}

/// Floor plus a wall at x = -2, unit cube, camera looking at the wall.
/// Returns (floor, wall, cube).
pub fn scene_wall_and_cube(h: &mut TestHarness) -> (EntityId, EntityId, EntityId) {
    let floor = floor(h, 0.0);
    let wall = wall_facing_x(h, -2.0);
    let cube = h.spawn_object("cube", Vec3::ONE, Vec3::new(3.0, 0.5, 3.0));
    h.aim(Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_X);
    (floor, wall, cube)
}
