//! Surface snapping: per-tick placement of the carried object against the
//! surface under the view center.

pub mod faces;

use std::f32::consts::TAU;

use glam::{Mat3, Quat, Vec3};
use shared::{CarryStateData, EntityId, SnapFace, Transform};

use crate::geometry::BoundingBox;
use crate::ports::{Action, CarryWorld, InputAxis, InputSource};
use crate::settings::ControllerSettings;
use crate::visuals::VisualAids;

pub use faces::{FaceSpec, SnapFaceTable};

// ── Placement math ──────────────────────────────────────────

/// Face to use for a surface: the pinned one, or a default chosen by how
/// closely the normal aligns with world up.
pub fn effective_face(pinned: Option<SnapFace>, normal: Vec3, vertical_threshold: f32) -> SnapFace {
    if let Some(face) = pinned {
        return face;
    }
    let up_dot = normal.dot(Vec3::Y);
    if up_dot > vertical_threshold {
        SnapFace::FLOOR_DEFAULT
    } else if up_dot < -vertical_threshold {
        SnapFace::CEILING_DEFAULT
    } else {
        SnapFace::WALL_DEFAULT
    }
}

/// Rotation whose local +Z points along `normal`, using world up as the
/// reference up. Normals parallel to up use world +X as the local X axis.
pub fn look_rotation(normal: Vec3) -> Quat {
    let z = normal.normalize();
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() < 1e-6 {
        x = Vec3::X;
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Final object rotation for a face resting against a surface with `normal`,
/// spun by `rotation_offset` about the face axis.
pub fn snap_rotation(normal: Vec3, spec: &FaceSpec, rotation_offset: f32) -> Quat {
    let spin = Quat::from_axis_angle(spec.rotation_axis, rotation_offset);
    (look_rotation(normal) * spec.base_rotation * spin).normalize()
}

/// Distance from the surface to the object's bounding-box center.
///
/// A negative nudge sinks the object into the surface by exactly that much.
/// A non-negative nudge floats the object out by at least `epsilon`. The
/// branches do not meet at zero.
pub fn standoff_distance(half_extent: f32, nudge_offset: f32, epsilon: f32) -> f32 {
    if nudge_offset < 0.0 {
        half_extent + nudge_offset
    } else {
        half_extent + nudge_offset.max(epsilon)
    }
}

/// World position putting the bounding-box center `distance` along `normal`
/// from `hit_point`.
pub fn snap_position(
    hit_point: Vec3,
    normal: Vec3,
    center: Vec3,
    scale: Vec3,
    rotation: Quat,
    distance: f32,
) -> Vec3 {
    hit_point - rotation * (center * scale) + normal * distance
}

/// Normal alignment with up jumped between ticks.
pub fn is_snap_discontinuity(previous_up_dot: f32, up_dot: f32, threshold: f32) -> bool {
    (up_dot - previous_up_dot).abs() > threshold
}

/// Next pinned face. Automatic mode moves to the first face.
pub fn cycle_face(face: Option<SnapFace>) -> SnapFace {
    face.map_or(SnapFace::ALL[0], |f| f.next())
}

// ── Solver ──────────────────────────────────────────────────

/// Result of one solver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapStep {
    /// No usable surface this tick; the previous transform stands
    NoHit,
    /// Object placed; `dirty` is set when HUD-visible fields changed
    Placed { dirty: bool },
    /// User asked to go back to plain carrying
    RevertToCarry,
}

/// Per-tick snapping algorithm plus the transient state it carries between ticks.
#[derive(Debug, Default)]
pub struct SnapSolver {
    table: SnapFaceTable,
    /// Surface the grid is currently aligned to
    last_surface: Option<EntityId>,
    /// Normal-vs-up dot product from the previous placed tick
    previous_up_dot: Option<f32>,
}

impl SnapSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &SnapFaceTable {
        &self.table
    }

    pub fn last_surface(&self) -> Option<EntityId> {
        self.last_surface
    }

    /// Forget the cached surface and normal history.
    pub fn reset(&mut self) {
        self.last_surface = None;
        self.previous_up_dot = None;
    }

    pub fn solve<W: CarryWorld>(
        &mut self,
        data: &mut CarryStateData,
        visuals: &mut VisualAids,
        world: &mut W,
        input: &impl InputSource,
        settings: &ControllerSettings,
        dt: f32,
    ) -> SnapStep {
        let Some(entity) = data.active_object else {
            return SnapStep::NoHit;
        };

        if input.pressed(Action::ToggleSnap) {
            return SnapStep::RevertToCarry;
        }

        let Some(hit) = world.cast_view_ray(Some(entity)) else {
            return SnapStep::NoHit;
        };

        let surface_transform = world.world_transform(hit.surface);
        if self.last_surface != Some(hit.surface) {
            tracing::debug!("Snap surface changed to {}", hit.surface.short());
            self.last_surface = Some(hit.surface);
            visuals.anchor_grid(hit.surface, surface_transform);
        }

        let normal = surface_transform
            .unwrap_or_default()
            .normal_to_world(hit.local_normal);
        // Zero, overflowing, or NaN normals come from degenerate surface scales
        let Some(normal) = normal.try_normalize() else {
            tracing::debug!("Degenerate surface normal on {}, skipping tick", hit.surface.short());
            return SnapStep::NoHit;
        };

        let snap = &settings.snap;
        let mut dirty = false;

        let up_dot = normal.dot(Vec3::Y);
        if let Some(previous) = self.previous_up_dot {
            if is_snap_discontinuity(previous, up_dot, snap.discontinuity_threshold) {
                tracing::debug!("Snap discontinuity ({previous:.2} -> {up_dot:.2}), resetting offsets");
                data.rotation_offset = 0.0;
                data.nudge_offset = snap.nudge_epsilon;
                dirty = true;
            }
        }
        self.previous_up_dot = Some(up_dot);

        // Continuous adjustments
        let rotate = input.axis(InputAxis::RotateCcw) - input.axis(InputAxis::RotateCw);
        if rotate != 0.0 {
            data.rotation_offset += rotate * snap.rotation_speed * TAU * dt;
            dirty = true;
        }

        let nudge = input.axis(InputAxis::Nudge);
        if nudge != 0.0 {
            data.nudge_offset += nudge * snap.nudge_speed * dt;
            dirty = true;
        }

        let current = world.world_transform(entity).unwrap_or_default();
        let mut scale = current.scale;
        let grow = input.axis(InputAxis::Scale);
        if grow != 0.0 {
            scale = (scale * (1.0 + grow * snap.scale_speed * dt)).max(Vec3::splat(snap.min_scale));
        }

        if input.pressed(Action::ChangeSnapFace) {
            let face = cycle_face(data.snap_face);
            tracing::debug!("Snap face pinned to {}", face.display_name());
            data.snap_face = Some(face);
            dirty = true;
        }

        // Orientation and standoff
        let face = effective_face(data.snap_face, normal, snap.vertical_threshold);
        let spec = self.table.get(face);
        let rotation = snap_rotation(normal, spec, data.rotation_offset);

        let bounds = BoundingBox {
            center: data.center,
            size: data.size,
        };
        let half_extent = bounds.scaled_half_extent(spec.measure_axis, scale);
        let distance = standoff_distance(half_extent, data.nudge_offset, snap.nudge_epsilon);
        let position = snap_position(hit.point, normal, bounds.center, scale, rotation, distance);

        world.set_world_transform(
            entity,
            Transform {
                position,
                rotation,
                scale,
            },
        );

        visuals.update_indicator(world, hit.point, normal, data.nudge_offset);
        visuals.set_grid_reference(hit.point, bounds.max_scaled_extent(scale));

        SnapStep::Placed { dirty }
    }
}
