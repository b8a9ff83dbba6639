//! Snap orientation table
//!
//! Maps each canonical face to the rotation that turns that face towards the
//! surface, the local axis the user rotates about, and the bounding-box axis
//! the standoff distance is measured along.
//!
//! Convention: after the surface look-at, local +Z points out of the surface.
//! A face's base rotation therefore maps the face's outward normal onto -Z.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use shared::SnapFace;

use crate::geometry::MeasureAxis;

/// Orientation data for one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSpec {
    /// Rotation turning the face's outward normal onto local -Z
    pub base_rotation: Quat,
    /// Axis (before base rotation) the rotation offset spins about
    pub rotation_axis: Vec3,
    /// Bounding-box axis the standoff is measured along
    pub measure_axis: MeasureAxis,
}

/// Outward normal of a face in object space.
pub fn face_normal(face: SnapFace) -> Vec3 {
    match face {
        SnapFace::Left => Vec3::NEG_X,
        SnapFace::Right => Vec3::X,
        SnapFace::Top => Vec3::Y,
        SnapFace::Bottom => Vec3::NEG_Y,
        SnapFace::Front => Vec3::Z,
        SnapFace::Back => Vec3::NEG_Z,
    }
}

fn build_spec(face: SnapFace) -> FaceSpec {
    let (base_rotation, rotation_axis, measure_axis) = match face {
        SnapFace::Left => (Quat::from_rotation_y(-FRAC_PI_2), Vec3::X, MeasureAxis::X),
        SnapFace::Front => (Quat::from_rotation_y(PI), Vec3::Z, MeasureAxis::Z),
        SnapFace::Right => (Quat::from_rotation_y(FRAC_PI_2), Vec3::X, MeasureAxis::X),
        SnapFace::Top => (Quat::from_rotation_x(-FRAC_PI_2), Vec3::Y, MeasureAxis::Y),
        SnapFace::Bottom => (Quat::from_rotation_x(FRAC_PI_2), Vec3::Y, MeasureAxis::Y),
        SnapFace::Back => (Quat::IDENTITY, Vec3::Z, MeasureAxis::Z),
    };
    FaceSpec {
        base_rotation,
        rotation_axis,
        measure_axis,
    }
}

/// Fixed-size table indexed by `SnapFace::index`.
#[derive(Debug, Clone)]
pub struct SnapFaceTable {
    specs: [FaceSpec; 6],
}

impl Default for SnapFaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapFaceTable {
    /// Build the table, checking that every entry turns its face onto -Z and
    /// that the rotation axis is the face's own axis.
    pub fn new() -> Self {
        let specs = SnapFace::ALL.map(build_spec);
        for face in SnapFace::ALL {
            let spec = &specs[face.index()];
            let n = face_normal(face);
            debug_assert!((spec.base_rotation * n).abs_diff_eq(Vec3::NEG_Z, 1e-5));
            debug_assert!(spec.rotation_axis.abs_diff_eq(n.abs(), 1e-6));
            debug_assert!(spec.measure_axis.component(n).abs() > 0.5);
        }
        Self { specs }
    }

    pub fn get(&self, face: SnapFace) -> &FaceSpec {
        &self.specs[face.index()]
    }
}
