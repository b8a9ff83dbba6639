//! Local-space bounding boxes used for pivot and standoff calculations

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Compute AABB enclosing a set of points. Returns None for an empty set.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;

        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }

        Some(Self { min, max })
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Which local axis a face measures its offset along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureAxis {
    X,
    Y,
    Z,
}

impl MeasureAxis {
    /// Component of `v` along this axis.
    pub fn component(&self, v: Vec3) -> f32 {
        match self {
            MeasureAxis::X => v.x,
            MeasureAxis::Y => v.y,
            MeasureAxis::Z => v.z,
        }
    }
}

/// Cached center/size of an object's local bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoundingBox {
    /// Bounds used when an object reports no geometry.
    pub const UNIT: BoundingBox = BoundingBox {
        center: Vec3::ZERO,
        size: Vec3::ONE,
    };

    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            size: aabb.size(),
        }
    }

    /// Bounds from optional local geometry, falling back to a unit cube.
    pub fn from_local_bounds(aabb: Option<Aabb>) -> Self {
        aabb.map_or(Self::UNIT, |a| Self::from_aabb(&a))
    }

    /// Half extent along `axis`, scaled by the object's scale on that axis.
    pub fn scaled_half_extent(&self, axis: MeasureAxis, scale: Vec3) -> f32 {
        axis.component(self.size) * axis.component(scale) * 0.5
    }

    /// Largest scaled extent, used to size the alignment grid fade.
    pub fn max_scaled_extent(&self, scale: Vec3) -> f32 {
        (self.size * scale).abs().max_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_from_points_center_and_size() {
        let aabb = Aabb::from_points(&[
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, 4.0, -2.0),
            Vec3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_center_size_roundtrip() {
        let aabb = Aabb::from_center_size(Vec3::new(0.5, 1.0, 0.0), Vec3::new(1.0, 2.0, 3.0));
        let bb = BoundingBox::from_aabb(&aabb);
        assert!(bb.center.abs_diff_eq(Vec3::new(0.5, 1.0, 0.0), 1e-6));
        assert!(bb.size.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    }

    #[test]
    fn test_missing_bounds_fall_back_to_unit() {
        assert_eq!(BoundingBox::from_local_bounds(None), BoundingBox::UNIT);
    }

    #[test]
    fn test_scaled_half_extent() {
        let bb = BoundingBox {
            center: Vec3::ZERO,
            size: Vec3::new(1.0, 2.0, 4.0),
        };
        let scale = Vec3::new(1.0, 0.5, 2.0);
        assert_eq!(bb.scaled_half_extent(MeasureAxis::X, scale), 0.5);
        assert_eq!(bb.scaled_half_extent(MeasureAxis::Y, scale), 0.5);
        assert_eq!(bb.scaled_half_extent(MeasureAxis::Z, scale), 4.0);
        assert_eq!(bb.max_scaled_extent(scale), 8.0);
    }
}
