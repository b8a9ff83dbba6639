//! Placement visual aids: the nudge direction indicator and the alignment grid.
//!
//! Both are singletons. They are attached to the scene the first time they are
//! shown and reused afterwards; hiding only flips visibility.

use glam::Vec3;
use shared::{EntityId, Transform};

use crate::ports::{SceneGraph, VisualAidKind};

/// Arrow showing the nudge direction and length.
#[derive(Debug, Clone, Default)]
pub struct DirectionalIndicator {
    pub attached: bool,
    pub visible: bool,
    pub position: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

/// Grid drawn on the surface under the placed object.
#[derive(Debug, Clone, Default)]
pub struct AlignmentGrid {
    pub attached: bool,
    pub visible: bool,
    /// Surface the grid is aligned to
    pub anchor: Option<EntityId>,
    /// World transform of the anchored surface
    pub anchor_transform: Option<Transform>,
    /// Shader reference point for the fade falloff
    pub reference_position: Vec3,
    /// Shader reference radius for the fade falloff
    pub reference_scale: f32,
}

/// Both visual aids.
#[derive(Debug, Clone, Default)]
pub struct VisualAids {
    pub indicator: DirectionalIndicator,
    pub grid: AlignmentGrid,
}

impl VisualAids {
    pub fn show_grid(&mut self, scene: &mut impl SceneGraph) {
        if !self.grid.attached {
            scene.attach_visual_aid(VisualAidKind::AlignmentGrid);
            self.grid.attached = true;
        }
        self.grid.visible = true;
    }

    pub fn hide_grid(&mut self) {
        self.grid.visible = false;
    }

    /// Align the grid to a new surface.
    pub fn anchor_grid(&mut self, surface: EntityId, transform: Option<Transform>) {
        self.grid.anchor = Some(surface);
        self.grid.anchor_transform = transform;
    }

    pub fn set_grid_reference(&mut self, position: Vec3, scale: f32) {
        self.grid.reference_position = position;
        self.grid.reference_scale = scale;
    }

    /// Place the indicator; it is shown only for a nonzero length.
    pub fn update_indicator(
        &mut self,
        scene: &mut impl SceneGraph,
        position: Vec3,
        direction: Vec3,
        length: f32,
    ) {
        if !self.indicator.attached {
            scene.attach_visual_aid(VisualAidKind::DirectionalIndicator);
            self.indicator.attached = true;
        }
        self.indicator.position = position;
        self.indicator.direction = direction;
        self.indicator.length = length;
        self.indicator.visible = length != 0.0;
    }

    /// Hide everything and forget the grid anchor.
    pub fn hide_all(&mut self) {
        self.indicator.visible = false;
        self.grid.visible = false;
        self.grid.anchor = None;
        self.grid.anchor_transform = None;
    }

    pub fn any_visible(&self) -> bool {
        self.indicator.visible || self.grid.visible
    }
}
