//! Headless test harness: an in-memory world behind every port, plus a
//! controller and a frame input, so carry sessions can be scripted without a
//! client.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec2, Vec3};
use shared::{CarrySnapshot, EntityId, Transform};

use crate::controller::CarryController;
use crate::geometry::Aabb;
use crate::input::FrameInput;
use crate::picking::{ray_oriented_box, Ray};
use crate::ports::{
    Action, BodyOptions, ComponentKind, EntityStore, Highlighter, HighlightColor, InputAxis,
    Interaction, Ownership, Physics, Platform, Raycaster, SceneGraph, SurfaceHit, ViewerPose,
    VisualAidKind,
};
use crate::settings::ControllerSettings;

/// Default frame time (60 Hz).
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// One entity in the harness world.
#[derive(Debug, Clone)]
pub struct HarnessEntity {
    pub name: String,
    pub components: HashSet<ComponentKind>,
    pub transform: Transform,
    pub local_bounds: Option<Aabb>,
    /// Last options applied by the controller, or the spawn options
    pub body: Option<BodyOptions>,
    pub authority: bool,
    /// Whether a claim for authority succeeds
    pub claimable: bool,
}

/// In-memory world implementing every collaborator port.
#[derive(Debug, Clone)]
pub struct HarnessWorld {
    pub entities: HashMap<EntityId, HarnessEntity>,
    pub viewer: ViewerPose,
    pub hovered: Option<EntityId>,
    pub held_externally: Option<EntityId>,
    pub highlighted: Vec<EntityId>,
    pub highlight_color: Option<HighlightColor>,
    pub pointer_captured: bool,
    /// Visual aids in attach order
    pub attached_aids: Vec<VisualAidKind>,
    /// Every body reconfiguration, in order
    pub body_updates: Vec<(EntityId, BodyOptions)>,
}

impl Default for HarnessWorld {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            viewer: ViewerPose {
                camera: Transform::from_position(Vec3::new(0.0, 1.6, 0.0)),
                body_position: Vec3::ZERO,
            },
            hovered: None,
            held_externally: None,
            highlighted: Vec::new(),
            highlight_color: None,
            pointer_captured: false,
            attached_aids: Vec::new(),
            body_updates: Vec::new(),
        }
    }
}

impl HarnessWorld {
    /// Ray from the camera along its forward axis.
    pub fn view_ray(&self) -> Ray {
        Ray::new(self.viewer.camera.position, self.viewer.forward())
    }
}

impl EntityStore for HarnessWorld {
    fn exists(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    fn has_component(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.entities
            .get(&entity)
            .is_some_and(|e| e.components.contains(&kind))
    }

    fn add_component(&mut self, entity: EntityId, kind: ComponentKind) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.components.insert(kind);
        }
    }

    fn remove_component(&mut self, entity: EntityId, kind: ComponentKind) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.components.remove(&kind);
        }
    }
}

impl Physics for HarnessWorld {
    fn update_body(&mut self, entity: EntityId, options: BodyOptions) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.body = Some(options);
            self.body_updates.push((entity, options));
        }
    }
}

impl Ownership for HarnessWorld {
    fn claim_authority(&mut self, entity: EntityId) -> bool {
        match self.entities.get_mut(&entity) {
            Some(e) if e.claimable => {
                e.authority = true;
                true
            }
            _ => false,
        }
    }

    fn has_authority(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.authority)
    }
}

impl SceneGraph for HarnessWorld {
    fn world_transform(&self, entity: EntityId) -> Option<Transform> {
        self.entities.get(&entity).map(|e| e.transform)
    }

    fn set_world_transform(&mut self, entity: EntityId, transform: Transform) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.transform = transform;
        }
    }

    fn local_bounds(&self, entity: EntityId) -> Option<Aabb> {
        self.entities.get(&entity).and_then(|e| e.local_bounds)
    }

    fn viewer(&self) -> ViewerPose {
        self.viewer
    }

    fn attach_visual_aid(&mut self, kind: VisualAidKind) {
        self.attached_aids.push(kind);
    }
}

impl Highlighter for HarnessWorld {
    fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    fn add_highlight(&mut self, entity: EntityId) {
        if !self.highlighted.contains(&entity) {
            self.highlighted.push(entity);
        }
    }

    fn set_highlight_color(&mut self, color: HighlightColor) {
        self.highlight_color = Some(color);
    }
}

impl Platform for HarnessWorld {
    fn request_pointer_capture(&mut self) {
        self.pointer_captured = true;
    }

    fn release_pointer_capture(&mut self) {
        self.pointer_captured = false;
    }
}

impl Interaction for HarnessWorld {
    fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    fn held_externally(&self) -> Option<EntityId> {
        self.held_externally
    }
}

impl Raycaster for HarnessWorld {
    fn cast_view_ray(&self, exclude: Option<EntityId>) -> Option<SurfaceHit> {
        let ray = self.view_ray();
        let mut best: Option<(f32, SurfaceHit)> = None;

        for (id, entity) in &self.entities {
            if Some(*id) == exclude {
                continue;
            }
            let Some(bounds) = entity.local_bounds else {
                continue;
            };
            if let Some(hit) = ray_oriented_box(&ray, &entity.transform, &bounds) {
                if best.as_ref().is_none_or(|(t, _)| hit.t < *t) {
                    best = Some((
                        hit.t,
                        SurfaceHit {
                            surface: *id,
                            point: ray.at(hit.t),
                            local_normal: hit.normal,
                        },
                    ));
                }
            }
        }

        best.map(|(_, hit)| hit)
    }
}

/// Headless harness: world, controller, and input driven together.
pub struct TestHarness {
    pub controller: CarryController,
    pub world: HarnessWorld,
    pub input: FrameInput,
    refreshes: Vec<CarrySnapshot>,
    frame: u64,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(ControllerSettings::default())
    }

    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self {
            controller: CarryController::new(settings),
            world: HarnessWorld::default(),
            input: FrameInput::new(),
            refreshes: Vec::new(),
            frame: 0,
        }
    }

    // ── Scene setup ───────────────────────────────────────────

    /// Spawn a carryable box-shaped object with a dynamic body.
    pub fn spawn_object(&mut self, name: &str, size: Vec3, position: Vec3) -> EntityId {
        let id = EntityId::new();
        let components = HashSet::from([ComponentKind::Carryable, ComponentKind::PhysicsBody]);
        let body = self.controller.settings().physics.dynamic_options();
        self.world.entities.insert(
            id,
            HarnessEntity {
                name: name.to_string(),
                components,
                transform: Transform::from_position(position),
                local_bounds: Some(Aabb::from_center_size(Vec3::ZERO, size)),
                body: Some(body),
                authority: false,
                claimable: true,
            },
        );
        id
    }

    /// Spawn a carryable object flagged as floaty.
    pub fn spawn_floaty_object(&mut self, name: &str, size: Vec3, position: Vec3) -> EntityId {
        let id = self.spawn_object(name, size, position);
        self.world.add_component(id, ComponentKind::Floaty);
        id
    }

    /// Spawn a static box that only serves as a raycast surface.
    pub fn spawn_surface(&mut self, name: &str, size: Vec3, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.world.entities.insert(
            id,
            HarnessEntity {
                name: name.to_string(),
                components: HashSet::new(),
                transform,
                local_bounds: Some(Aabb::from_center_size(Vec3::ZERO, size)),
                body: None,
                authority: false,
                claimable: false,
            },
        );
        id
    }

    /// Remove an entity out from under the controller.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if self.world.hovered == Some(id) {
            self.world.hovered = None;
        }
        if self.world.held_externally == Some(id) {
            self.world.held_externally = None;
        }
        self.world.entities.remove(&id).is_some()
    }

    /// Another participant takes authority over `id`.
    pub fn revoke_authority(&mut self, id: EntityId) {
        if let Some(e) = self.world.entities.get_mut(&id) {
            e.authority = false;
            e.claimable = false;
        }
    }

    /// Make future authority claims on `id` fail.
    pub fn deny_authority(&mut self, id: EntityId) {
        if let Some(e) = self.world.entities.get_mut(&id) {
            e.claimable = false;
        }
    }

    // ── Viewer and interaction ────────────────────────────────

    /// Place the camera at `origin` looking along `direction`.
    pub fn aim(&mut self, origin: Vec3, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        self.world.viewer.camera.position = origin;
        self.world.viewer.camera.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
    }

    pub fn set_body_position(&mut self, position: Vec3) {
        self.world.viewer.body_position = position;
    }

    pub fn hover(&mut self, id: Option<EntityId>) {
        self.world.hovered = id;
    }

    /// Another input method grabs `id`.
    pub fn hold_externally(&mut self, id: EntityId) {
        self.world.held_externally = Some(id);
        self.world.add_component(id, ComponentKind::HeldRemote);
    }

    pub fn release_external_hold(&mut self) {
        if let Some(id) = self.world.held_externally.take() {
            self.world.remove_component(id, ComponentKind::HeldRemote);
        }
    }

    /// Platform reports that pointer capture ended.
    pub fn lose_pointer_capture(&mut self) {
        self.world.pointer_captured = false;
        self.controller.notify_pointer_capture_lost();
    }

    // ── Input and frames ──────────────────────────────────────

    pub fn press(&mut self, action: Action) {
        self.input.press(action);
    }

    pub fn set_axis(&mut self, axis: InputAxis, value: f32) {
        self.input.set_axis(axis, value);
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.input.set_cursor(Vec2::new(x, y));
    }

    /// Run one frame at the default frame time.
    pub fn tick(&mut self) -> Option<CarrySnapshot> {
        self.tick_dt(FRAME_DT)
    }

    /// Run one frame with an explicit frame time.
    pub fn tick_dt(&mut self, dt: f32) -> Option<CarrySnapshot> {
        let refresh = self.controller.tick(&mut self.world, &self.input, dt);
        self.input.end_frame();
        self.frame += 1;
        if let Some(snapshot) = &refresh {
            self.refreshes.push(snapshot.clone());
        }
        refresh
    }

    /// Run several frames; returns how many emitted a refresh.
    pub fn ticks(&mut self, count: usize) -> usize {
        (0..count).filter(|_| self.tick().is_some()).count()
    }

    /// Press `action` and run one frame.
    pub fn press_and_tick(&mut self, action: Action) -> Option<CarrySnapshot> {
        self.press(action);
        self.tick()
    }

    // ── Public controller actions ─────────────────────────────

    pub fn carry(&mut self, id: EntityId) -> bool {
        self.controller.carry_object(&mut self.world, id)
    }

    pub fn show_menu(&mut self, id: EntityId, x: f32, y: f32) {
        self.controller.show_object_menu(id, x, y);
    }

    pub fn clear_menu(&mut self) {
        self.controller.clear_object_menu();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn refreshes(&self) -> &[CarrySnapshot] {
        &self.refreshes
    }

    pub fn entity(&self, id: EntityId) -> Option<&HarnessEntity> {
        self.world.entities.get(&id)
    }

    pub fn transform(&self, id: EntityId) -> Option<Transform> {
        self.world.world_transform(id)
    }

    pub fn body(&self, id: EntityId) -> Option<BodyOptions> {
        self.entity(id).and_then(|e| e.body)
    }

    pub fn is_highlighted(&self, id: EntityId) -> bool {
        self.world.highlighted.contains(&id)
    }

    /// Look up an entity by name.
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.world
            .entities
            .iter()
            .find(|(_, e)| e.name == name)
            .map(|(id, _)| *id)
    }

    /// Summary of controller and world state as JSON.
    pub fn inspect(&self) -> serde_json::Value {
        let snapshot = self.controller.snapshot();
        let visuals = self.controller.visuals();
        let active = snapshot.data.active_object.and_then(|id| {
            self.entity(id).map(|e| {
                serde_json::json!({
                    "id": id,
                    "name": e.name,
                    "position": e.transform.position.to_array(),
                    "scale": e.transform.scale.to_array(),
                    "body": e.body,
                })
            })
        });
        serde_json::json!({
            "frame": self.frame,
            "snapshot": snapshot,
            "active": active,
            "entity_count": self.world.entities.len(),
            "pointer_captured": self.world.pointer_captured,
            "highlighted": self.world.highlighted,
            "indicator_visible": visuals.indicator.visible,
            "grid_visible": visuals.grid.visible,
        })
    }
}
