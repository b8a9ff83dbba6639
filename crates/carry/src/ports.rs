//! Port traits for the collaborators the controller drives.
//!
//! The controller never owns entities, bodies, or scene objects. It reads and
//! writes them through these traits, so a game client, a test harness, or a
//! replay tool can sit behind the same controller.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::{EntityId, Transform};

use crate::geometry::Aabb;

// ── Value types ─────────────────────────────────────────────

/// Component markers the controller checks or edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Eligible for pickup by this controller
    Carryable,
    /// Has a physics body the controller can reconfigure
    PhysicsBody,
    /// Held by the left hand controller
    HeldLeftHand,
    /// Held by the right hand controller
    HeldRightHand,
    /// Held by the cursor/remote
    HeldRemote,
    /// Buoyant object with suspended gravity
    Floaty,
    /// Floaty sub-flag: re-enable gravity on the next external release
    FloatyGravityOnRelease,
}

impl ComponentKind {
    /// Markers meaning another input method currently holds the entity.
    pub const HELD_MARKERS: [ComponentKind; 3] = [
        ComponentKind::HeldLeftHand,
        ComponentKind::HeldRightHand,
        ComponentKind::HeldRemote,
    ];
}

/// Physics body simulation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMode {
    Dynamic,
    Kinematic,
}

/// Collision layer bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const NONE: CollisionMask = CollisionMask(0);
    pub const ENVIRONMENT: CollisionMask = CollisionMask(1 << 0);
    pub const INTERACTABLES: CollisionMask = CollisionMask(1 << 1);
    pub const AVATAR: CollisionMask = CollisionMask(1 << 2);
    pub const HANDS: CollisionMask = CollisionMask(1 << 3);
    pub const MEDIA_FRAMES: CollisionMask = CollisionMask(1 << 4);

    /// Default collision set for a free interactable object.
    pub const DEFAULT_INTERACTABLE: CollisionMask = CollisionMask(
        Self::ENVIRONMENT.0 | Self::INTERACTABLES.0 | Self::AVATAR.0 | Self::HANDS.0 | Self::MEDIA_FRAMES.0,
    );
    /// Only hands and media frames, for placed kinematic objects.
    pub const HANDS_AND_MEDIA_FRAMES: CollisionMask =
        CollisionMask(Self::HANDS.0 | Self::MEDIA_FRAMES.0);

    pub fn contains(&self, other: CollisionMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CollisionMask {
    type Output = CollisionMask;

    fn bitor(self, rhs: CollisionMask) -> CollisionMask {
        CollisionMask(self.0 | rhs.0)
    }
}

/// Options passed to the physics collaborator when reconfiguring a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyOptions {
    pub mode: BodyMode,
    pub gravity: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub linear_sleeping_threshold: f32,
    pub angular_sleeping_threshold: f32,
    pub collision_mask: CollisionMask,
}

/// Discrete, edge-triggered input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Carry,
    Drop,
    ToggleSnap,
    ToggleGravity,
    ChangeSnapFace,
    ShowMenu,
}

impl Action {
    /// Input-system path the action is bound to.
    pub fn path(&self) -> &'static str {
        match self {
            Action::Carry => "/actions/carry",
            Action::Drop => "/actions/drop",
            Action::ToggleSnap => "/actions/toggle_snap",
            Action::ToggleGravity => "/actions/toggle_gravity",
            Action::ChangeSnapFace => "/actions/change_snap_face",
            Action::ShowMenu => "/actions/show_menu",
        }
    }
}

/// Continuous analog inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAxis {
    RotateCw,
    RotateCcw,
    Nudge,
    Scale,
}

impl InputAxis {
    pub fn path(&self) -> &'static str {
        match self {
            InputAxis::RotateCw => "/actions/rotate_cw",
            InputAxis::RotateCcw => "/actions/rotate_ccw",
            InputAxis::Nudge => "/actions/nudge",
            InputAxis::Scale => "/actions/scale",
        }
    }
}

/// First surface hit by the view ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Entity owning the surface
    pub surface: EntityId,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal in the surface entity's local space
    pub local_normal: Vec3,
}

/// Where the user is and where they look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPose {
    /// Camera world transform; forward is local -Z
    pub camera: Transform,
    /// Reference point on the user's body (feet)
    pub body_position: Vec3,
}

impl ViewerPose {
    pub fn forward(&self) -> Vec3 {
        self.camera.rotation * Vec3::NEG_Z
    }
}

/// Highlight palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightColor(pub [u8; 3]);

/// Singleton visual aids attached to the scene on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualAidKind {
    DirectionalIndicator,
    AlignmentGrid,
}

// ── Collaborator ports ──────────────────────────────────────

/// Entity/component storage.
pub trait EntityStore {
    fn exists(&self, entity: EntityId) -> bool;
    fn has_component(&self, entity: EntityId, kind: ComponentKind) -> bool;
    fn add_component(&mut self, entity: EntityId, kind: ComponentKind);
    fn remove_component(&mut self, entity: EntityId, kind: ComponentKind);
}

/// Per-tick input queries.
pub trait InputSource {
    /// Action was triggered this tick.
    fn pressed(&self, action: Action) -> bool;
    /// Current analog value, typically in [-1, 1].
    fn axis(&self, axis: InputAxis) -> f32;
    /// Cursor position in screen pixels.
    fn cursor(&self) -> Vec2;
}

/// Physics engine body configuration.
pub trait Physics {
    fn update_body(&mut self, entity: EntityId, options: BodyOptions);
}

/// Networked manipulation authority.
pub trait Ownership {
    /// Request authority. Returns false if another participant keeps it.
    fn claim_authority(&mut self, entity: EntityId) -> bool;
    fn has_authority(&self, entity: EntityId) -> bool;
}

/// Scene graph / transform access.
pub trait SceneGraph {
    fn world_transform(&self, entity: EntityId) -> Option<Transform>;
    fn set_world_transform(&mut self, entity: EntityId, transform: Transform);
    /// Recompute the entity's local bounding box from its geometry.
    fn local_bounds(&self, entity: EntityId) -> Option<Aabb>;
    fn viewer(&self) -> ViewerPose;
    fn attach_visual_aid(&mut self, kind: VisualAidKind);
}

/// Selection highlight set.
pub trait Highlighter {
    fn clear_highlight(&mut self);
    fn add_highlight(&mut self, entity: EntityId);
    fn set_highlight_color(&mut self, color: HighlightColor);
}

/// Exclusive pointer/view capture.
pub trait Platform {
    fn request_pointer_capture(&mut self);
    fn release_pointer_capture(&mut self);
}

/// What other input methods point at or hold.
pub trait Interaction {
    /// Entity under the cursor, if any.
    fn hovered(&self) -> Option<EntityId>;
    /// Entity held by another input method (hand, remote), if any.
    fn held_externally(&self) -> Option<EntityId>;
}

/// Scene raycasting from the view center.
pub trait Raycaster {
    /// First surface hit by a ray from the view center, ignoring `exclude`.
    fn cast_view_ray(&self, exclude: Option<EntityId>) -> Option<SurfaceHit>;
}

/// Everything the controller needs from the world in one bound.
pub trait CarryWorld:
    EntityStore + Physics + Ownership + SceneGraph + Highlighter + Platform + Interaction + Raycaster
{
}

impl<T> CarryWorld for T where
    T: EntityStore + Physics + Ownership + SceneGraph + Highlighter + Platform + Interaction + Raycaster
{
}
