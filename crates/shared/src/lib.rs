use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to an entity in the external entity/component store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Allocate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// World-space transform of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// Map a local-space point into world space.
    pub fn point_to_world(&self, p: Vec3) -> Vec3 {
        self.position + self.rotation * (p * self.scale)
    }

    /// Map a world-space point into local space.
    pub fn point_to_local(&self, p: Vec3) -> Vec3 {
        (self.rotation.inverse() * (p - self.position)) / self.scale
    }

    /// Map a world-space direction into local space (no translation).
    pub fn direction_to_local(&self, d: Vec3) -> Vec3 {
        (self.rotation.inverse() * d) / self.scale
    }

    /// Map a local normal into world space (inverse-transpose of scale), not normalized.
    pub fn normal_to_world(&self, n: Vec3) -> Vec3 {
        self.rotation * (n / self.scale)
    }
}

/// Controller state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryState {
    #[default]
    None,
    Menu,
    Carrying,
    Snapping,
}

impl CarryState {
    /// States in which the controller drives the object's transform.
    pub fn is_manipulating(&self) -> bool {
        matches!(self, CarryState::Carrying | CarryState::Snapping)
    }
}

/// One of the six canonical faces an object can rest on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapFace {
    Left,
    Front,
    Right,
    Top,
    Bottom,
    Back,
}

impl SnapFace {
    /// All faces in cycling order.
    pub const ALL: [SnapFace; 6] = [
        SnapFace::Left,
        SnapFace::Front,
        SnapFace::Right,
        SnapFace::Top,
        SnapFace::Bottom,
        SnapFace::Back,
    ];

    /// Face used on floors when no face is pinned.
    pub const FLOOR_DEFAULT: SnapFace = SnapFace::Bottom;
    /// Face used on ceilings when no face is pinned.
    pub const CEILING_DEFAULT: SnapFace = SnapFace::Top;
    /// Face used on walls when no face is pinned.
    pub const WALL_DEFAULT: SnapFace = SnapFace::Back;

    pub fn index(&self) -> usize {
        match self {
            SnapFace::Left => 0,
            SnapFace::Front => 1,
            SnapFace::Right => 2,
            SnapFace::Top => 3,
            SnapFace::Bottom => 4,
            SnapFace::Back => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<SnapFace> {
        Self::ALL.get(index).copied()
    }

    /// Next face in cycling order, wrapping after `Back`.
    pub fn next(&self) -> SnapFace {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SnapFace::Left => "Left",
            SnapFace::Front => "Front",
            SnapFace::Right => "Right",
            SnapFace::Top => "Top",
            SnapFace::Bottom => "Bottom",
            SnapFace::Back => "Back",
        }
    }
}

/// Authoritative record of what is being manipulated and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryStateData {
    /// Manipulated entity; `None` whenever the state is `CarryState::None`
    pub active_object: Option<EntityId>,
    /// Angle (radians) about the snap face axis
    pub rotation_offset: f32,
    /// Standoff from the surface along its normal (meters); negative means embedded
    pub nudge_offset: f32,
    /// Pinned face, or `None` to infer from the surface normal
    pub snap_face: Option<SnapFace>,
    /// Whether dropping restores dynamic physics
    pub apply_gravity: bool,
    pub menu_pos_x: f32,
    pub menu_pos_y: f32,
    /// Local bounding box center, captured at carry start
    pub center: Vec3,
    /// Local bounding box size, captured at carry start
    pub size: Vec3,
}

impl CarryStateData {
    /// Fresh record with the given starting nudge.
    pub fn new(nudge_epsilon: f32) -> Self {
        Self {
            active_object: None,
            rotation_offset: 0.0,
            nudge_offset: nudge_epsilon,
            snap_face: None,
            apply_gravity: true,
            menu_pos_x: 0.0,
            menu_pos_y: 0.0,
            center: Vec3::ZERO,
            size: Vec3::ZERO,
        }
    }

    /// Snap face as a signed index, `-1` meaning automatic.
    pub fn snap_face_index(&self) -> i32 {
        self.snap_face.map_or(-1, |f| f.index() as i32)
    }

    /// Object is pushed into the surface past its face.
    pub fn is_embedded(&self) -> bool {
        self.nudge_offset < 0.0
    }
}

/// Immutable copy of the controller state, emitted at most once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrySnapshot {
    pub state: CarryState,
    pub data: CarryStateData,
}
