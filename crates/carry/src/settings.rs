//! Controller settings

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ports::{BodyMode, BodyOptions, CollisionMask, HighlightColor};

/// Hand-carry placement relative to the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrySettings {
    /// Horizontal distance in front of the body reference point (m)
    pub distance: f32,
    /// Height above the body reference point (m)
    pub height: f32,
}

impl Default for CarrySettings {
    fn default() -> Self {
        Self {
            distance: 1.5,
            height: 1.2,
        }
    }
}

/// Surface placement tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Full turns per second at full rotate input
    pub rotation_speed: f32,
    /// Meters per second at full nudge input
    pub nudge_speed: f32,
    /// Relative scale change per second at full scale input
    pub scale_speed: f32,
    /// Lower clamp for every scale component
    pub min_scale: f32,
    /// Starting standoff, keeps the placed face off the surface plane
    pub nudge_epsilon: f32,
    /// Change of normal-vs-up dot product that resets offsets
    pub discontinuity_threshold: f32,
    /// Normal-vs-up dot product above which a surface counts as floor/ceiling
    pub vertical_threshold: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 4.0,
            nudge_speed: 0.5,
            scale_speed: 1.0,
            min_scale: 0.01,
            nudge_epsilon: 0.001,
            discontinuity_threshold: 0.2,
            vertical_threshold: std::f32::consts::FRAC_1_SQRT_2,
        }
    }
}

/// Highlight colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Used while snapping (embedded objects)
    pub snapping_color: [u8; 3],
    /// Used for hovered and menu objects
    pub hover_color: [u8; 3],
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            snapping_color: [255, 80, 60],
            hover_color: [0, 220, 255],
        }
    }
}

impl HighlightSettings {
    pub fn snapping(&self) -> HighlightColor {
        HighlightColor(self.snapping_color)
    }

    pub fn hover(&self) -> HighlightColor {
        HighlightColor(self.hover_color)
    }
}

/// Damping and sleep thresholds for one body configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub linear_sleeping_threshold: f32,
    pub angular_sleeping_threshold: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            linear_damping: 0.01,
            angular_damping: 0.01,
            linear_sleeping_threshold: 1.6,
            angular_sleeping_threshold: 2.5,
        }
    }
}

/// Physics body configurations the controller switches between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward gravity magnitude (m/s²)
    pub gravity: f32,
    pub dynamic: BodyTuning,
    pub kinematic: BodyTuning,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            dynamic: BodyTuning::default(),
            kinematic: BodyTuning {
                linear_damping: 0.88,
                angular_damping: 0.88,
                linear_sleeping_threshold: 10.0,
                angular_sleeping_threshold: 10.0,
            },
        }
    }
}

impl PhysicsSettings {
    /// Free object falling under gravity.
    pub fn dynamic_options(&self) -> BodyOptions {
        BodyOptions {
            mode: BodyMode::Dynamic,
            gravity: Vec3::new(0.0, -self.gravity, 0.0),
            linear_damping: self.dynamic.linear_damping,
            angular_damping: self.dynamic.angular_damping,
            linear_sleeping_threshold: self.dynamic.linear_sleeping_threshold,
            angular_sleeping_threshold: self.dynamic.angular_sleeping_threshold,
            collision_mask: CollisionMask::DEFAULT_INTERACTABLE,
        }
    }

    /// Object left in place (e.g. on a wall).
    pub fn kinematic_options(&self) -> BodyOptions {
        BodyOptions {
            mode: BodyMode::Kinematic,
            gravity: Vec3::ZERO,
            linear_damping: self.kinematic.linear_damping,
            angular_damping: self.kinematic.angular_damping,
            linear_sleeping_threshold: self.kinematic.linear_sleeping_threshold,
            angular_sleeping_threshold: self.kinematic.angular_sleeping_threshold,
            collision_mask: CollisionMask::HANDS_AND_MEDIA_FRAMES,
        }
    }

    /// Object held by the controller: simulation suspended.
    pub fn carried_options(&self) -> BodyOptions {
        self.kinematic_options()
    }
}

/// All controller settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ControllerSettings {
    #[serde(default)]
    pub carry: CarrySettings,
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub highlight: HighlightSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
    /// Release pointer capture when an object is dropped
    #[serde(default = "default_true")]
    pub release_pointer_on_drop: bool,
}

fn default_true() -> bool {
    true
}

impl ControllerSettings {
    /// Parse settings from a JSON blob; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Settings parse error: {e}"))
    }

    /// Load settings from file, or return default if not found.
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "carry", "carry") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match Self::from_json(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("{e}, using defaults"),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file.
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "carry", "carry") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to save settings to {}: {e}", config_path.display());
                    }
                }
            }
        }
    }
}
