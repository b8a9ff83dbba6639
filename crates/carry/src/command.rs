//! JSON command protocol for scripting carry sessions against the harness.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use shared::{EntityId, Transform};

use crate::harness::{TestHarness, FRAME_DT};
use crate::ports::{Action, InputAxis};

fn default_one() -> f32 {
    1.0
}

fn default_frames() -> usize {
    1
}

fn default_dt() -> f32 {
    FRAME_DT
}

/// Entity reference by id or by spawn name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(EntityId),
    Name(String),
}

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SimCommand {
    /// Spawn a carryable box
    SpawnObject {
        name: String,
        size: [f32; 3],
        position: [f32; 3],
        #[serde(default)]
        floaty: bool,
    },
    /// Spawn a static surface slab
    SpawnSurface {
        name: String,
        size: [f32; 3],
        position: [f32; 3],
        /// Euler angles in degrees (XYZ)
        #[serde(default)]
        rotation: [f32; 3],
    },
    /// Point the camera
    Aim {
        origin: [f32; 3],
        direction: [f32; 3],
    },
    /// Set or clear the hovered entity
    Hover {
        #[serde(default)]
        target: Option<EntityRef>,
    },
    /// Another input method grabs the entity
    HoldExternally { target: EntityRef },
    /// Press an action for the next frame
    Press { action: Action },
    /// Set an analog axis
    SetAxis {
        axis: InputAxis,
        #[serde(default = "default_one")]
        value: f32,
    },
    /// Run frames
    Tick {
        #[serde(default = "default_frames")]
        frames: usize,
        #[serde(default = "default_dt")]
        dt: f32,
    },
    /// Call the public carry action directly
    Carry { target: EntityRef },
    /// Open the object menu at a screen position
    ShowMenu {
        target: EntityRef,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    /// Close the object menu
    ClearMenu,
    /// Delete an entity out from under the controller
    Remove { target: EntityRef },
    /// Another participant takes authority
    RevokeAuthority { target: EntityRef },
    /// Platform ends pointer capture
    LosePointerCapture,
    /// Report controller and world state
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn resolve(harness: &TestHarness, target: &EntityRef) -> Result<EntityId, String> {
    match target {
        EntityRef::Id(id) if harness.entity(*id).is_some() => Ok(*id),
        EntityRef::Id(id) => Err(format!("Unknown entity {id}")),
        EntityRef::Name(name) => harness
            .find(name)
            .ok_or_else(|| format!("No entity named '{name}'")),
    }
}

fn euler_degrees(rotation: [f32; 3]) -> Quat {
    Quat::from_euler(
        glam::EulerRot::XYZ,
        rotation[0].to_radians(),
        rotation[1].to_radians(),
        rotation[2].to_radians(),
    )
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: SimCommand) -> CommandResponse {
    match run(harness, cmd) {
        Ok(resp) => resp,
        Err(e) => CommandResponse::err(e),
    }
}

fn run(harness: &mut TestHarness, cmd: SimCommand) -> Result<CommandResponse, String> {
    let resp = match cmd {
        SimCommand::SpawnObject {
            name,
            size,
            position,
            floaty,
        } => {
            let (size, position) = (Vec3::from(size), Vec3::from(position));
            let id = if floaty {
                harness.spawn_floaty_object(&name, size, position)
            } else {
                harness.spawn_object(&name, size, position)
            };
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        SimCommand::SpawnSurface {
            name,
            size,
            position,
            rotation,
        } => {
            let transform = Transform {
                position: Vec3::from(position),
                rotation: euler_degrees(rotation),
                scale: Vec3::ONE,
            };
            let id = harness.spawn_surface(&name, Vec3::from(size), transform);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        SimCommand::Aim { origin, direction } => {
            if Vec3::from(direction).length_squared() == 0.0 {
                return Err("Aim direction must be nonzero".to_string());
            }
            harness.aim(Vec3::from(origin), Vec3::from(direction));
            CommandResponse::ok()
        }

        SimCommand::Hover { target } => {
            let id = target.map(|t| resolve(harness, &t)).transpose()?;
            harness.hover(id);
            CommandResponse::ok()
        }

        SimCommand::HoldExternally { target } => {
            let id = resolve(harness, &target)?;
            harness.hold_externally(id);
            CommandResponse::ok()
        }

        SimCommand::Press { action } => {
            harness.press(action);
            CommandResponse::ok()
        }

        SimCommand::SetAxis { axis, value } => {
            harness.set_axis(axis, value);
            CommandResponse::ok()
        }

        SimCommand::Tick { frames, dt } => {
            let mut refreshes = 0;
            for _ in 0..frames {
                if harness.tick_dt(dt).is_some() {
                    refreshes += 1;
                }
            }
            CommandResponse::ok_with_data(serde_json::json!({
                "frame": harness.frame(),
                "refreshes": refreshes,
                "state": harness.controller.state(),
            }))
        }

        SimCommand::Carry { target } => {
            let id = resolve(harness, &target)?;
            let carried = harness.carry(id);
            CommandResponse::ok_with_data(serde_json::json!({ "carried": carried }))
        }

        SimCommand::ShowMenu { target, x, y } => {
            let id = resolve(harness, &target)?;
            harness.show_menu(id, x, y);
            CommandResponse::ok()
        }

        SimCommand::ClearMenu => {
            harness.clear_menu();
            CommandResponse::ok()
        }

        SimCommand::Remove { target } => {
            let id = resolve(harness, &target)?;
            harness.remove(id);
            CommandResponse::ok()
        }

        SimCommand::RevokeAuthority { target } => {
            let id = resolve(harness, &target)?;
            harness.revoke_authority(id);
            CommandResponse::ok()
        }

        SimCommand::LosePointerCapture => {
            harness.lose_pointer_capture();
            CommandResponse::ok()
        }

        SimCommand::Inspect => CommandResponse::ok_with_data(harness.inspect()),
    };
    Ok(resp)
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: SimCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<SimCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON array: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
