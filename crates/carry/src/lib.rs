// Library crate: the carry/snap controller plus the headless harness used by
// integration tests and the `carry-sim` binary.

pub mod command;
pub mod controller;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod input;
pub mod picking;
pub mod ports;
pub mod settings;
pub mod snap;
pub mod visuals;

pub use controller::CarryController;
pub use settings::ControllerSettings;
pub use shared::{CarrySnapshot, CarryState, CarryStateData, EntityId, SnapFace, Transform};
