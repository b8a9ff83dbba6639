//! Carry controller
//!
//! Owns the carry state machine (`None → Menu → Carrying ⇄ Snapping`) and the
//! record of what is being manipulated. One instance per user; collaborators
//! are passed into every call rather than held.

mod carry_ops;
mod frame;
mod menu_ops;
mod watchdog;

use shared::{CarrySnapshot, CarryState, CarryStateData};

use crate::settings::ControllerSettings;
use crate::snap::SnapSolver;
use crate::visuals::VisualAids;

/// Object manipulation state machine.
#[derive(Debug)]
pub struct CarryController {
    state: CarryState,
    data: CarryStateData,
    settings: ControllerSettings,
    solver: SnapSolver,
    visuals: VisualAids,
    /// Pointer capture was lost since the last tick
    pointer_capture_lost: bool,
    /// A HUD-visible field changed since the last refresh
    ui_dirty: bool,
}

impl Default for CarryController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl CarryController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            state: CarryState::None,
            data: CarryStateData::new(settings.snap.nudge_epsilon),
            settings,
            solver: SnapSolver::new(),
            visuals: VisualAids::default(),
            pointer_capture_lost: false,
            ui_dirty: false,
        }
    }

    pub fn state(&self) -> CarryState {
        self.state
    }

    pub fn data(&self) -> &CarryStateData {
        &self.data
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn visuals(&self) -> &VisualAids {
        &self.visuals
    }

    pub fn is_carrying_object(&self) -> bool {
        self.state == CarryState::Carrying
    }

    pub fn is_snapping_object(&self) -> bool {
        self.state == CarryState::Snapping
    }

    pub fn is_object_menu_showing(&self) -> bool {
        self.state == CarryState::Menu
    }

    /// Copy of the current state for HUD/menu rendering.
    pub fn snapshot(&self) -> CarrySnapshot {
        CarrySnapshot {
            state: self.state,
            data: self.data.clone(),
        }
    }

    /// Platform callback: exclusive pointer capture ended.
    /// Consumed by the next tick.
    pub fn notify_pointer_capture_lost(&mut self) {
        self.pointer_capture_lost = true;
    }

    /// Set the nudge directly (HUD slider).
    pub fn set_nudge_offset(&mut self, nudge: f32) {
        if self.data.nudge_offset != nudge {
            self.data.nudge_offset = nudge;
            self.ui_dirty = true;
        }
    }

    fn mark_dirty(&mut self) {
        self.ui_dirty = true;
    }

    /// Snapshot if anything HUD-visible changed, clearing the flag.
    fn take_ui_refresh(&mut self) -> Option<CarrySnapshot> {
        if !self.ui_dirty {
            return None;
        }
        self.ui_dirty = false;
        Some(self.snapshot())
    }

    /// Return to `None`, forgetting the object and hiding visual aids.
    /// Leaves the object's physics body untouched.
    fn force_reset(&mut self) {
        self.state = CarryState::None;
        self.data.active_object = None;
        self.visuals.hide_all();
        self.solver.reset();
        self.mark_dirty();
    }
}
