//! Ownership-loss watchdog

use super::CarryController;
use crate::ports::{EntityStore, Ownership};

impl CarryController {
    /// Reset to `None` if the active object was removed, or if authority over
    /// it was lost while carrying or snapping. Returns true when it fired.
    pub(super) fn run_watchdog<W: EntityStore + Ownership>(&mut self, world: &W) -> bool {
        let Some(entity) = self.data.active_object else {
            return false;
        };

        if !world.exists(entity) {
            tracing::warn!("Active object {} was removed, resetting", entity.short());
        } else if self.state.is_manipulating() && !world.has_authority(entity) {
            tracing::warn!("Lost authority over {}, resetting", entity.short());
        } else {
            return false;
        }

        self.force_reset();
        true
    }
}
