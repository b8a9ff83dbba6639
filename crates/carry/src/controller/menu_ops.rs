//! Contextual object menu

use shared::{CarryState, EntityId};

use super::CarryController;

impl CarryController {
    /// Open the object menu for `entity` at screen position (`x`, `y`).
    /// Ignored while an object is being carried or snapped.
    pub fn show_object_menu(&mut self, entity: EntityId, x: f32, y: f32) {
        if self.state.is_manipulating() {
            return;
        }
        self.state = CarryState::Menu;
        self.data.active_object = Some(entity);
        self.data.menu_pos_x = x;
        self.data.menu_pos_y = y;
        tracing::info!("Object menu for {} at ({x:.0}, {y:.0})", entity.short());
        self.mark_dirty();
    }

    /// Close the object menu if it is open.
    pub fn clear_object_menu(&mut self) {
        if self.state != CarryState::Menu {
            return;
        }
        self.state = CarryState::None;
        self.data.active_object = None;
        tracing::info!("Object menu closed");
        self.mark_dirty();
    }
}
