//! Per-frame driver

use shared::{CarrySnapshot, CarryState};

use super::CarryController;
use crate::ports::{Action, CarryWorld, InputSource};
use crate::snap::SnapStep;

impl CarryController {
    /// Run one frame. Returns a snapshot when HUD-visible state changed
    /// during this frame (or since the last frame via direct calls).
    pub fn tick<W: CarryWorld>(
        &mut self,
        world: &mut W,
        input: &impl InputSource,
        dt: f32,
    ) -> Option<CarrySnapshot> {
        world.clear_highlight();
        self.run_watchdog(&*world);

        match self.state {
            CarryState::Carrying => self.tick_carrying(world, input),
            CarryState::Snapping => self.tick_snapping(world, input, dt),
            CarryState::None | CarryState::Menu => self.tick_idle(world, input),
        }

        self.pointer_capture_lost = false;
        self.take_ui_refresh()
    }

    fn tick_carrying<W: CarryWorld>(&mut self, world: &mut W, input: &impl InputSource) {
        if self.pointer_capture_lost {
            self.drop_object(world, self.data.apply_gravity);
            return;
        }

        self.update_carry_transform(world);

        if input.pressed(Action::ToggleGravity) {
            self.data.apply_gravity = !self.data.apply_gravity;
            self.mark_dirty();
        }

        if input.pressed(Action::Drop) {
            self.drop_object(world, self.data.apply_gravity);
        } else if input.pressed(Action::ToggleSnap) {
            self.enter_snapping(world);
        }
    }

    fn tick_snapping<W: CarryWorld>(&mut self, world: &mut W, input: &impl InputSource, dt: f32) {
        // Placed objects stay where they are
        if self.pointer_capture_lost || input.pressed(Action::Drop) {
            self.drop_object(world, false);
            return;
        }

        world.set_highlight_color(self.settings.highlight.snapping());
        if let Some(entity) = self.data.active_object {
            if self.data.is_embedded() {
                world.add_highlight(entity);
            }
        }

        let step = self.solver.solve(
            &mut self.data,
            &mut self.visuals,
            world,
            input,
            &self.settings,
            dt,
        );
        match step {
            SnapStep::RevertToCarry => self.leave_snapping(),
            SnapStep::Placed { dirty: true } => self.mark_dirty(),
            SnapStep::Placed { dirty: false } | SnapStep::NoHit => {}
        }
    }

    fn tick_idle<W: CarryWorld>(&mut self, world: &mut W, input: &impl InputSource) {
        world.set_highlight_color(self.settings.highlight.hover());

        let hovered = world.hovered();
        let hovered = hovered.filter(|entity| Self::is_carryable(&*world, *entity));

        if let Some(held) = world.held_externally() {
            if input.pressed(Action::ToggleSnap) {
                // Grabbed elsewhere: go straight to placement
                if self.carry_object(world, held) {
                    self.enter_snapping(world);
                }
                return;
            }
        }

        if let Some(active) = self.data.active_object {
            world.add_highlight(active);
        } else if let Some(entity) = hovered {
            world.add_highlight(entity);
            if input.pressed(Action::Carry) {
                self.carry_object(world, entity);
            } else if input.pressed(Action::ShowMenu) {
                let cursor = input.cursor();
                self.show_object_menu(entity, cursor.x, cursor.y);
            }
        }
    }
}
