//! Carry start/stop and snap-mode transitions

use glam::{Quat, Vec3};
use shared::{CarryState, EntityId, Transform};

use super::CarryController;
use crate::geometry::BoundingBox;
use crate::ports::{CarryWorld, ComponentKind, EntityStore};

impl CarryController {
    /// Start hand-carrying `entity`. Returns false when the entity is missing
    /// or has no physics body.
    pub fn carry_object<W: CarryWorld>(&mut self, world: &mut W, entity: EntityId) -> bool {
        if !world.exists(entity) || !world.has_component(entity, ComponentKind::PhysicsBody) {
            tracing::warn!("Cannot carry {}: missing entity or physics body", entity.short());
            return false;
        }

        match self.state {
            CarryState::Menu => self.clear_object_menu(),
            CarryState::Carrying | CarryState::Snapping if self.data.active_object != Some(entity) => {
                self.drop_object(world, self.data.apply_gravity);
            }
            _ => {}
        }

        self.state = CarryState::Carrying;
        self.data.active_object = Some(entity);
        self.data.apply_gravity = true;

        // A refused claim is picked up by the watchdog on the next tick
        if !world.claim_authority(entity) {
            tracing::debug!("Authority claim on {} refused", entity.short());
        }

        for marker in ComponentKind::HELD_MARKERS {
            world.remove_component(entity, marker);
        }

        world.request_pointer_capture();
        world.update_body(entity, self.settings.physics.carried_options());

        let bounds = BoundingBox::from_local_bounds(world.local_bounds(entity));
        self.data.center = bounds.center;
        self.data.size = bounds.size;

        tracing::info!("Carrying {}", entity.short());
        self.mark_dirty();
        true
    }

    /// Release the active object, restoring dynamic physics when
    /// `apply_gravity` is set and leaving it kinematic in place otherwise.
    pub fn drop_object<W: CarryWorld>(&mut self, world: &mut W, apply_gravity: bool) {
        if self.data.active_object.is_none() && self.state == CarryState::None {
            return;
        }

        if let Some(entity) = self.data.active_object {
            if self.settings.release_pointer_on_drop {
                world.release_pointer_capture();
            }

            let options = if apply_gravity {
                self.settings.physics.dynamic_options()
            } else {
                self.settings.physics.kinematic_options()
            };
            world.update_body(entity, options);

            if world.has_component(entity, ComponentKind::Floaty) {
                if apply_gravity {
                    world.add_component(entity, ComponentKind::FloatyGravityOnRelease);
                } else {
                    world.remove_component(entity, ComponentKind::FloatyGravityOnRelease);
                }
            }

            tracing::info!("Dropped {} (gravity: {apply_gravity})", entity.short());
        }

        self.force_reset();
    }

    /// Carrying → Snapping with fresh offsets.
    pub(super) fn enter_snapping<W: CarryWorld>(&mut self, world: &mut W) {
        self.state = CarryState::Snapping;
        self.data.rotation_offset = 0.0;
        self.data.nudge_offset = self.settings.snap.nudge_epsilon;
        self.data.snap_face = None;
        self.solver.reset();
        self.visuals.show_grid(world);
        tracing::info!("Snap placement started");
        self.mark_dirty();
    }

    /// Snapping → Carrying.
    pub(super) fn leave_snapping(&mut self) {
        self.state = CarryState::Carrying;
        self.solver.reset();
        self.visuals.hide_all();
        tracing::info!("Snap placement cancelled");
        self.mark_dirty();
    }

    /// Hold the object in front of the viewer at a fixed distance and height,
    /// facing back towards them.
    pub(super) fn update_carry_transform<W: CarryWorld>(&mut self, world: &mut W) {
        let Some(entity) = self.data.active_object else {
            return;
        };

        let viewer = world.viewer();
        let forward = viewer.forward();
        let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        if flat == Vec3::ZERO {
            // Looking straight up or down; keep the last transform
            return;
        }

        let carry = &self.settings.carry;
        let rotation = Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z));
        let scale = world
            .world_transform(entity)
            .map_or(Vec3::ONE, |t| t.scale);
        let anchor = viewer.body_position + flat * carry.distance + Vec3::Y * carry.height;
        let position = anchor - rotation * (self.data.center * scale);

        world.set_world_transform(
            entity,
            Transform {
                position,
                rotation,
                scale,
            },
        );
    }

    /// Eligible for pickup.
    pub(super) fn is_carryable<W: EntityStore>(world: &W, entity: EntityId) -> bool {
        world.exists(entity)
            && world.has_component(entity, ComponentKind::Carryable)
            && world.has_component(entity, ComponentKind::PhysicsBody)
    }
}
