//! Integration tests for carry start/drop, the menu, the watchdog, and the
//! frame driver's idle-state handling.

use carry_lib::fixtures::*;
use carry_lib::harness::TestHarness;
use carry_lib::ports::{
    Action, BodyMode, CollisionMask, ComponentKind, EntityStore, InputAxis, Ownership,
};
use carry_lib::{CarryState, EntityId};
use glam::Vec3;

/// Floor, a unit cube, camera at eye height looking along -Z.
fn carry_scene() -> (TestHarness, EntityId) {
    let mut h = TestHarness::new();
    floor(&mut h, 0.0);
    let cube = h.spawn_object("cube", Vec3::ONE, Vec3::new(0.0, 0.5, -3.0));
    h.aim(Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z);
    (h, cube)
}

fn start_carry(h: &mut TestHarness, cube: EntityId) {
    h.hover(Some(cube));
    h.press_and_tick(Action::Carry);
    h.hover(None);
}

#[test]
fn test_carry_action_on_hovered_object() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);

    assert!(h.controller.is_carrying_object());
    assert_eq!(h.controller.data().active_object, Some(cube));
    assert!(h.controller.data().apply_gravity);
    assert!(h.world.pointer_captured);

    let body = h.body(cube).unwrap();
    assert_eq!(body.mode, BodyMode::Kinematic);
    assert_eq!(body.gravity, Vec3::ZERO);

    assert!(h.controller.data().size.abs_diff_eq(Vec3::ONE, 1e-6));
    assert!(h.controller.data().center.abs_diff_eq(Vec3::ZERO, 1e-6));
    assert!(h.world.has_authority(cube));
}

#[test]
fn test_carried_object_follows_viewer() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.tick();

    let t = h.transform(cube).unwrap();
    assert!(t.position.abs_diff_eq(Vec3::new(0.0, 1.2, -1.5), 1e-5), "{:?}", t.position);

    // Turn to face +X; the object swings around with the view
    h.aim(Vec3::new(0.0, 1.6, 0.0), Vec3::X);
    h.tick();
    let t = h.transform(cube).unwrap();
    assert!(t.position.abs_diff_eq(Vec3::new(1.5, 1.2, 0.0), 1e-5), "{:?}", t.position);
    // Front face points back at the viewer
    assert!((t.rotation * Vec3::Z).abs_diff_eq(Vec3::NEG_X, 1e-5));

    // Walking moves the carry anchor
    h.set_body_position(Vec3::new(0.0, 0.0, 4.0));
    h.tick();
    let t = h.transform(cube).unwrap();
    assert!(t.position.abs_diff_eq(Vec3::new(1.5, 1.2, 4.0), 1e-5));
}

#[test]
fn test_carry_closes_menu() {
    let (mut h, cube) = carry_scene();
    h.hover(Some(cube));
    h.set_cursor(320.0, 240.0);
    h.press_and_tick(Action::ShowMenu);

    assert!(h.controller.is_object_menu_showing());
    assert_eq!(h.controller.data().menu_pos_x, 320.0);
    assert_eq!(h.controller.data().menu_pos_y, 240.0);

    assert!(h.carry(cube));
    assert!(!h.controller.is_object_menu_showing());
    assert!(h.controller.is_carrying_object());
}

#[test]
fn test_clear_menu_returns_to_none() {
    let (mut h, cube) = carry_scene();
    h.hover(Some(cube));
    h.press_and_tick(Action::ShowMenu);
    h.clear_menu();
    let snap = h.tick().unwrap();
    assert_eq!(snap.state, CarryState::None);
    assert!(snap.data.active_object.is_none());
}

#[test]
fn test_carry_strips_external_hold_markers() {
    let (mut h, cube) = carry_scene();
    h.world.add_component(cube, ComponentKind::HeldLeftHand);
    h.hold_externally(cube);
    assert!(h.world.has_component(cube, ComponentKind::HeldRemote));

    assert!(h.carry(cube));
    for marker in ComponentKind::HELD_MARKERS {
        assert!(!h.world.has_component(cube, marker));
    }
}

#[test]
fn test_carry_requires_physics_body() {
    let mut h = TestHarness::new();
    let slab = floor(&mut h, 0.0);
    assert!(!h.carry(slab));
    assert_eq!(h.controller.state(), CarryState::None);
    assert!(!h.carry(EntityId::new()));
}

#[test]
fn test_carry_resets_gravity_flag() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.press_and_tick(Action::ToggleGravity);
    assert!(!h.controller.data().apply_gravity);
    h.press_and_tick(Action::Drop);

    start_carry(&mut h, cube);
    assert!(h.controller.data().apply_gravity);
}

#[test]
fn test_drop_with_gravity() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.press_and_tick(Action::Drop);

    assert_eq!(h.controller.state(), CarryState::None);
    assert!(h.controller.data().active_object.is_none());
    assert!(!h.world.pointer_captured);

    let body = h.body(cube).unwrap();
    assert_eq!(body.mode, BodyMode::Dynamic);
    assert!(body.gravity.y < 0.0);
    assert_eq!(body.collision_mask, CollisionMask::DEFAULT_INTERACTABLE);
}

#[test]
fn test_drop_without_gravity() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.press_and_tick(Action::ToggleGravity);
    h.press_and_tick(Action::Drop);

    let body = h.body(cube).unwrap();
    assert_eq!(body.mode, BodyMode::Kinematic);
    assert_eq!(body.gravity, Vec3::ZERO);
    assert_eq!(body.collision_mask, CollisionMask::HANDS_AND_MEDIA_FRAMES);
}

#[test]
fn test_drop_keeps_pointer_when_configured() {
    let mut settings = carry_lib::ControllerSettings::default();
    settings.release_pointer_on_drop = false;
    let mut h = TestHarness::with_settings(settings);
    let cube = unit_cube(&mut h);
    assert!(h.carry(cube));
    h.press_and_tick(Action::Drop);
    assert!(h.world.pointer_captured);
}

#[test]
fn test_drop_while_snapping_is_kinematic() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);
    assert!(h.carry(cube));
    assert!(h.controller.data().apply_gravity);
    h.press_and_tick(Action::ToggleSnap);
    h.tick();
    h.press_and_tick(Action::Drop);

    assert_eq!(h.controller.state(), CarryState::None);
    let body = h.body(cube).unwrap();
    assert_eq!(body.mode, BodyMode::Kinematic);
    assert_eq!(body.gravity, Vec3::ZERO);
    assert_eq!(body.collision_mask, CollisionMask::HANDS_AND_MEDIA_FRAMES);
    assert!(!h.controller.visuals().any_visible());
}

#[test]
fn test_floaty_release_flag() {
    let (mut h, _) = carry_scene();
    let buoy = h.spawn_floaty_object("buoy", Vec3::ONE, Vec3::new(0.0, 0.5, -3.0));

    assert!(h.carry(buoy));
    h.press_and_tick(Action::Drop);
    assert!(h.world.has_component(buoy, ComponentKind::FloatyGravityOnRelease));

    assert!(h.carry(buoy));
    h.press_and_tick(Action::ToggleGravity);
    h.press_and_tick(Action::Drop);
    assert!(!h.world.has_component(buoy, ComponentKind::FloatyGravityOnRelease));
}

#[test]
fn test_non_floaty_gets_no_release_flag() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.press_and_tick(Action::Drop);
    assert!(!h.world.has_component(cube, ComponentKind::FloatyGravityOnRelease));
}

#[test]
fn test_drop_with_nothing_held_is_silent() {
    let (mut h, _) = carry_scene();
    assert!(h.tick().is_none());

    h.controller.drop_object(&mut h.world, true);
    assert!(h.tick().is_none());
    assert!(h.world.body_updates.is_empty());
    assert_eq!(h.controller.state(), CarryState::None);
}

// ── Watchdog ──────────────────────────────────────────────────

#[test]
fn test_watchdog_entity_removed_while_carrying() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.remove(cube);
    let snap = h.tick().unwrap();

    assert_eq!(snap.state, CarryState::None);
    assert!(snap.data.active_object.is_none());
}

#[test]
fn test_watchdog_entity_removed_while_snapping() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);
    assert!(h.carry(cube));
    h.press_and_tick(Action::ToggleSnap);
    h.tick();
    assert!(h.controller.visuals().any_visible());

    h.remove(cube);
    h.tick();
    assert_eq!(h.controller.state(), CarryState::None);
    assert!(h.controller.data().active_object.is_none());
    assert!(!h.controller.visuals().any_visible());
}

#[test]
fn test_watchdog_authority_lost_while_snapping() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);
    assert!(h.carry(cube));
    h.press_and_tick(Action::ToggleSnap);
    h.tick();

    let updates_before = h.world.body_updates.len();
    h.revoke_authority(cube);
    h.tick();

    assert_eq!(h.controller.state(), CarryState::None);
    assert!(h.controller.data().active_object.is_none());
    assert!(!h.controller.visuals().any_visible());
    // Forced reset does not touch the body
    assert_eq!(h.world.body_updates.len(), updates_before);
}

#[test]
fn test_watchdog_catches_refused_claim() {
    let (mut h, cube) = carry_scene();
    h.deny_authority(cube);
    assert!(h.carry(cube));
    assert!(h.controller.is_carrying_object());

    h.tick();
    assert_eq!(h.controller.state(), CarryState::None);
}

#[test]
fn test_watchdog_menu_entity_removed() {
    let (mut h, cube) = carry_scene();
    h.hover(Some(cube));
    h.press_and_tick(Action::ShowMenu);
    h.remove(cube);
    h.tick();
    assert_eq!(h.controller.state(), CarryState::None);
    assert!(h.controller.data().active_object.is_none());
}

#[test]
fn test_menu_does_not_need_authority() {
    let (mut h, cube) = carry_scene();
    h.hover(Some(cube));
    h.press_and_tick(Action::ShowMenu);
    h.revoke_authority(cube);
    h.tick();
    assert!(h.controller.is_object_menu_showing());
}

// ── Pointer capture ───────────────────────────────────────────

#[test]
fn test_pointer_capture_loss_drops_carried_object() {
    let (mut h, cube) = carry_scene();
    start_carry(&mut h, cube);
    h.lose_pointer_capture();
    h.tick();

    assert_eq!(h.controller.state(), CarryState::None);
    assert_eq!(h.body(cube).unwrap().mode, BodyMode::Dynamic);
}

#[test]
fn test_pointer_capture_loss_while_snapping_leaves_object_placed() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);
    assert!(h.carry(cube));
    h.press_and_tick(Action::ToggleSnap);
    h.tick();
    h.lose_pointer_capture();
    h.tick();

    assert_eq!(h.controller.state(), CarryState::None);
    assert_eq!(h.body(cube).unwrap().mode, BodyMode::Kinematic);
}

#[test]
fn test_pointer_capture_loss_is_consumed_once() {
    let (mut h, cube) = carry_scene();
    h.lose_pointer_capture();
    h.tick();
    // A stale loss must not drop a carry started later
    start_carry(&mut h, cube);
    h.tick();
    assert!(h.controller.is_carrying_object());
}

// ── Frame driver ──────────────────────────────────────────────

#[test]
fn test_hover_highlight_only_for_carryables() {
    let mut h = TestHarness::new();
    let slab = floor(&mut h, 0.0);
    let cube = unit_cube(&mut h);

    h.hover(Some(slab));
    h.tick();
    assert!(h.world.highlighted.is_empty());

    h.hover(Some(cube));
    h.tick();
    assert!(h.is_highlighted(cube));
    assert_eq!(
        h.world.highlight_color,
        Some(h.controller.settings().highlight.hover())
    );

    h.hover(None);
    h.tick();
    assert!(h.world.highlighted.is_empty());
}

#[test]
fn test_menu_object_stays_highlighted() {
    let (mut h, cube) = carry_scene();
    h.hover(Some(cube));
    h.press_and_tick(Action::ShowMenu);
    h.hover(None);
    h.tick();
    assert!(h.is_highlighted(cube));
}

#[test]
fn test_fast_path_from_external_hold() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);
    h.hold_externally(cube);
    let before = h.refreshes().len();

    let snap = h.press_and_tick(Action::ToggleSnap).unwrap();
    assert_eq!(snap.state, CarryState::Snapping);
    assert_eq!(snap.data.active_object, Some(cube));
    assert_eq!(snap.data.rotation_offset, 0.0);
    assert_eq!(snap.data.nudge_offset, h.controller.settings().snap.nudge_epsilon);
    assert!(snap.data.snap_face.is_none());

    // One refresh for the whole transition, never a plain carrying one
    assert_eq!(h.refreshes().len(), before + 1);
    assert!(h.refreshes().iter().all(|s| s.state != CarryState::Carrying));
    assert!(!h.world.has_component(cube, ComponentKind::HeldRemote));
}

#[test]
fn test_external_hold_without_toggle_does_nothing() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);
    h.hold_externally(cube);
    h.tick();
    assert_eq!(h.controller.state(), CarryState::None);
}

#[test]
fn test_refresh_only_on_change() {
    let (mut h, cube) = carry_scene();
    assert!(h.tick().is_none());

    start_carry(&mut h, cube);
    assert_eq!(h.refreshes().len(), 1);
    assert_eq!(h.refreshes()[0].state, CarryState::Carrying);

    // Steady carrying changes nothing on the HUD
    assert_eq!(h.ticks(5), 0);
}

#[test]
fn test_none_state_never_has_active_object() {
    let mut h = TestHarness::new();
    let (_, cube) = scene_floor_and_cube(&mut h);

    for step in 0..11 {
        match step {
            0 => h.hover(Some(cube)),
            1 => h.press(Action::ShowMenu),
            2 => h.clear_menu(),
            3 => h.press(Action::Carry),
            4 => h.press(Action::ToggleSnap),
            5 => h.set_axis(InputAxis::Nudge, -1.0),
            6 => h.press(Action::ToggleSnap),
            7 => h.press(Action::Drop),
            8 => h.press(Action::Carry),
            9 => h.revoke_authority(cube),
            _ => h.press(Action::Carry),
        }
        h.tick();
        if h.controller.state() == CarryState::None {
            assert!(h.controller.data().active_object.is_none());
        }
    }
    for snap in h.refreshes() {
        if snap.state == CarryState::None {
            assert!(snap.data.active_object.is_none());
        }
    }
}
