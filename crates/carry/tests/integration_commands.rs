//! Integration tests for the JSON command protocol.

use carry_lib::command::{execute_json, execute_json_batch};
use carry_lib::harness::TestHarness;
use carry_lib::CarryState;

#[test]
fn test_scripted_snap_session() {
    let mut h = TestHarness::new();
    let script = r#"[
        {"command": "spawn_surface", "name": "floor", "size": [20, 0.1, 20], "position": [0, -0.05, 0]},
        {"command": "spawn_object", "name": "crate", "size": [1, 1, 1], "position": [3, 0.5, 3]},
        {"command": "aim", "origin": [0, 3, 0], "direction": [0, -1, 0]},
        {"command": "hover", "target": "crate"},
        {"command": "press", "action": "carry"},
        {"command": "tick"},
        {"command": "hover"},
        {"command": "press", "action": "toggle_snap"},
        {"command": "tick", "frames": 2},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, script).unwrap();
    assert_eq!(responses.len(), 10);
    assert!(responses.iter().all(|r| r.success), "{:?}", responses);

    assert_eq!(responses[5].data.as_ref().unwrap()["state"], "carrying");
    let ticked = responses[8].data.as_ref().unwrap();
    assert_eq!(ticked["frame"], 3);
    assert_eq!(ticked["state"], "snapping");

    let inspect = responses[9].data.as_ref().unwrap();
    assert_eq!(inspect["snapshot"]["state"], "snapping");
    assert_eq!(inspect["active"]["name"], "crate");
    assert_eq!(inspect["grid_visible"], true);
    let y = inspect["active"]["position"][1].as_f64().unwrap();
    assert!((y - 0.501).abs() < 1e-4);

    assert_eq!(h.controller.state(), CarryState::Snapping);
}

#[test]
fn test_spawn_returns_id() {
    let mut h = TestHarness::new();
    let resp = execute_json(
        &mut h,
        r#"{"command": "spawn_object", "name": "buoy", "size": [1, 1, 1], "position": [0, 0, 0], "floaty": true}"#,
    )
    .unwrap();
    assert!(resp.success);
    let id = resp.data.unwrap()["id"].as_str().unwrap().to_string();

    let resp = execute_json(&mut h, &format!(r#"{{"command": "carry", "target": "{id}"}}"#)).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["carried"], true);
    assert!(h.controller.is_carrying_object());
}

#[test]
fn test_unknown_name_fails_softly() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "carry", "target": "ghost"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("ghost"));
}

#[test]
fn test_zero_aim_direction_rejected() {
    let mut h = TestHarness::new();
    let resp = execute_json(
        &mut h,
        r#"{"command": "aim", "origin": [0, 0, 0], "direction": [0, 0, 0]}"#,
    )
    .unwrap();
    assert!(!resp.success);
}

#[test]
fn test_invalid_json_is_an_error() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h, "{not json").is_err());
    assert!(execute_json(&mut h, r#"{"command": "teleport"}"#).is_err());
    assert!(execute_json_batch(&mut h, r#"{"command": "inspect"}"#).is_err());
}

#[test]
fn test_watchdog_via_commands() {
    let mut h = TestHarness::new();
    let script = r#"[
        {"command": "spawn_object", "name": "crate", "size": [1, 1, 1], "position": [0, 0.5, -3]},
        {"command": "carry", "target": "crate"},
        {"command": "revoke_authority", "target": "crate"},
        {"command": "tick"}
    ]"#;
    let responses = execute_json_batch(&mut h, script).unwrap();
    let ticked = responses[3].data.as_ref().unwrap();
    assert_eq!(ticked["state"], "none");
    assert_eq!(ticked["refreshes"], 1);
}

#[test]
fn test_menu_commands() {
    let mut h = TestHarness::new();
    let script = r#"[
        {"command": "spawn_object", "name": "crate", "size": [1, 1, 1], "position": [0, 0.5, -3]},
        {"command": "show_menu", "target": "crate", "x": 100, "y": 50},
        {"command": "tick"},
        {"command": "clear_menu"},
        {"command": "tick"}
    ]"#;
    let responses = execute_json_batch(&mut h, script).unwrap();
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[2].data.as_ref().unwrap()["state"], "menu");
    assert_eq!(responses[4].data.as_ref().unwrap()["state"], "none");
    assert_eq!(h.controller.data().menu_pos_x, 100.0);
}
