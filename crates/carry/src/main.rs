use carry_lib::command::{execute_command, execute_json_batch, SimCommand};
use carry_lib::harness::TestHarness;
use carry_lib::ports::{Action, InputAxis};
use carry_lib::{ControllerSettings, Transform};
use glam::Vec3;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carry_sim=info,carry_lib=info".into()),
        )
        .init();

    let mut harness = TestHarness::with_settings(ControllerSettings::load());

    match parse_script_arg() {
        Some(path) => run_script(&mut harness, &path),
        None => run_demo(&mut harness),
    }
}

fn parse_script_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--script" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn run_script(harness: &mut TestHarness, path: &str) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read script file {path}: {e}");
            return;
        }
    };

    match execute_json_batch(harness, &json) {
        Ok(responses) => {
            tracing::info!("Ran {} commands from {path}", responses.len());
            for (i, resp) in responses.iter().enumerate() {
                match serde_json::to_string(resp) {
                    Ok(line) if resp.success => tracing::info!("[{i}] {line}"),
                    Ok(line) => tracing::warn!("[{i}] {line}"),
                    Err(e) => tracing::error!("[{i}] unserializable response: {e}"),
                }
            }
        }
        Err(e) => tracing::error!("{e}"),
    }
}

/// Carry a cube, snap it to the floor with a quarter turn, and leave it there.
fn run_demo(harness: &mut TestHarness) {
    harness.spawn_surface(
        "floor",
        Vec3::new(20.0, 0.1, 20.0),
        Transform::from_position(Vec3::new(0.0, -0.05, 0.0)),
    );
    let cube = harness.spawn_object("cube", Vec3::splat(0.5), Vec3::new(1.0, 0.25, -2.0));
    harness.aim(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, -0.6, -1.0));

    harness.hover(Some(cube));
    harness.press_and_tick(Action::Carry);
    harness.hover(None);
    harness.ticks(10);

    harness.press_and_tick(Action::ToggleSnap);
    harness.set_axis(InputAxis::RotateCcw, 1.0);
    // A quarter turn at four turns per second
    harness.tick_dt(1.0 / 16.0);
    harness.set_axis(InputAxis::RotateCcw, 0.0);
    harness.ticks(5);

    harness.press_and_tick(Action::Drop);

    let resp = execute_command(harness, SimCommand::Inspect);
    match serde_json::to_string_pretty(&resp) {
        Ok(json) => tracing::info!("Final state:\n{json}"),
        Err(e) => tracing::error!("Failed to serialize state: {e}"),
    }
    tracing::info!("{} UI refreshes emitted", harness.refreshes().len());
}
