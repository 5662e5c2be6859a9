//! Pole Overlay - headless tracking loop
//!
//! Runs the tracking loop against the simulated room and reads control
//! commands from stdin.
//! Run with: cargo run --bin pole-overlay

use std::sync::Arc;

use pole_overlay::{
    Axis, LoopHandle, MarkerLayout, Offset, RecordingOverlay, SharedKey, SimulatedRuntime,
    TrackerConfig, TrackingSession, TriggerConfig, Variant, VrRuntime,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrackerConfig::from_env();
    let store = config.calibration_store()?;

    println!("Pole Overlay");
    println!("================================================");
    println!("Variant: {}", describe_variant(config.variant));
    println!(
        "Layout: {}",
        match config.layout {
            MarkerLayout::Pair => "pair (right, left)",
            MarkerLayout::Quad => "quad (right, left, front, back)",
        }
    );
    println!("Update rate: {} Hz", config.update_rate_hz);
    println!("Texture: {}", config.texture_path.display());
    println!("Calibration: {}", store.path().display());
    println!("Trigger: {:?}", config.trigger);
    println!("================================================\n");

    let runtime = SimulatedRuntime::demo_room();
    let key = SharedKey::new();
    let session = TrackingSession::new(runtime.clone(), RecordingOverlay::new(), store, &config)?
        .with_key_source(Arc::new(key.clone()));

    match session.binding() {
        Some(device) => println!("Bound to {}", device),
        None => println!("No matching device found, use 'rebind' once it is connected"),
    }

    let handle = session.handle();
    let worker = tokio::spawn(session.run());

    println!("Commands: status, devices, resume, hold, release, offset <x> <y> <z>,");
    println!("          nudge <x|y|z> <delta>, rebind, quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        if let Err(e) = run_command(input, &handle, &key, &runtime, config.trigger) {
            eprintln!("Error: {}", e);
        }
        if !handle.is_running() {
            eprintln!("Tracking loop stopped");
            break;
        }
    }

    handle.stop();
    worker.await??;
    println!("Goodbye!");
    Ok(())
}

fn run_command(
    input: &str,
    handle: &LoopHandle,
    key: &SharedKey,
    runtime: &SimulatedRuntime,
    trigger: TriggerConfig,
) -> anyhow::Result<()> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.as_slice() {
        ["status"] => print_status(handle),
        ["devices"] => {
            for device in runtime.enumerate_devices()? {
                println!("  {}", device);
            }
        }
        ["resume"] => handle.resume(),
        ["hold"] | ["release"] => {
            if trigger != TriggerConfig::Key {
                println!("Key trigger is not enabled (set POLE_TRIGGER=key)");
            }
            key.set_held(parts[0] == "hold");
        }
        ["offset", x, y, z] => {
            let offset = Offset::new(x.parse()?, y.parse()?, z.parse()?);
            handle.update_offset(offset)?;
        }
        ["nudge", axis, delta] => {
            let axis: Axis = axis.parse().map_err(anyhow::Error::msg)?;
            handle.nudge(axis, delta.parse()?)?;
        }
        ["rebind"] => handle.rebind()?,
        _ => println!("Unknown command: {}", input),
    }
    Ok(())
}

fn print_status(handle: &LoopHandle) {
    let calibration = handle.calibration();
    let offset = calibration.offset();
    println!("  Mode: {}", handle.mode());
    match handle.binding() {
        Some(device) => println!("  Device: {}", device),
        None => println!("  Device: none"),
    }
    println!(
        "  Offset: x={:.4} y={:.4} z={:.4}",
        offset.x, offset.y, offset.z
    );
    println!(
        "  Height: {}  Size: {}  Alpha: {}",
        calibration.height, calibration.size, calibration.transparency
    );
}

fn describe_variant(variant: Variant) -> String {
    match variant {
        Variant::BaseStation => "base station".to_string(),
        Variant::Controller(role) => format!("controller ({:?})", role),
    }
}
