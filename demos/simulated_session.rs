//! Drive a tracking session tick by tick against the simulated room.

use std::sync::Arc;

use pole_overlay::{
    Affine3x4, Axis, CalibrationStore, MarkerLayout, RecordingOverlay, SharedKey,
    SimulatedRuntime, TrackerConfig, TrackingSession, TriggerConfig,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let store = CalibrationStore::new(std::env::temp_dir().join("pole-overlay-demo.json"));
    let config = TrackerConfig::default()
        .with_layout(MarkerLayout::Quad)
        .with_trigger(TriggerConfig::Key);

    let runtime = SimulatedRuntime::demo_room();
    let overlay = RecordingOverlay::new();
    let key = SharedKey::new();
    let mut session = TrackingSession::new(runtime.clone(), overlay.clone(), store, &config)?
        .with_key_source(Arc::new(key.clone()));
    let handle = session.handle();

    if let Some(device) = session.binding() {
        println!("Bound to {}", device);
    }
    let keys: Vec<String> = session
        .markers()
        .iter()
        .map(|marker| marker.spec().key.clone())
        .collect();

    // Walk the base station around while the loop follows it.
    for step in 0..4 {
        let yaw = step as f32 * std::f32::consts::FRAC_PI_4;
        runtime.set_pose(1, Affine3x4::from_yaw(yaw, [1.5, 2.2, -1.0]));
        let outcome = session.tick()?;
        println!("tick {}: {:?}", step, outcome);
        for marker_key in &keys {
            if let Some(transform) = overlay.transform(marker_key) {
                println!("  {} at {:?}", marker_key, transform.translation());
            }
        }
    }

    handle.nudge(Axis::Y, -0.05)?;
    println!("after nudge: {:?}", session.tick()?);
    println!("offset now {:?}", session.calibration().offset());

    key.set_held(true);
    println!("key held: {:?}", session.tick()?);
    runtime.set_pose(1, Affine3x4::from_translation(0.0, 0.0, 0.0));
    println!("while idle: {:?}", session.tick()?);

    key.set_held(false);
    handle.resume();
    println!("resumed: {:?}", session.tick()?);
    println!("{} transform updates pushed", overlay.transform_updates());

    Ok(())
}

