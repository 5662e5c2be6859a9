//! GUI entry point for Pole Overlay.
//!
//! Run with: cargo run --bin pole-overlay-gui

use std::sync::Arc;

use iced::Size;
use tracing_subscriber::EnvFilter;

use pole_overlay::gui::PoleOverlayApp;
use pole_overlay::{
    RecordingOverlay, SharedKey, SimulatedRuntime, TrackerConfig, TrackingSession,
};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrackerConfig::from_env();
    let store = config.calibration_store()?;
    let trigger_key = SharedKey::new();
    let session = TrackingSession::new(
        SimulatedRuntime::demo_room(),
        RecordingOverlay::new(),
        store,
        &config,
    )?
    .with_key_source(Arc::new(trigger_key.clone()));
    let (handle, worker) = session.spawn()?;
    let app_handle = handle.clone();

    iced::application(PoleOverlayApp::title, PoleOverlayApp::update, PoleOverlayApp::view)
        .subscription(PoleOverlayApp::subscription)
        .theme(PoleOverlayApp::theme)
        .window_size(Size::new(520.0, 640.0))
        .run_with(move || (PoleOverlayApp::new(app_handle, trigger_key), iced::Task::none()))?;

    handle.stop();
    match worker.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("tracking thread panicked"),
    }
    Ok(())
}
