//! GUI module for Pole Overlay.
//!
//! Provides a control panel using Iced; the tracking loop runs on its own thread.

pub mod app;
pub mod logger;

pub use app::PoleOverlayApp;
pub use logger::{LogEntry, LogLevel, Logger};
