//! Configuration module for Pole Overlay.

mod options;

use std::path::PathBuf;

pub use options::{
    MarkerLayout, TrackerConfig, TriggerConfig, Variant, DEFAULT_TRIGGER_AXIS,
    DEFAULT_TRIGGER_THRESHOLD, DEFAULT_UPDATE_RATE_HZ,
};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "pole-overlay", "pole-overlay")
}

/// Platform config directory holding the calibration file.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Platform data directory for session logs.
pub fn logs_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("logs"))
}
