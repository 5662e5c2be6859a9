//! Errors from the tracking loop and its handle.

use thiserror::Error;

use crate::calibration::CalibrationError;
use crate::overlay::OverlayError;
use crate::vr::VrError;

/// Fatal session errors.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("VR runtime error: {0}")]
    Vr(#[from] VrError),
    #[error("Overlay error: {0}")]
    Overlay(#[from] OverlayError),
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("Failed to start tracking worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// Errors talking to a running loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    #[error("Channel closed")]
    ChannelClosed,
    #[error("Command queue full")]
    ChannelFull,
    #[error("Offset must be finite")]
    NonFiniteOffset,
}
