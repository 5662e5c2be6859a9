//! Overlay module: the render sink seam and pole-half markers.

mod pole;
mod sink;

pub use pole::{rgb_to_normalized, PoleHalf, POLE_CURVATURE};
pub use sink::{OverlayError, OverlayHandle, OverlaySink, OverlayState, RecordingOverlay};
