//! The overlay sink seam and an in-memory recorder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::vr::{Affine3x4, TrackingOrigin};

/// Opaque handle returned by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(pub u64);

/// Overlay sink errors.
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Overlay key already in use: {0}")]
    KeyInUse(String),
    #[error("Unknown overlay handle: {0:?}")]
    UnknownHandle(OverlayHandle),
    #[error("Overlay call failed: {0}")]
    CallFailed(String),
}

/// Calls consumed from the overlay renderer.
pub trait OverlaySink {
    fn create_overlay(&mut self, key: &str, name: &str) -> Result<OverlayHandle, OverlayError>;

    fn set_image(&mut self, handle: OverlayHandle, path: &Path) -> Result<(), OverlayError>;

    /// Tint, each channel in `[0, 1]`.
    fn set_color(&mut self, handle: OverlayHandle, rgb: [f32; 3]) -> Result<(), OverlayError>;

    fn set_alpha(&mut self, handle: OverlayHandle, alpha: f32) -> Result<(), OverlayError>;

    fn set_width_meters(&mut self, handle: OverlayHandle, meters: f32) -> Result<(), OverlayError>;

    fn set_curvature(&mut self, handle: OverlayHandle, curvature: f32) -> Result<(), OverlayError>;

    fn show(&mut self, handle: OverlayHandle) -> Result<(), OverlayError>;

    fn set_transform_absolute(
        &mut self,
        handle: OverlayHandle,
        origin: TrackingOrigin,
        transform: &Affine3x4,
    ) -> Result<(), OverlayError>;
}

/// Last known state of one recorded overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayState {
    pub key: String,
    pub name: String,
    pub image: Option<PathBuf>,
    pub color: [f32; 3],
    pub alpha: f32,
    pub width_meters: f32,
    pub curvature: f32,
    pub visible: bool,
    pub transform: Option<Affine3x4>,
    pub transform_updates: usize,
}

#[derive(Debug, Default)]
struct Recorded {
    next_handle: u64,
    overlays: HashMap<OverlayHandle, OverlayState>,
}

/// Sink that records every call instead of rendering.
///
/// Clones share state so the recorder can be inspected while a session owns it.
#[derive(Debug, Clone, Default)]
pub struct RecordingOverlay {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(
        &self,
        handle: OverlayHandle,
        f: impl FnOnce(&mut OverlayState),
    ) -> Result<(), OverlayError> {
        let mut recorded = self.lock();
        let state = recorded
            .overlays
            .get_mut(&handle)
            .ok_or(OverlayError::UnknownHandle(handle))?;
        f(state);
        Ok(())
    }

    /// State of the overlay created with `key`.
    pub fn overlay(&self, key: &str) -> Option<OverlayState> {
        self.lock()
            .overlays
            .values()
            .find(|state| state.key == key)
            .cloned()
    }

    /// Last transform pushed to the overlay created with `key`.
    pub fn transform(&self, key: &str) -> Option<Affine3x4> {
        self.overlay(key).and_then(|state| state.transform)
    }

    /// Total transform pushes across all overlays.
    pub fn transform_updates(&self) -> usize {
        self.lock()
            .overlays
            .values()
            .map(|state| state.transform_updates)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.lock().overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OverlaySink for RecordingOverlay {
    fn create_overlay(&mut self, key: &str, name: &str) -> Result<OverlayHandle, OverlayError> {
        let mut recorded = self.lock();
        if recorded.overlays.values().any(|state| state.key == key) {
            return Err(OverlayError::KeyInUse(key.to_string()));
        }

        recorded.next_handle += 1;
        let handle = OverlayHandle(recorded.next_handle);
        recorded.overlays.insert(
            handle,
            OverlayState {
                key: key.to_string(),
                name: name.to_string(),
                alpha: 1.0,
                ..OverlayState::default()
            },
        );
        Ok(handle)
    }

    fn set_image(&mut self, handle: OverlayHandle, path: &Path) -> Result<(), OverlayError> {
        self.update(handle, |state| state.image = Some(path.to_path_buf()))
    }

    fn set_color(&mut self, handle: OverlayHandle, rgb: [f32; 3]) -> Result<(), OverlayError> {
        self.update(handle, |state| state.color = rgb)
    }

    fn set_alpha(&mut self, handle: OverlayHandle, alpha: f32) -> Result<(), OverlayError> {
        self.update(handle, |state| state.alpha = alpha)
    }

    fn set_width_meters(&mut self, handle: OverlayHandle, meters: f32) -> Result<(), OverlayError> {
        self.update(handle, |state| state.width_meters = meters)
    }

    fn set_curvature(&mut self, handle: OverlayHandle, curvature: f32) -> Result<(), OverlayError> {
        self.update(handle, |state| state.curvature = curvature)
    }

    fn show(&mut self, handle: OverlayHandle) -> Result<(), OverlayError> {
        self.update(handle, |state| state.visible = true)
    }

    fn set_transform_absolute(
        &mut self,
        handle: OverlayHandle,
        _origin: TrackingOrigin,
        transform: &Affine3x4,
    ) -> Result<(), OverlayError> {
        self.update(handle, |state| {
            state.transform = Some(*transform);
            state.transform_updates += 1;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_rejected() {
        let mut sink = RecordingOverlay::new();
        sink.create_overlay("1", "1").unwrap();
        assert!(matches!(
            sink.create_overlay("1", "other"),
            Err(OverlayError::KeyInUse(_))
        ));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_unknown_handle() {
        let mut sink = RecordingOverlay::new();
        assert!(matches!(
            sink.show(OverlayHandle(99)),
            Err(OverlayError::UnknownHandle(OverlayHandle(99)))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let recorder = RecordingOverlay::new();
        let mut sink = recorder.clone();
        let handle = sink.create_overlay("pole", "Pole").unwrap();
        sink.set_transform_absolute(
            handle,
            TrackingOrigin::Standing,
            &Affine3x4::from_translation(1.0, 0.0, 0.0),
        )
        .unwrap();

        assert_eq!(
            recorder.transform("pole").map(|t| t.translation()),
            Some([1.0, 0.0, 0.0])
        );
        assert_eq!(recorder.transform_updates(), 1);
    }
}
