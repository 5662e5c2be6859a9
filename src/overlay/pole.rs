//! Pole-half markers backed by overlay handles.

use std::path::Path;

use crate::calibration::Calibration;
use crate::tracking::MarkerSpec;
use crate::vr::{Affine3x4, TrackingOrigin};

use super::sink::{OverlayError, OverlayHandle, OverlaySink};

/// Curvature applied to every pole half so it wraps around the pole axis.
pub const POLE_CURVATURE: f32 = 1.0;

/// Convert an 8-bit colour to the sink's `[0, 1]` range, rounded to one decimal.
pub fn rgb_to_normalized(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|channel| (f32::from(channel) / 255.0 * 10.0).round() / 10.0)
}

/// One visible half of the pole.
#[derive(Debug, Clone)]
pub struct PoleHalf {
    spec: MarkerSpec,
    handle: OverlayHandle,
}

impl PoleHalf {
    /// Create the overlay, style it from `calibration` and show it.
    pub fn create<S: OverlaySink + ?Sized>(
        sink: &mut S,
        spec: MarkerSpec,
        calibration: &Calibration,
        texture: &Path,
    ) -> Result<Self, OverlayError> {
        let handle = sink.create_overlay(&spec.key, &spec.name)?;
        let half = Self { spec, handle };

        sink.set_image(handle, texture)?;
        half.apply_style(sink, calibration)?;
        sink.set_curvature(handle, POLE_CURVATURE)?;
        sink.show(handle)?;

        tracing::debug!("Created pole half {} ({:?})", half.spec.key, half.spec.direction);
        Ok(half)
    }

    /// Push colour, transparency and width from `calibration`.
    pub fn apply_style<S: OverlaySink + ?Sized>(
        &self,
        sink: &mut S,
        calibration: &Calibration,
    ) -> Result<(), OverlayError> {
        sink.set_color(self.handle, rgb_to_normalized(calibration.color))?;
        sink.set_alpha(self.handle, calibration.transparency.clamp(0.0, 1.0) as f32)?;
        sink.set_width_meters(self.handle, calibration.size as f32)
    }

    /// Place the half in standing tracking space.
    pub fn set_position<S: OverlaySink + ?Sized>(
        &self,
        sink: &mut S,
        transform: &Affine3x4,
    ) -> Result<(), OverlayError> {
        sink.set_transform_absolute(self.handle, TrackingOrigin::Standing, transform)
    }

    pub fn spec(&self) -> &MarkerSpec {
        &self.spec
    }

    pub fn handle(&self) -> OverlayHandle {
        self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::RecordingOverlay;
    use crate::tracking::Direction;

    #[test]
    fn test_rgb_to_normalized_rounds() {
        assert_eq!(rgb_to_normalized([130, 80, 230]), [0.5, 0.3, 0.9]);
        assert_eq!(rgb_to_normalized([255, 255, 0]), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_create_styles_and_shows() {
        let recorder = RecordingOverlay::new();
        let mut sink = recorder.clone();
        let calibration = Calibration {
            transparency: 0.6,
            size: 0.06,
            color: [255, 255, 255],
            ..Calibration::default()
        };
        let spec = MarkerSpec::new(Direction::Right, "pole.1", "Pole right");

        let half = PoleHalf::create(&mut sink, spec, &calibration, Path::new("texture.png")).unwrap();

        let state = recorder.overlay("pole.1").unwrap();
        assert_eq!(state.name, "Pole right");
        assert_eq!(state.image.as_deref(), Some(Path::new("texture.png")));
        assert_eq!(state.color, [1.0, 1.0, 1.0]);
        assert!((state.alpha - 0.6).abs() < 1e-6);
        assert!((state.width_meters - 0.06).abs() < 1e-6);
        assert_eq!(state.curvature, POLE_CURVATURE);
        assert!(state.visible);
        assert!(state.transform.is_none());
        assert_eq!(half.spec().direction, Direction::Right);
    }
}
