//! Fresh pose sampling for the bound device.

use crate::vr::{Affine3x4, TrackedDevice, TrackingOrigin, VrError, VrRuntime, MAX_TRACKED_DEVICES};

/// Samples the bound device's pose once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseSampler {
    origin: TrackingOrigin,
    predicted_seconds: f32,
}

impl PoseSampler {
    pub fn new(origin: TrackingOrigin, predicted_seconds: f32) -> Self {
        Self {
            origin,
            predicted_seconds,
        }
    }

    /// The device's current transform, or `None` if the runtime marks it invalid.
    pub fn sample<R: VrRuntime + ?Sized>(
        &self,
        runtime: &R,
        device: &TrackedDevice,
    ) -> Result<Option<Affine3x4>, VrError> {
        let poses = runtime.poses(self.origin, self.predicted_seconds, MAX_TRACKED_DEVICES)?;
        Ok(poses
            .get(device.index as usize)
            .filter(|pose| pose.valid)
            .map(|pose| pose.transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vr::{DeviceClass, SimulatedRuntime};

    #[test]
    fn test_sample_valid_and_invalid() {
        let runtime = SimulatedRuntime::new();
        let station = TrackedDevice::new(2, "LHB-A", DeviceClass::TrackingReference);
        runtime.add_device(station.clone(), Affine3x4::from_translation(0.0, 2.5, -1.0));
        let sampler = PoseSampler::default();

        let pose = sampler.sample(&runtime, &station).unwrap().unwrap();
        assert_eq!(pose.translation(), [0.0, 2.5, -1.0]);

        runtime.invalidate_pose(2);
        assert!(sampler.sample(&runtime, &station).unwrap().is_none());
    }

    #[test]
    fn test_sample_disconnected_device() {
        let runtime = SimulatedRuntime::new();
        let station = TrackedDevice::new(2, "LHB-A", DeviceClass::TrackingReference);
        runtime.add_device(station.clone(), Affine3x4::identity());
        runtime.set_connected(2, false);

        assert!(PoseSampler::default().sample(&runtime, &station).unwrap().is_none());
    }
}
