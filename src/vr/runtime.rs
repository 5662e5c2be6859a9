//! The VR runtime seam.

use thiserror::Error;

use super::types::{
    ControllerRole, ControllerState, DeviceClass, Pose, TrackedDevice, TrackingOrigin,
    MAX_TRACKED_DEVICES, PROP_CONTROLLER_ROLE_HINT_INT32, PROP_SERIAL_NUMBER_STRING,
};

/// VR runtime errors.
#[derive(Error, Debug)]
pub enum VrError {
    #[error("Runtime not initialized")]
    NotInitialized,
    #[error("Device index {0} out of range")]
    InvalidIndex(u32),
    #[error("Property {prop} unavailable on device {index}")]
    PropertyUnavailable { index: u32, prop: u32 },
    #[error("Runtime call failed: {0}")]
    CallFailed(String),
}

/// Calls consumed from the VR runtime.
///
/// Implementations are synchronous and not reentrant; the tracking loop owns its
/// runtime and only ever calls it from one thread.
pub trait VrRuntime {
    fn is_connected(&self, index: u32) -> Result<bool, VrError>;

    fn device_class(&self, index: u32) -> Result<DeviceClass, VrError>;

    fn string_property(&self, index: u32, prop: u32) -> Result<String, VrError>;

    fn int32_property(&self, index: u32, prop: u32) -> Result<i32, VrError>;

    /// Poses for the first `count` device slots, indexed by device index.
    fn poses(
        &self,
        origin: TrackingOrigin,
        predicted_seconds_from_now: f32,
        count: u32,
    ) -> Result<Vec<Pose>, VrError>;

    /// Analog state of a controller, `None` when the runtime has nothing for `index`.
    fn controller_state(&self, index: u32) -> Result<Option<ControllerState>, VrError>;

    /// Every connected device with its serial, class and role hint.
    fn enumerate_devices(&self) -> Result<Vec<TrackedDevice>, VrError> {
        let mut devices = Vec::new();

        for index in 0..MAX_TRACKED_DEVICES {
            if !self.is_connected(index)? {
                continue;
            }

            let class = self.device_class(index)?;
            let serial = self.string_property(index, PROP_SERIAL_NUMBER_STRING)?;
            let role = if class == DeviceClass::Controller {
                // Not every driver reports a role hint.
                self.int32_property(index, PROP_CONTROLLER_ROLE_HINT_INT32)
                    .map(ControllerRole::from)
                    .unwrap_or_default()
            } else {
                ControllerRole::None
            };

            devices.push(TrackedDevice {
                index,
                serial,
                class,
                role,
            });
        }

        Ok(devices)
    }
}

impl<T: VrRuntime + ?Sized> VrRuntime for Box<T> {
    fn is_connected(&self, index: u32) -> Result<bool, VrError> {
        (**self).is_connected(index)
    }

    fn device_class(&self, index: u32) -> Result<DeviceClass, VrError> {
        (**self).device_class(index)
    }

    fn string_property(&self, index: u32, prop: u32) -> Result<String, VrError> {
        (**self).string_property(index, prop)
    }

    fn int32_property(&self, index: u32, prop: u32) -> Result<i32, VrError> {
        (**self).int32_property(index, prop)
    }

    fn poses(
        &self,
        origin: TrackingOrigin,
        predicted_seconds_from_now: f32,
        count: u32,
    ) -> Result<Vec<Pose>, VrError> {
        (**self).poses(origin, predicted_seconds_from_now, count)
    }

    fn controller_state(&self, index: u32) -> Result<Option<ControllerState>, VrError> {
        (**self).controller_state(index)
    }

    fn enumerate_devices(&self) -> Result<Vec<TrackedDevice>, VrError> {
        (**self).enumerate_devices()
    }
}
