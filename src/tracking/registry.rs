//! Device discovery and binding.

use crate::calibration::{Calibration, CalibrationStore};
use crate::vr::{ControllerRole, DeviceClass, TrackedDevice, VrError, VrRuntime};

/// Class and role a binding must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceQuery {
    pub class: DeviceClass,
    /// Only checked when `class` is a controller; `None` accepts either hand.
    pub role: ControllerRole,
}

impl DeviceQuery {
    pub fn new(class: DeviceClass) -> Self {
        Self {
            class,
            role: ControllerRole::None,
        }
    }

    pub fn with_role(mut self, role: ControllerRole) -> Self {
        self.role = role;
        self
    }

    pub fn matches(&self, device: &TrackedDevice) -> bool {
        if device.class != self.class {
            return false;
        }
        if self.class != DeviceClass::Controller || self.role == ControllerRole::None {
            return true;
        }
        device.role == self.role
    }
}

/// Pick the device to bind.
///
/// With a persisted serial only that device qualifies; otherwise the first match in
/// enumeration order wins.
pub fn discover<'a>(
    devices: &'a [TrackedDevice],
    query: &DeviceQuery,
    persisted_serial: &str,
) -> Option<&'a TrackedDevice> {
    devices
        .iter()
        .filter(|device| query.matches(device))
        .find(|device| persisted_serial.is_empty() || device.serial == persisted_serial)
}

/// Holds at most one binding for the session.
///
/// A binding only changes through [`DeviceRegistry::rebind`]; a device that
/// disconnects stays bound and simply stops producing valid poses.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    query: DeviceQuery,
    binding: Option<TrackedDevice>,
}

impl DeviceRegistry {
    pub fn new(query: DeviceQuery) -> Self {
        Self {
            query,
            binding: None,
        }
    }

    pub fn query(&self) -> &DeviceQuery {
        &self.query
    }

    pub fn binding(&self) -> Option<&TrackedDevice> {
        self.binding.as_ref()
    }

    /// Bind a device if none is bound yet.
    ///
    /// When `calibration` has no serial, the newly bound serial is written into it
    /// and persisted through `store`. A failed save is logged, not returned.
    pub fn bind<R: VrRuntime + ?Sized>(
        &mut self,
        runtime: &R,
        calibration: &mut Calibration,
        store: &CalibrationStore,
    ) -> Result<Option<&TrackedDevice>, VrError> {
        if self.binding.is_some() {
            return Ok(self.binding.as_ref());
        }

        let devices = runtime.enumerate_devices()?;
        let Some(device) = discover(&devices, &self.query, &calibration.bound_serial) else {
            if calibration.is_bound() {
                tracing::warn!(
                    "Device {} ({:?}) not connected",
                    calibration.bound_serial,
                    self.query.class
                );
            } else {
                tracing::warn!("No {:?} device found", self.query.class);
            }
            return Ok(None);
        };

        if !calibration.is_bound() {
            calibration.bound_serial = device.serial.clone();
            tracing::info!("Remembering {} for future sessions", device.serial);
            if let Err(e) = store.save(calibration) {
                tracing::error!("Failed to persist bound serial: {}", e);
            }
        }

        tracing::info!("Bound to {}", device);
        self.binding = Some(device.clone());
        Ok(self.binding.as_ref())
    }

    /// Drop the current binding and discover again.
    pub fn rebind<R: VrRuntime + ?Sized>(
        &mut self,
        runtime: &R,
        calibration: &mut Calibration,
        store: &CalibrationStore,
    ) -> Result<Option<&TrackedDevice>, VrError> {
        if let Some(previous) = self.binding.take() {
            tracing::info!("Releasing {}", previous);
        }
        self.bind(runtime, calibration, store)
    }
}
