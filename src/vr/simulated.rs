//! In-memory VR runtime.
//!
//! Stands in for a native runtime in tests, the demo and both binaries. Clones share
//! state, so a test can keep one handle to move devices around while the tracking
//! loop owns another.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::matrix::Affine3x4;
use super::runtime::{VrError, VrRuntime};
use super::types::{
    ControllerAxis, ControllerRole, ControllerState, DeviceClass, Pose, TrackedDevice,
    TrackingOrigin, CONTROLLER_AXIS_COUNT, MAX_TRACKED_DEVICES, PROP_CONTROLLER_ROLE_HINT_INT32,
    PROP_SERIAL_NUMBER_STRING,
};

#[derive(Debug, Clone)]
struct SimDevice {
    device: TrackedDevice,
    connected: bool,
    pose: Pose,
    controller: ControllerState,
}

#[derive(Debug, Default)]
struct SimState {
    slots: Vec<Option<SimDevice>>,
}

/// Clonable in-memory runtime.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRuntime {
    state: Arc<Mutex<SimState>>,
    pose_queries: Arc<AtomicUsize>,
}

impl SimulatedRuntime {
    /// Create a runtime with no devices.
    pub fn new() -> Self {
        Self::default()
    }

    /// A small room: headset, one base station on a stand and both controllers.
    pub fn demo_room() -> Self {
        let runtime = Self::new();
        runtime
            .add_device(
                TrackedDevice::new(0, "HMD-SIM", DeviceClass::Hmd),
                Affine3x4::from_translation(0.0, 1.7, 0.0),
            )
            .add_device(
                TrackedDevice::new(1, "LHB-SIM0001", DeviceClass::TrackingReference),
                Affine3x4::from_yaw(0.5, [1.5, 2.2, -1.0]),
            )
            .add_device(
                TrackedDevice::new(3, "CTRL-SIM-L", DeviceClass::Controller)
                    .with_role(ControllerRole::LeftHand),
                Affine3x4::from_translation(-0.3, 1.1, -0.3),
            )
            .add_device(
                TrackedDevice::new(4, "CTRL-SIM-R", DeviceClass::Controller)
                    .with_role(ControllerRole::RightHand),
                Affine3x4::from_translation(0.3, 1.1, -0.3),
            );
        runtime
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_index(index: u32) -> Result<usize, VrError> {
        if index < MAX_TRACKED_DEVICES {
            Ok(index as usize)
        } else {
            Err(VrError::InvalidIndex(index))
        }
    }

    /// Connect a device at `device.index` with a valid pose.
    pub fn add_device(&self, device: TrackedDevice, transform: Affine3x4) -> &Self {
        let slot = device.index as usize;
        let mut state = self.lock();
        if state.slots.len() <= slot {
            state.slots.resize(slot + 1, None);
        }
        state.slots[slot] = Some(SimDevice {
            device,
            connected: true,
            pose: Pose::valid(transform),
            controller: ControllerState::default(),
        });
        self
    }

    /// Move a device; the pose becomes valid.
    pub fn set_pose(&self, index: u32, transform: Affine3x4) {
        if let Some(sim) = self.lock().slots.get_mut(index as usize).and_then(Option::as_mut) {
            sim.pose = Pose::valid(transform);
        }
    }

    /// Mark the device's pose as not valid (lost tracking).
    pub fn invalidate_pose(&self, index: u32) {
        if let Some(sim) = self.lock().slots.get_mut(index as usize).and_then(Option::as_mut) {
            sim.pose.valid = false;
        }
    }

    pub fn set_connected(&self, index: u32, connected: bool) {
        if let Some(sim) = self.lock().slots.get_mut(index as usize).and_then(Option::as_mut) {
            sim.connected = connected;
        }
    }

    /// Set the x value of one controller axis.
    pub fn set_axis(&self, index: u32, axis: usize, x: f32) {
        if axis >= CONTROLLER_AXIS_COUNT {
            return;
        }
        if let Some(sim) = self.lock().slots.get_mut(index as usize).and_then(Option::as_mut) {
            sim.controller.axes[axis] = ControllerAxis { x, y: 0.0 };
        }
    }

    /// Number of `poses` calls served so far.
    pub fn pose_queries(&self) -> usize {
        self.pose_queries.load(Ordering::SeqCst)
    }

    fn with_device<T>(&self, index: u32, f: impl FnOnce(Option<&SimDevice>) -> T) -> Result<T, VrError> {
        let slot = Self::check_index(index)?;
        let state = self.lock();
        Ok(f(state.slots.get(slot).and_then(Option::as_ref)))
    }
}

impl VrRuntime for SimulatedRuntime {
    fn is_connected(&self, index: u32) -> Result<bool, VrError> {
        self.with_device(index, |sim| sim.map(|s| s.connected).unwrap_or(false))
    }

    fn device_class(&self, index: u32) -> Result<DeviceClass, VrError> {
        self.with_device(index, |sim| sim.map(|s| s.device.class).unwrap_or_default())
    }

    fn string_property(&self, index: u32, prop: u32) -> Result<String, VrError> {
        let serial = self.with_device(index, |sim| sim.map(|s| s.device.serial.clone()))?;
        match (prop, serial) {
            (PROP_SERIAL_NUMBER_STRING, Some(serial)) => Ok(serial),
            _ => Err(VrError::PropertyUnavailable { index, prop }),
        }
    }

    fn int32_property(&self, index: u32, prop: u32) -> Result<i32, VrError> {
        let role = self.with_device(index, |sim| sim.map(|s| s.device.role))?;
        match (prop, role) {
            (PROP_CONTROLLER_ROLE_HINT_INT32, Some(role)) => Ok(match role {
                ControllerRole::None => 0,
                ControllerRole::LeftHand => 1,
                ControllerRole::RightHand => 2,
            }),
            _ => Err(VrError::PropertyUnavailable { index, prop }),
        }
    }

    fn poses(
        &self,
        _origin: TrackingOrigin,
        _predicted_seconds_from_now: f32,
        count: u32,
    ) -> Result<Vec<Pose>, VrError> {
        self.pose_queries.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        let count = count.min(MAX_TRACKED_DEVICES) as usize;

        Ok((0..count)
            .map(|slot| match state.slots.get(slot).and_then(Option::as_ref) {
                Some(sim) if sim.connected => sim.pose,
                _ => Pose::invalid(),
            })
            .collect())
    }

    fn controller_state(&self, index: u32) -> Result<Option<ControllerState>, VrError> {
        self.with_device(index, |sim| match sim {
            Some(s) if s.connected && s.device.class == DeviceClass::Controller => {
                Some(s.controller)
            }
            _ => None,
        })
    }
}
