//! Device and pose types exchanged with the VR runtime.

use super::matrix::Affine3x4;

/// Number of device slots the runtime exposes.
pub const MAX_TRACKED_DEVICES: u32 = 64;

/// Property id of the serial number string.
pub const PROP_SERIAL_NUMBER_STRING: u32 = 1002;

/// Property id of the controller role hint.
pub const PROP_CONTROLLER_ROLE_HINT_INT32: u32 = 1031;

/// Number of analog axes reported per controller.
pub const CONTROLLER_AXIS_COUNT: usize = 5;

/// Class of a tracked device, using the runtime's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    Invalid,
    Hmd,
    Controller,
    GenericTracker,
    TrackingReference,
    DisplayRedirect,
}

impl From<i32> for DeviceClass {
    fn from(value: i32) -> Self {
        match value {
            1 => DeviceClass::Hmd,
            2 => DeviceClass::Controller,
            3 => DeviceClass::GenericTracker,
            4 => DeviceClass::TrackingReference,
            5 => DeviceClass::DisplayRedirect,
            _ => DeviceClass::Invalid,
        }
    }
}

/// Which hand a controller is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerRole {
    #[default]
    None,
    LeftHand,
    RightHand,
}

impl From<i32> for ControllerRole {
    fn from(value: i32) -> Self {
        match value {
            1 => ControllerRole::LeftHand,
            2 => ControllerRole::RightHand,
            _ => ControllerRole::None,
        }
    }
}

/// Reference frame for poses and absolute overlay transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingOrigin {
    Seated,
    #[default]
    Standing,
    RawAndUncalibrated,
}

/// A connected device as seen during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedDevice {
    pub index: u32,
    pub serial: String,
    pub class: DeviceClass,
    pub role: ControllerRole,
}

impl TrackedDevice {
    pub fn new(index: u32, serial: impl Into<String>, class: DeviceClass) -> Self {
        Self {
            index,
            serial: serial.into(),
            class,
            role: ControllerRole::None,
        }
    }

    pub fn with_role(mut self, role: ControllerRole) -> Self {
        self.role = role;
        self
    }
}

impl std::fmt::Display for TrackedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} #{} ({})", self.class, self.index, self.serial)
    }
}

/// One sampled device pose.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub valid: bool,
    pub transform: Affine3x4,
}

impl Pose {
    pub fn valid(transform: Affine3x4) -> Self {
        Self {
            valid: true,
            transform,
        }
    }

    pub fn invalid() -> Self {
        Self::default()
    }
}

/// A single analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerAxis {
    pub x: f32,
    pub y: f32,
}

/// Analog state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerState {
    pub axes: [ControllerAxis; CONTROLLER_AXIS_COUNT],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_class_from_runtime_value() {
        assert_eq!(DeviceClass::from(2), DeviceClass::Controller);
        assert_eq!(DeviceClass::from(4), DeviceClass::TrackingReference);
        assert_eq!(DeviceClass::from(42), DeviceClass::Invalid);
    }

    #[test]
    fn test_role_from_runtime_value() {
        assert_eq!(ControllerRole::from(1), ControllerRole::LeftHand);
        assert_eq!(ControllerRole::from(2), ControllerRole::RightHand);
        assert_eq!(ControllerRole::from(0), ControllerRole::None);
    }

    #[test]
    fn test_device_display() {
        let device = TrackedDevice::new(3, "LHB-1234", DeviceClass::TrackingReference);
        assert_eq!(device.to_string(), "TrackingReference #3 (LHB-1234)");
    }
}
