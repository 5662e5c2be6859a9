//! VR runtime module: device types, poses and the runtime seam.

mod matrix;
mod runtime;
mod simulated;
mod types;

pub use matrix::Affine3x4;
pub use runtime::{VrError, VrRuntime};
pub use simulated::SimulatedRuntime;
pub use types::{
    ControllerAxis, ControllerRole, ControllerState, DeviceClass, Pose, TrackedDevice,
    TrackingOrigin, CONTROLLER_AXIS_COUNT, MAX_TRACKED_DEVICES, PROP_CONTROLLER_ROLE_HINT_INT32,
    PROP_SERIAL_NUMBER_STRING,
};
