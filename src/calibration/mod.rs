//! Calibration module: persisted marker offsets, appearance and bound device.

mod store;

pub use store::{
    Axis, Calibration, CalibrationError, CalibrationStore, Offset, CALIBRATION_FILE_NAME,
};
