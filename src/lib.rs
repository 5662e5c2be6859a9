// Copyright 2025 Pole Overlay contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Pole Overlay
//!
//! Physical-boundary markers for room-scale VR.
//!
//! A pole half is a textured, curved overlay quad placed beside a tracked device
//! (a base station on its stand, or a controller). The library discovers and binds
//! the device, samples its pose at a fixed rate, composes one world transform per
//! pole half from the pose and a persisted calibration, and pushes those transforms
//! to an overlay sink. An idle trigger freezes the markers until resumed.
//!
//! The VR runtime and the overlay renderer sit behind the [`VrRuntime`] and
//! [`OverlaySink`] traits; [`SimulatedRuntime`] and [`RecordingOverlay`] are the
//! in-memory implementations.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pole_overlay::{
//!     CalibrationStore, RecordingOverlay, SimulatedRuntime, TrackerConfig, TrackingSession,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TrackerConfig::default();
//!     let store = CalibrationStore::new("config.json");
//!
//!     let session = TrackingSession::new(
//!         SimulatedRuntime::demo_room(),
//!         RecordingOverlay::new(),
//!         store,
//!         &config,
//!     )?;
//!     let handle = session.handle();
//!     let task = tokio::spawn(session.run());
//!
//!     handle.nudge(pole_overlay::Axis::Y, 0.05)?;
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!
//!     handle.stop();
//!     task.await??;
//!     Ok(())
//! }
//! ```

pub mod calibration;
pub mod config;
pub mod gui;
pub mod overlay;
pub mod tracking;
pub mod vr;

pub use calibration::{Axis, Calibration, CalibrationError, CalibrationStore, Offset};
pub use config::{MarkerLayout, TrackerConfig, TriggerConfig, Variant};
pub use overlay::{OverlayError, OverlayHandle, OverlaySink, PoleHalf, RecordingOverlay};
pub use tracking::{
    DeviceQuery, DeviceRegistry, Direction, IdleTrigger, KeySource, LoopError, LoopHandle,
    MarkerSpec, PoseSampler, SharedKey, TickOutcome, TrackingError, TrackingMode,
    TrackingSession, TransformComposer,
};
pub use vr::{
    Affine3x4, ControllerRole, DeviceClass, Pose, SimulatedRuntime, TrackedDevice,
    TrackingOrigin, VrError, VrRuntime,
};
