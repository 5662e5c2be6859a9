//! Tracking module: device binding, pose sampling, marker composition and the loop.

mod composer;
mod error;
mod registry;
mod sampler;
mod session;

pub use composer::{
    apply_offset, directional_transform, neutralize_rotation, Direction, DirectionBasis,
    MarkerSpec, TransformComposer,
};
pub use error::{LoopError, TrackingError};
pub use registry::{discover, DeviceQuery, DeviceRegistry};
pub use sampler::PoseSampler;
pub use session::{
    IdleTrigger, KeySource, LoopHandle, SharedKey, TickOutcome, TrackingMode, TrackingSession,
};
