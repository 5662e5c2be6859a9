//! Fixed-rate tracking loop.
//!
//! A session owns the VR runtime, the overlay sink and the calibration. Each tick it
//! drains pending commands, evaluates the idle trigger and, while tracking, samples the
//! bound device and pushes one transform per pole half. Other threads talk to it only
//! through a [`LoopHandle`]: mode and stop are atomics, offset changes and rebind
//! requests go through a bounded channel that only the loop reads.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::Instant;

use crate::calibration::{Axis, Calibration, CalibrationStore, Offset};
use crate::config::{TrackerConfig, TriggerConfig};
use crate::overlay::{OverlaySink, PoleHalf};
use crate::vr::{DeviceClass, TrackedDevice, TrackingOrigin, VrError, VrRuntime};

use super::composer::{MarkerSpec, TransformComposer};
use super::error::{LoopError, TrackingError};
use super::registry::DeviceRegistry;
use super::sampler::PoseSampler;

const COMMAND_QUEUE: usize = 32;

/// Whether markers follow the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    /// Markers are updated every tick.
    #[default]
    Tracking,
    /// Markers stay where they were; no pose sampling.
    Idle,
}

impl TrackingMode {
    fn as_u8(self) -> u8 {
        match self {
            TrackingMode::Tracking => 0,
            TrackingMode::Idle => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => TrackingMode::Idle,
            _ => TrackingMode::Tracking,
        }
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingMode::Tracking => write!(f, "tracking"),
            TrackingMode::Idle => write!(f, "idle"),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Marker transforms were pushed.
    Updated,
    /// The bound device's pose was invalid; markers kept their last transforms.
    PoseInvalid,
    /// No device is bound.
    Unbound,
    /// Idle; nothing sampled.
    Idle,
    /// The idle trigger fired this tick.
    EnteredIdle,
}

/// A key whose held state can be polled.
pub trait KeySource: Send + Sync {
    fn is_held(&self) -> bool;
}

/// Key state set from another thread.
#[derive(Debug, Clone, Default)]
pub struct SharedKey(Arc<AtomicBool>);

impl SharedKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_held(&self, held: bool) {
        self.0.store(held, Ordering::SeqCst);
    }
}

impl KeySource for SharedKey {
    fn is_held(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Condition that moves the loop from tracking to idle.
#[derive(Clone, Default)]
pub enum IdleTrigger {
    #[default]
    Disabled,
    Key(Arc<dyn KeySource>),
    /// Axis of the bound controller exceeding `threshold`.
    ControllerAxis {
        axis: usize,
        threshold: f32,
    },
}

impl fmt::Debug for IdleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdleTrigger::Disabled => write!(f, "Disabled"),
            IdleTrigger::Key(_) => write!(f, "Key"),
            IdleTrigger::ControllerAxis { axis, threshold } => f
                .debug_struct("ControllerAxis")
                .field("axis", axis)
                .field("threshold", threshold)
                .finish(),
        }
    }
}

impl IdleTrigger {
    fn from_config(config: TriggerConfig) -> Self {
        match config {
            TriggerConfig::Disabled => IdleTrigger::Disabled,
            TriggerConfig::Key => IdleTrigger::Key(Arc::new(SharedKey::new())),
            TriggerConfig::ControllerAxis { axis, threshold } => {
                IdleTrigger::ControllerAxis { axis, threshold }
            }
        }
    }

    fn fired<R: VrRuntime + ?Sized>(
        &self,
        runtime: &R,
        binding: Option<&TrackedDevice>,
    ) -> Result<bool, VrError> {
        match self {
            IdleTrigger::Disabled => Ok(false),
            IdleTrigger::Key(key) => Ok(key.is_held()),
            IdleTrigger::ControllerAxis { axis, threshold } => {
                let Some(device) = binding.filter(|d| d.class == DeviceClass::Controller) else {
                    return Ok(false);
                };
                let state = runtime.controller_state(device.index)?;
                Ok(state
                    .and_then(|s| s.axes.get(*axis).copied())
                    .map(|a| a.x > *threshold)
                    .unwrap_or(false))
            }
        }
    }
}

#[derive(Debug)]
enum LoopCommand {
    SetOffset(Offset),
    Nudge(Axis, f64),
    Rebind,
}

#[derive(Debug)]
struct SharedState {
    mode: AtomicU8,
    stop: AtomicBool,
    running: AtomicBool,
    calibration: RwLock<Calibration>,
    binding: RwLock<Option<TrackedDevice>>,
}

impl SharedState {
    fn mode(&self) -> TrackingMode {
        TrackingMode::from_u8(self.mode.load(Ordering::SeqCst))
    }

    fn set_mode(&self, mode: TrackingMode) {
        self.mode.store(mode.as_u8(), Ordering::SeqCst);
    }

    fn publish(&self, calibration: &Calibration, binding: Option<&TrackedDevice>) {
        *self.calibration.write().unwrap_or_else(PoisonError::into_inner) = calibration.clone();
        *self.binding.write().unwrap_or_else(PoisonError::into_inner) = binding.cloned();
    }
}

/// Handle for controlling a session from another thread.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    shared: Arc<SharedState>,
    commands: mpsc::Sender<LoopCommand>,
}

impl LoopHandle {
    pub fn mode(&self) -> TrackingMode {
        self.shared.mode()
    }

    /// Leave idle. The only way back to tracking.
    pub fn resume(&self) {
        if self.shared.mode() == TrackingMode::Idle {
            tracing::info!("Tracking resumed");
        }
        self.shared.set_mode(TrackingMode::Tracking);
    }

    /// Ask the loop to exit after the current tick.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Last calibration published by the loop.
    pub fn calibration(&self) -> Calibration {
        self.shared
            .calibration
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Currently bound device, if any.
    pub fn binding(&self) -> Option<TrackedDevice> {
        self.shared
            .binding
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_bound(&self) -> bool {
        self.shared
            .binding
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the offset; persisted by the loop on its next tick.
    pub fn update_offset(&self, offset: Offset) -> Result<(), LoopError> {
        if !offset.is_finite() {
            return Err(LoopError::NonFiniteOffset);
        }
        self.send(LoopCommand::SetOffset(offset))
    }

    /// Shift the offset along one axis, relative to the loop's current value.
    pub fn nudge(&self, axis: Axis, delta: f64) -> Result<(), LoopError> {
        if !delta.is_finite() {
            return Err(LoopError::NonFiniteOffset);
        }
        self.send(LoopCommand::Nudge(axis, delta))
    }

    /// Drop the binding and discover again on the next tick.
    pub fn rebind(&self) -> Result<(), LoopError> {
        self.send(LoopCommand::Rebind)
    }

    fn send(&self, command: LoopCommand) -> Result<(), LoopError> {
        self.commands.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => LoopError::ChannelFull,
            TrySendError::Closed(_) => LoopError::ChannelClosed,
        })
    }
}

/// One tracking session: a bound device, its pole halves and the loop state.
pub struct TrackingSession<R, S> {
    runtime: R,
    sink: S,
    store: CalibrationStore,
    calibration: Calibration,
    registry: DeviceRegistry,
    sampler: PoseSampler,
    composer: TransformComposer,
    markers: Vec<PoleHalf>,
    trigger: IdleTrigger,
    period: Duration,
    shared: Arc<SharedState>,
    commands_tx: mpsc::Sender<LoopCommand>,
    commands_rx: mpsc::Receiver<LoopCommand>,
}

impl<R: VrRuntime, S: OverlaySink> TrackingSession<R, S> {
    /// Load calibration, bind a device and create the pole halves.
    ///
    /// Not finding a device is not an error; the session starts unbound.
    pub fn new(
        runtime: R,
        mut sink: S,
        store: CalibrationStore,
        config: &TrackerConfig,
    ) -> Result<Self, TrackingError> {
        let mut calibration = store.load()?;

        let mut registry = DeviceRegistry::new(config.variant.device_query());
        registry.bind(&runtime, &mut calibration, &store)?;

        let markers = MarkerSpec::for_layout(config.layout, &config.key_prefix)
            .into_iter()
            .map(|spec| PoleHalf::create(&mut sink, spec, &calibration, &config.texture_path))
            .collect::<Result<Vec<_>, _>>()?;

        let shared = Arc::new(SharedState {
            mode: AtomicU8::new(TrackingMode::Tracking.as_u8()),
            stop: AtomicBool::new(false),
            running: AtomicBool::new(false),
            calibration: RwLock::new(calibration.clone()),
            binding: RwLock::new(registry.binding().cloned()),
        });
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE);

        Ok(Self {
            runtime,
            sink,
            store,
            calibration,
            registry,
            sampler: PoseSampler::new(TrackingOrigin::Standing, config.predicted_seconds),
            composer: TransformComposer::new(config.variant.neutralizes_rotation()),
            markers,
            trigger: IdleTrigger::from_config(config.trigger),
            period: config.tick_period(),
            shared,
            commands_tx,
            commands_rx,
        })
    }

    /// Poll `key` for the key trigger. Has no effect with other trigger kinds.
    pub fn with_key_source(mut self, key: Arc<dyn KeySource>) -> Self {
        if matches!(self.trigger, IdleTrigger::Key(_)) {
            self.trigger = IdleTrigger::Key(key);
        }
        self
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            shared: self.shared.clone(),
            commands: self.commands_tx.clone(),
        }
    }

    pub fn mode(&self) -> TrackingMode {
        self.shared.mode()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn binding(&self) -> Option<&TrackedDevice> {
        self.registry.binding()
    }

    pub fn markers(&self) -> &[PoleHalf] {
        &self.markers
    }

    /// Run one tick without sleeping.
    pub fn tick(&mut self) -> Result<TickOutcome, TrackingError> {
        self.apply_commands()?;

        if self.shared.mode() == TrackingMode::Idle {
            return Ok(TickOutcome::Idle);
        }
        if self.trigger.fired(&self.runtime, self.registry.binding())? {
            self.shared.set_mode(TrackingMode::Idle);
            tracing::info!("Idle trigger fired, markers frozen");
            return Ok(TickOutcome::EnteredIdle);
        }

        let Some(device) = self.registry.binding() else {
            return Ok(TickOutcome::Unbound);
        };
        let Some(base) = self.sampler.sample(&self.runtime, device)? else {
            tracing::debug!("Pose of {} invalid, keeping markers", device);
            return Ok(TickOutcome::PoseInvalid);
        };

        let transforms = self.composer.compose(
            &base,
            &self.calibration,
            self.markers.iter().map(|m| m.spec().direction),
        );
        for (marker, transform) in self.markers.iter().zip(&transforms) {
            marker.set_position(&mut self.sink, transform)?;
        }

        Ok(TickOutcome::Updated)
    }

    fn apply_commands(&mut self) -> Result<(), TrackingError> {
        while let Ok(command) = self.commands_rx.try_recv() {
            match command {
                LoopCommand::SetOffset(offset) => self.replace_offset(offset),
                LoopCommand::Nudge(axis, delta) => {
                    self.replace_offset(self.calibration.offset().nudged(axis, delta))
                }
                LoopCommand::Rebind => {
                    self.registry
                        .rebind(&self.runtime, &mut self.calibration, &self.store)?;
                }
            }
            self.shared
                .publish(&self.calibration, self.registry.binding());
        }
        Ok(())
    }

    fn replace_offset(&mut self, offset: Offset) {
        // A non-finite value would be saved as null and fail every later load.
        if !offset.is_finite() {
            tracing::warn!("Ignoring non-finite offset {:?}", offset);
            return;
        }
        let updated = self.calibration.clone().with_offset(offset);
        if let Err(e) = self.store.save(&updated) {
            tracing::error!("Failed to save calibration: {}", e);
        }
        tracing::info!(
            "Offset set to ({:.4}, {:.4}, {:.4})",
            offset.x,
            offset.y,
            offset.z
        );
        self.calibration = updated;
    }

    /// Tick at the configured rate until [`LoopHandle::stop`] is called.
    ///
    /// A tick that overruns its period is followed immediately by the next one; no
    /// catch-up ticks are scheduled.
    pub async fn run(mut self) -> Result<(), TrackingError> {
        self.shared.running.store(true, Ordering::SeqCst);
        tracing::info!(
            "Tracking loop started, {} markers, {:?} per tick",
            self.markers.len(),
            self.period
        );

        let result = loop {
            if self.shared.stop.load(Ordering::SeqCst) {
                break Ok(());
            }

            let start = Instant::now();
            if let Err(e) = self.tick() {
                tracing::error!("Tracking loop failed: {}", e);
                break Err(e);
            }

            let elapsed = start.elapsed();
            if elapsed < self.period {
                tokio::time::sleep(self.period - elapsed).await;
            } else {
                tracing::debug!("Tick took {:?}, over budget", elapsed);
            }
        };

        self.shared.running.store(false, Ordering::SeqCst);
        tracing::info!("Tracking loop stopped");
        result
    }
}

impl<R, S> TrackingSession<R, S>
where
    R: VrRuntime + Send + 'static,
    S: OverlaySink + Send + 'static,
{
    /// Run the loop on a dedicated thread with its own single-threaded runtime.
    pub fn spawn(
        self,
    ) -> Result<(LoopHandle, thread::JoinHandle<Result<(), TrackingError>>), TrackingError> {
        let handle = self.handle();
        handle.shared.running.store(true, Ordering::SeqCst);

        let worker = thread::Builder::new()
            .name("pole-tracking".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()?;
                runtime.block_on(self.run())
            })?;

        Ok((handle, worker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MarkerLayout, Variant};
    use crate::overlay::RecordingOverlay;
    use crate::vr::{Affine3x4, ControllerRole, SimulatedRuntime};

    struct Fixture {
        _dir: tempfile::TempDir,
        runtime: SimulatedRuntime,
        overlay: RecordingOverlay,
        store: CalibrationStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = CalibrationStore::new(dir.path().join("config.json"));
        let runtime = SimulatedRuntime::new();
        runtime
            .add_device(
                TrackedDevice::new(0, "HMD", DeviceClass::Hmd),
                Affine3x4::identity(),
            )
            .add_device(
                TrackedDevice::new(2, "LHB-A", DeviceClass::TrackingReference),
                Affine3x4::from_yaw(0.4, [1.0, 2.0, 3.0]),
            )
            .add_device(
                TrackedDevice::new(4, "CTRL-R", DeviceClass::Controller)
                    .with_role(ControllerRole::RightHand),
                Affine3x4::from_translation(0.0, 1.0, 0.0),
            );
        Fixture {
            _dir: dir,
            runtime,
            overlay: RecordingOverlay::new(),
            store,
        }
    }

    fn session(
        f: &Fixture,
        config: &TrackerConfig,
    ) -> TrackingSession<SimulatedRuntime, RecordingOverlay> {
        TrackingSession::new(f.runtime.clone(), f.overlay.clone(), f.store.clone(), config)
            .unwrap()
    }

    #[test]
    fn test_new_binds_and_creates_markers() {
        let f = fixture();
        let config = TrackerConfig::default().with_layout(MarkerLayout::Quad);
        let session = session(&f, &config);

        assert_eq!(session.binding().unwrap().serial, "LHB-A");
        assert_eq!(session.markers().len(), 4);
        assert_eq!(f.overlay.len(), 4);
        assert!(f.overlay.overlay("pole.1").unwrap().visible);
        assert_eq!(f.store.load().unwrap().bound_serial, "LHB-A");
        assert_eq!(session.handle().binding().unwrap().index, 2);
    }

    #[test]
    fn test_tick_pushes_composed_transforms() {
        let f = fixture();
        let config = TrackerConfig::default();
        let mut session = session(&f, &config);

        assert_eq!(session.tick().unwrap(), TickOutcome::Updated);

        let base = Affine3x4::from_yaw(0.4, [1.0, 2.0, 3.0]);
        let expected = TransformComposer::new(true).compose_markers(
            &base,
            session.calibration(),
            &MarkerSpec::for_layout(MarkerLayout::Pair, "pole"),
        );
        assert_eq!(f.overlay.transform("pole.1"), Some(expected[0]));
        assert_eq!(f.overlay.transform("pole.2"), Some(expected[1]));
    }

    #[test]
    fn test_invalid_pose_keeps_last_transform() {
        let f = fixture();
        let mut session = session(&f, &TrackerConfig::default());
        session.tick().unwrap();
        let before = f.overlay.transform("pole.1");

        f.runtime.invalidate_pose(2);
        assert_eq!(session.tick().unwrap(), TickOutcome::PoseInvalid);
        assert_eq!(f.overlay.transform("pole.1"), before);
        assert_eq!(f.overlay.transform_updates(), 2);
    }

    #[test]
    fn test_unbound_session_is_not_fatal() {
        let f = fixture();
        f.store
            .save(&Calibration::default().with_bound_serial("LHB-MISSING"))
            .unwrap();
        let mut session = session(&f, &TrackerConfig::default());

        assert!(session.binding().is_none());
        assert_eq!(session.tick().unwrap(), TickOutcome::Unbound);
        assert_eq!(f.overlay.transform_updates(), 0);
    }

    #[test]
    fn test_idle_freezes_until_resume() {
        let f = fixture();
        let key = SharedKey::new();
        let config = TrackerConfig::default().with_trigger(TriggerConfig::Key);
        let mut session = session(&f, &config).with_key_source(Arc::new(key.clone()));
        let handle = session.handle();

        assert_eq!(session.tick().unwrap(), TickOutcome::Updated);
        let frozen = f.overlay.transform("pole.1");

        key.set_held(true);
        assert_eq!(session.tick().unwrap(), TickOutcome::EnteredIdle);
        assert_eq!(handle.mode(), TrackingMode::Idle);

        // Move the device and toggle the key: nothing changes while idle.
        let queries = f.runtime.pose_queries();
        f.runtime.set_pose(2, Affine3x4::from_translation(5.0, 5.0, 5.0));
        for held in [false, true, false] {
            key.set_held(held);
            assert_eq!(session.tick().unwrap(), TickOutcome::Idle);
        }
        assert_eq!(f.overlay.transform("pole.1"), frozen);
        assert_eq!(f.runtime.pose_queries(), queries);

        handle.resume();
        assert_eq!(session.mode(), TrackingMode::Tracking);
        assert_eq!(session.tick().unwrap(), TickOutcome::Updated);
        assert_ne!(f.overlay.transform("pole.1"), frozen);
    }

    #[test]
    fn test_controller_trigger_enters_idle() {
        let f = fixture();
        let config = TrackerConfig::default()
            .with_variant(Variant::Controller(ControllerRole::RightHand))
            .with_trigger(TriggerConfig::controller_trigger());
        let mut session = session(&f, &config);
        assert_eq!(session.binding().unwrap().serial, "CTRL-R");

        f.runtime.set_axis(4, 1, 0.5);
        assert_eq!(session.tick().unwrap(), TickOutcome::Updated);

        f.runtime.set_axis(4, 1, 0.51);
        assert_eq!(session.tick().unwrap(), TickOutcome::EnteredIdle);
    }

    #[test]
    fn test_offset_updates_apply_and_persist() {
        let f = fixture();
        let mut session = session(&f, &TrackerConfig::default());
        let handle = session.handle();

        handle.update_offset(Offset::new(0.5, 0.0, -0.5)).unwrap();
        handle.nudge(Axis::Y, 0.25).unwrap();
        session.tick().unwrap();

        let expected = Offset::new(0.5, 0.25, -0.5);
        assert_eq!(session.calibration().offset(), expected);
        assert_eq!(handle.calibration().offset(), expected);
        assert_eq!(f.store.load().unwrap().offset(), expected);
        assert_eq!(f.store.load().unwrap().bound_serial, "LHB-A");
    }

    #[test]
    fn test_non_finite_offsets_never_reach_the_file() {
        let f = fixture();
        let mut session = session(&f, &TrackerConfig::default());
        let handle = session.handle();

        let infinite = Offset::new("inf".parse().unwrap(), 0.0, 0.0);
        assert_eq!(handle.update_offset(infinite), Err(LoopError::NonFiniteOffset));
        assert_eq!(handle.nudge(Axis::Z, f64::NAN), Err(LoopError::NonFiniteOffset));

        // Two large nudges overflow to infinity inside the loop.
        handle.update_offset(Offset::new(1.0, 0.0, 0.0)).unwrap();
        handle.nudge(Axis::X, f64::MAX).unwrap();
        handle.nudge(Axis::X, f64::MAX).unwrap();
        session.tick().unwrap();

        let saved = f.store.load().unwrap();
        assert!(saved.offset().is_finite());
        assert_eq!(saved.offset(), session.calibration().offset());
        assert_eq!(saved.x, f64::MAX);
    }

    #[test]
    fn test_rebind_only_on_request() {
        let f = fixture();
        f.runtime.set_connected(2, false);
        let mut session = session(&f, &TrackerConfig::default());
        assert!(session.binding().is_none());

        f.runtime.set_connected(2, true);
        assert_eq!(session.tick().unwrap(), TickOutcome::Unbound);

        session.handle().rebind().unwrap();
        assert_eq!(session.tick().unwrap(), TickOutcome::Updated);
        assert_eq!(session.binding().unwrap().serial, "LHB-A");
        assert!(session.handle().is_bound());
    }

    #[test]
    fn test_corrupt_calibration_fails_session() {
        let f = fixture();
        std::fs::write(f.store.path(), "not json").unwrap();

        let result = TrackingSession::new(
            f.runtime.clone(),
            f.overlay.clone(),
            f.store.clone(),
            &TrackerConfig::default(),
        );
        assert!(matches!(
            result,
            Err(TrackingError::Calibration(
                crate::calibration::CalibrationError::ConfigCorrupt { .. }
            ))
        ));
    }

    #[test]
    fn test_handle_reports_closed_channel() {
        let f = fixture();
        let handle = session(&f, &TrackerConfig::default()).handle();
        assert_eq!(handle.rebind(), Err(LoopError::ChannelClosed));
    }

    #[tokio::test]
    async fn test_run_until_stopped() {
        let f = fixture();
        let config = TrackerConfig::default().with_update_rate(200.0);
        let session = session(&f, &config);
        let handle = session.handle();

        let task = tokio::spawn(session.run());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_running());
        handle.stop();

        task.await.unwrap().unwrap();
        assert!(!handle.is_running());
        assert!(f.overlay.transform_updates() > 0);
    }

    #[test]
    fn test_spawn_on_worker_thread() {
        let f = fixture();
        let config = TrackerConfig::default().with_update_rate(200.0);
        let (handle, worker) = session(&f, &config).spawn().unwrap();

        std::thread::sleep(Duration::from_millis(50));
        handle.stop();
        worker.join().unwrap().unwrap();
        assert!(f.overlay.transform("pole.2").is_some());
    }
}
