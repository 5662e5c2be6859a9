//! Runtime options for a tracking session.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::calibration::{CalibrationError, CalibrationStore};
use crate::tracking::{DeviceQuery, Direction};
use crate::vr::{ControllerRole, DeviceClass};

/// Default tick rate in Hz.
pub const DEFAULT_UPDATE_RATE_HZ: f64 = 10.0;

/// Trigger axis value above which the controller variant goes idle.
pub const DEFAULT_TRIGGER_THRESHOLD: f32 = 0.5;

/// Controller axis carrying the trigger.
pub const DEFAULT_TRIGGER_AXIS: usize = 1;

/// Which device the pole is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// A base station; its tilt is stripped before markers are derived.
    #[default]
    BaseStation,
    /// A controller, optionally restricted to one hand.
    Controller(ControllerRole),
}

impl Variant {
    /// Device class and role the registry should bind.
    pub fn device_query(&self) -> DeviceQuery {
        match self {
            Variant::BaseStation => DeviceQuery::new(DeviceClass::TrackingReference),
            Variant::Controller(role) => DeviceQuery::new(DeviceClass::Controller).with_role(*role),
        }
    }

    /// Whether the base pose's rotation is zeroed before composing.
    pub fn neutralizes_rotation(&self) -> bool {
        matches!(self, Variant::BaseStation)
    }

    fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "controller" | "controller-right" | "right" => {
                Variant::Controller(ControllerRole::RightHand)
            }
            "controller-left" | "left" => Variant::Controller(ControllerRole::LeftHand),
            "controller-any" | "any" => Variant::Controller(ControllerRole::None),
            _ => Variant::BaseStation,
        }
    }
}

/// How many pole halves are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerLayout {
    /// Right and left halves.
    #[default]
    Pair,
    /// Right, left, front and back.
    Quad,
}

impl MarkerLayout {
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            MarkerLayout::Pair => &[Direction::Right, Direction::Left],
            MarkerLayout::Quad => &[
                Direction::Right,
                Direction::Left,
                Direction::Front,
                Direction::Back,
            ],
        }
    }

    fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "quad" | "4" => MarkerLayout::Quad,
            _ => MarkerLayout::Pair,
        }
    }
}

/// Input that switches the loop from tracking to idle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TriggerConfig {
    /// Never goes idle on its own.
    #[default]
    Disabled,
    /// A keyboard key held, read from the session's key source.
    Key,
    /// A controller axis exceeding `threshold` on the bound controller.
    ControllerAxis { axis: usize, threshold: f32 },
}

impl TriggerConfig {
    /// Trigger pull on the default axis and threshold.
    pub fn controller_trigger() -> Self {
        TriggerConfig::ControllerAxis {
            axis: DEFAULT_TRIGGER_AXIS,
            threshold: DEFAULT_TRIGGER_THRESHOLD,
        }
    }
}

/// Configuration for a tracking session.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Ticks per second.
    pub update_rate_hz: f64,
    pub variant: Variant,
    pub layout: MarkerLayout,
    /// Image shown on every pole half.
    pub texture_path: PathBuf,
    /// Prefix for overlay keys, e.g. "pole" gives "pole.1".
    pub key_prefix: String,
    pub trigger: TriggerConfig,
    /// Calibration file; `None` uses the platform config directory.
    pub config_path: Option<PathBuf>,
    /// Pose prediction passed to the runtime.
    pub predicted_seconds: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            update_rate_hz: DEFAULT_UPDATE_RATE_HZ,
            variant: Variant::default(),
            layout: MarkerLayout::default(),
            texture_path: PathBuf::from("texture.png"),
            key_prefix: "pole".to_string(),
            trigger: TriggerConfig::default(),
            config_path: None,
            predicted_seconds: 0.0,
        }
    }
}

impl TrackerConfig {
    /// Build from `POLE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let update_rate_hz = env::var("POLE_UPDATE_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|rate: &f64| *rate > 0.0 && rate.is_finite())
            .unwrap_or(defaults.update_rate_hz);
        let variant = env::var("POLE_VARIANT")
            .map(|s| Variant::from_str(&s))
            .unwrap_or(defaults.variant);
        let layout = env::var("POLE_LAYOUT")
            .map(|s| MarkerLayout::from_str(&s))
            .unwrap_or(defaults.layout);
        let texture_path = env::var("POLE_TEXTURE")
            .map(PathBuf::from)
            .unwrap_or(defaults.texture_path);
        let config_path = env::var("POLE_CONFIG_PATH").ok().map(PathBuf::from);

        let threshold: f32 = env::var("POLE_TRIGGER_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TRIGGER_THRESHOLD);
        let trigger = match env::var("POLE_TRIGGER")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "key" | "keyboard" => TriggerConfig::Key,
            "trigger" | "controller" => TriggerConfig::ControllerAxis {
                axis: DEFAULT_TRIGGER_AXIS,
                threshold,
            },
            _ => defaults.trigger,
        };

        Self {
            update_rate_hz,
            variant,
            layout,
            texture_path,
            trigger,
            config_path,
            ..defaults
        }
    }

    /// Time budget of one tick.
    ///
    /// Rates that are not positive and finite, or too small to give a representable
    /// period, fall back to [`DEFAULT_UPDATE_RATE_HZ`].
    pub fn tick_period(&self) -> Duration {
        let fallback = Duration::from_secs_f64(1.0 / DEFAULT_UPDATE_RATE_HZ);
        let rate = self.update_rate_hz;
        if !(rate > 0.0 && rate.is_finite()) {
            return fallback;
        }
        Duration::try_from_secs_f64(1.0 / rate).unwrap_or(fallback)
    }

    pub fn with_update_rate(mut self, hz: f64) -> Self {
        self.update_rate_hz = hz;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_layout(mut self, layout: MarkerLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture_path = path.into();
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerConfig) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Store at `config_path`, or in the platform config directory.
    pub fn calibration_store(&self) -> Result<CalibrationStore, CalibrationError> {
        match &self.config_path {
            Some(path) => Ok(CalibrationStore::new(path.clone())),
            None => CalibrationStore::in_config_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_config_default() {
        let config = TrackerConfig::default();
        assert_eq!(config.update_rate_hz, 10.0);
        assert_eq!(config.tick_period(), Duration::from_millis(100));
        assert_eq!(config.variant, Variant::BaseStation);
        assert_eq!(config.layout, MarkerLayout::Pair);
        assert_eq!(config.trigger, TriggerConfig::Disabled);
    }

    #[test]
    fn test_tracker_config_builder() {
        let config = TrackerConfig::default()
            .with_update_rate(50.0)
            .with_variant(Variant::Controller(ControllerRole::LeftHand))
            .with_layout(MarkerLayout::Quad)
            .with_trigger(TriggerConfig::controller_trigger())
            .with_key_prefix("test");

        assert_eq!(config.tick_period(), Duration::from_millis(20));
        assert!(!config.variant.neutralizes_rotation());
        assert_eq!(config.layout.directions().len(), 4);
        assert_eq!(
            config.trigger,
            TriggerConfig::ControllerAxis {
                axis: 1,
                threshold: 0.5
            }
        );
        assert_eq!(config.key_prefix, "test");
    }

    #[test]
    fn test_explicit_calibration_path() {
        let config = TrackerConfig::default().with_config_path("/tmp/poles/config.json");
        let store = config.calibration_store().unwrap();
        assert_eq!(store.path(), std::path::Path::new("/tmp/poles/config.json"));
    }

    #[test]
    fn test_zero_rate_falls_back() {
        let config = TrackerConfig::default().with_update_rate(0.0);
        assert_eq!(config.tick_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_unrepresentable_rate_falls_back() {
        for rate in [1e-300, f64::MIN_POSITIVE, f64::NAN, f64::INFINITY] {
            let config = TrackerConfig::default().with_update_rate(rate);
            assert_eq!(config.tick_period(), Duration::from_millis(100));
        }
    }

    #[test]
    fn test_variant_query() {
        let query = Variant::BaseStation.device_query();
        assert_eq!(query.class, DeviceClass::TrackingReference);

        let query = Variant::from_str("controller-left").device_query();
        assert_eq!(query.class, DeviceClass::Controller);
        assert_eq!(query.role, ControllerRole::LeftHand);
    }
}
