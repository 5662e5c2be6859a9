//! Persisted calibration: marker offsets, size, colour and the bound device serial.
//! Stored as JSON, by default in the platform config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config;

/// Calibration file name inside the config directory.
pub const CALIBRATION_FILE_NAME: &str = "config.json";

/// Calibration store errors.
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("Calibration file {path} is corrupt: {source}")]
    ConfigCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Calibration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize calibration: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Cannot determine config directory")]
    NoConfigDir,
}

/// Positional offset applied to the bound device's translation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Offset {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component along `axis`.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy with `delta` added along `axis`.
    pub fn nudged(mut self, axis: Axis, delta: f64) -> Self {
        match axis {
            Axis::X => self.x += delta,
            Axis::Y => self.y += delta,
            Axis::Z => self.z += delta,
        }
        self
    }
}

/// A tracking-space axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("Unknown axis: {}", other)),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// User-adjustable calibration persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Overlay alpha in `[0, 1]`
    pub transparency: f64,
    /// Height factor; the marker's vertical basis column is `1 + height`
    pub height: f64,
    /// Marker tint, 0-255 per channel
    pub color: [u8; 3],
    /// Marker width in metres
    pub size: f64,
    /// Serial of the bound device, empty until the first successful binding
    #[serde(rename = "base_station_serial", alias = "boundSerial")]
    pub bound_serial: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            transparency: 1.0,
            height: 10.0,
            color: [130, 80, 230],
            size: 0.2,
            bound_serial: String::new(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Calibration {
    pub fn offset(&self) -> Offset {
        Offset::new(self.x, self.y, self.z)
    }

    /// Copy with the offset replaced.
    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.x = offset.x;
        self.y = offset.y;
        self.z = offset.z;
        self
    }

    /// Copy with the bound serial replaced.
    pub fn with_bound_serial(mut self, serial: impl Into<String>) -> Self {
        self.bound_serial = serial.into();
        self
    }

    pub fn is_bound(&self) -> bool {
        !self.bound_serial.is_empty()
    }
}

/// Reads and writes the calibration file.
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    path: PathBuf,
}

impl CalibrationStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory.
    pub fn in_config_dir() -> Result<Self, CalibrationError> {
        config::config_dir()
            .map(|dir| Self::new(dir.join(CALIBRATION_FILE_NAME)))
            .ok_or(CalibrationError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the calibration, writing defaults when the file does not exist.
    ///
    /// A missing file never fails: if the defaults cannot be written the error is
    /// logged and the defaults are still returned. An unparsable file is
    /// [`CalibrationError::ConfigCorrupt`].
    pub fn load(&self) -> Result<Calibration, CalibrationError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let defaults = Calibration::default();
                tracing::info!("No calibration at {}, writing defaults", self.path.display());
                if let Err(e) = self.save(&defaults) {
                    tracing::warn!("Failed to write default calibration: {}", e);
                }
                return Ok(defaults);
            }
            Err(source) => {
                return Err(CalibrationError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| CalibrationError::ConfigCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file with `calibration`.
    ///
    /// Writes a sibling temp file and renames it over the target so readers never
    /// see a half-written file.
    pub fn save(&self, calibration: &Calibration) -> Result<(), CalibrationError> {
        let io_err = |source| CalibrationError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(calibration)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!("Saved calibration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CalibrationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CalibrationStore::new(dir.path().join("nested").join(CALIBRATION_FILE_NAME));
        (dir, store)
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let (_dir, store) = store();
        assert!(!store.path().exists());

        let calibration = store.load().unwrap();
        assert_eq!(calibration, Calibration::default());
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_load_is_idempotent() {
        let (_dir, store) = store();
        let calibration = Calibration {
            transparency: 0.6,
            height: 60.0,
            color: [255, 255, 255],
            size: 0.06,
            bound_serial: "LHB-32E3676B".to_string(),
            x: 1.7,
            y: -0.123456789,
            z: 1.73,
        };

        store.save(&calibration).unwrap();
        let first = store.load().unwrap();
        store.save(&first).unwrap();
        let second = store.load().unwrap();

        assert_eq!(first, calibration);
        assert_eq!(second, first);
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ \"x\": 1.0, ").unwrap();

        assert!(matches!(
            store.load(),
            Err(CalibrationError::ConfigCorrupt { .. })
        ));
    }

    #[test]
    fn test_missing_fields_backfilled() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"x": 0.5, "boundSerial": "LHB-1"}"#).unwrap();

        let calibration = store.load().unwrap();
        assert_eq!(calibration.x, 0.5);
        assert_eq!(calibration.bound_serial, "LHB-1");
        assert_eq!(calibration.size, Calibration::default().size);
    }

    #[test]
    fn test_serial_written_under_base_station_key() {
        let json = serde_json::to_value(Calibration::default().with_bound_serial("LHB-2")).unwrap();
        assert_eq!(json["base_station_serial"], "LHB-2");
    }

    #[test]
    fn test_offset_round_trip_through_calibration() {
        let offset = Offset::new(0.1, 0.2, 0.3).nudged(Axis::Y, 0.05);
        let calibration = Calibration::default().with_offset(offset);
        assert_eq!(calibration.offset(), offset);
        assert!((calibration.offset().get(Axis::Y) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("X".parse::<Axis>().unwrap(), Axis::X);
        assert!("w".parse::<Axis>().is_err());
    }
}
