//! Configuration loading and typed config structures for Fixation.
//!
//! The canonical configuration lives in `fixation-config.yaml` at the project
//! root. Every section and field is optional; anything missing falls back to
//! the defaults below. [`FixationConfig::validate`] must pass before the
//! config is used to build characters.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use validator::Validate;

use fixation_eye::{EyeError, EyeMovementConfig};
use fixation_poi::{PoiConfig, PoiError, ViewAngle};

use crate::scene_targets::SceneTargetConfig;

/// Log levels accepted by [`LoggingConfig::level`].
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The `eye` section is out of range.
    #[error("eye section: {source}")]
    Eye {
        /// The underlying eye config error.
        #[from]
        source: EyeError,
    },

    /// The `poi` or `view_angle` section is out of range.
    #[error("poi section: {source}")]
    Poi {
        /// The underlying selection config error.
        #[from]
        source: PoiError,
    },

    /// A `world`, `scene_targets`, or `logging` field is out of range.
    #[error("invalid config: {source}")]
    Invalid {
        /// The underlying field-level validation errors.
        #[from]
        source: validator::ValidationErrors,
    },

    /// `logging.level` is not a known level.
    #[error("unknown log level `{level}`")]
    UnknownLogLevel {
        /// The rejected level.
        level: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `fixation-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FixationConfig {
    /// Seed and frame timing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Fixational eye movement parameters.
    #[serde(default)]
    pub eye: EyeMovementConfig,

    /// Point-of-interest selection parameters.
    #[serde(default)]
    pub poi: PoiConfig,

    /// View-cone half-angles (degrees).
    #[serde(default)]
    pub view_angle: ViewAngle,

    /// Weights for candidates generated from scene characters.
    #[serde(default)]
    pub scene_targets: SceneTargetConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FixationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The result is not validated; call [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty string yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every section, including cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first failing section's error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.eye.check()?;
        self.poi.check()?;
        self.view_angle.check()?;
        self.scene_targets.validate()?;
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::UnknownLogLevel {
                level: self.logging.level.clone(),
            });
        }
        Ok(())
    }
}

/// Seed and frame timing.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Frames per simulated second.
    #[serde(default = "default_frame_rate")]
    #[validate(range(min = 1.0, max = 1000.0))]
    pub frame_rate: f32,

    /// Number of frames the engine runs.
    #[serde(default = "default_ticks")]
    #[validate(range(min = 1))]
    pub ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            frame_rate: default_frame_rate(),
            ticks: default_ticks(),
        }
    }
}

impl WorldConfig {
    /// Seconds per frame.
    pub fn frame_delta(&self) -> f32 {
        self.frame_rate.recip()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write one JSON selection snapshot per character per frame here.
    #[serde(default)]
    pub debug_trace: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            debug_trace: None,
        }
    }
}

const fn default_seed() -> u64 {
    42
}

const fn default_frame_rate() -> f32 {
    30.0
}

const fn default_ticks() -> u64 {
    1800
}

fn default_log_level() -> String {
    "info".to_owned()
}
