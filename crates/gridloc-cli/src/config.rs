//! Configuration Vault – reads/writes `~/.gridloc/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridloc_perception::checked_cell_count;
use gridloc_runtime::{LocalizerConfig, MATCH, SensorModel, THRESHOLD};
use gridloc_types::{GridError, Heading, Pose};

/// Persisted user configuration stored in `~/.gridloc/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Map resource to localize on.
    #[serde(default = "default_map_path")]
    pub map_path: PathBuf,

    /// Grid width in intersections.  Map files do not store their size.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in intersections.
    #[serde(default = "default_height")]
    pub height: usize,

    /// Best weight required to accept a pose estimate.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Weight added to a particle whose predicted view matches.
    #[serde(default = "default_match_increment")]
    pub match_increment: f64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Wall-clock limit on localization, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// True starting pose of the simulated robot.
    #[serde(default)]
    pub start_x: usize,
    #[serde(default)]
    pub start_y: usize,
    #[serde(default = "default_start_heading")]
    pub start_heading: Heading,

    /// Raw color samples per filtered reading on the simulated sensor.
    #[serde(default = "default_sensor_samples")]
    pub sensor_samples: usize,

    /// Write the JSON mission report here when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

fn default_map_path() -> PathBuf {
    PathBuf::from("maps/demo.map")
}
fn default_width() -> usize {
    3
}
fn default_height() -> usize {
    5
}
fn default_threshold() -> f64 {
    THRESHOLD
}
fn default_match_increment() -> f64 {
    MATCH
}
fn default_max_iterations() -> usize {
    64
}
fn default_start_heading() -> Heading {
    Heading::North
}
fn default_sensor_samples() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_path: default_map_path(),
            width: default_width(),
            height: default_height(),
            threshold: default_threshold(),
            match_increment: default_match_increment(),
            max_iterations: default_max_iterations(),
            timeout_secs: None,
            start_x: 0,
            start_y: 0,
            start_heading: default_start_heading(),
            sensor_samples: default_sensor_samples(),
            report_path: None,
        }
    }
}

impl Config {
    /// Reject values the localizer cannot run with.
    pub fn validate(&self) -> Result<(), GridError> {
        checked_cell_count(self.width, self.height)?;
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(GridError::InvalidConfig(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if !(self.match_increment > 0.0 && self.match_increment.is_finite()) {
            return Err(GridError::InvalidConfig(format!(
                "match_increment must be positive, got {}",
                self.match_increment
            )));
        }
        if self.start_x >= self.width || self.start_y >= self.height {
            return Err(GridError::InvalidConfig(format!(
                "start ({}, {}) is outside the {}x{} grid",
                self.start_x, self.start_y, self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn localizer_config(&self) -> LocalizerConfig {
        LocalizerConfig {
            threshold: self.threshold,
            sensor_model: SensorModel::new(self.match_increment),
            max_iterations: self.max_iterations,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn start_pose(&self) -> Pose {
        Pose::new(self.start_x, self.start_y, self.start_heading)
    }
}

/// Return the path to `~/.gridloc/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".gridloc").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, GridError> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, GridError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| GridError::Io(format!("failed to read config at {}: {e}", path.display())))?;
    let mut cfg: Config = toml::from_str(&raw)
        .map_err(|e| GridError::InvalidConfig(format!("failed to parse config: {e}")))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `GRIDLOC_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `GRIDLOC_MAP` | `map_path` |
/// | `GRIDLOC_MAX_ITERATIONS` | `max_iterations` |
/// | `GRIDLOC_THRESHOLD` | `threshold` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("GRIDLOC_MAP") {
        cfg.map_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("GRIDLOC_MAX_ITERATIONS")
        && let Ok(n) = v.parse::<usize>()
    {
        cfg.max_iterations = n;
    }
    if let Ok(v) = std::env::var("GRIDLOC_THRESHOLD")
        && let Ok(t) = v.parse::<f64>()
    {
        cfg.threshold = t;
    }
}

/// Save the config to disk, creating `~/.gridloc/` if necessary.
pub fn save(cfg: &Config) -> Result<(), GridError> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), GridError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| GridError::Io(format!("failed to create config directory: {e}")))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| GridError::InvalidConfig(format!("failed to serialize config: {e}")))?;
    fs::write(path, raw)
        .map_err(|e| GridError::Io(format!("failed to write config at {}: {e}", path.display())))
}
