//! Configuration for the floaty terminal app.
//!
//! Settings live in `config.toml` under the platform config directory.
//! A missing file means defaults; missing fields take their defaults too.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use floaty_core::Tuning;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors from loading, saving or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Tuning(#[from] floaty_core::ConfigError),

    #[error("no config directory available on this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of particles to animate.
    pub particles: usize,
    /// Color behind the surface.
    pub background: String,
    /// Color particles are drawn with.
    pub particle_color: String,
    /// Quiet period before an edited particle count is applied.
    pub input_debounce_ms: u64,
    /// Quiet period before a terminal resize resizes the surface.
    pub resize_debounce_ms: u64,
    /// Delay before the configured particle count is first applied.
    pub initial_delay_ms: u64,
    /// Share of the terminal width the surface occupies.
    pub surface_scale: f64,
    /// Width to height ratio of the surface.
    pub surface_ratio: f64,
    /// Motion and timing constants.
    pub tuning: Tuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particles: 19,
            background: "#0458b9".to_string(),
            particle_color: "#ffffff".to_string(),
            input_debounce_ms: 1000,
            resize_debounce_ms: 400,
            initial_delay_ms: 400,
            surface_scale: 0.75,
            surface_ratio: 16.0 / 9.0,
            tuning: Tuning::default(),
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "floaty").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        debug!("saved config to {}", path.display());
        Ok(())
    }

    /// Reject values the app cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.particles == 0 {
            return Err(ConfigError::InvalidValue("particles must be > 0".into()));
        }
        if !(self.surface_scale > 0.0 && self.surface_scale <= 1.0) {
            return Err(ConfigError::InvalidValue(
                "surface_scale must be in (0, 1]".into(),
            ));
        }
        if !(self.surface_ratio.is_finite() && self.surface_ratio > 0.0) {
            return Err(ConfigError::InvalidValue("surface_ratio must be > 0".into()));
        }
        self.background_rgb()?;
        self.particle_rgb()?;
        self.tuning.validate()?;
        Ok(())
    }

    pub fn background_rgb(&self) -> Result<(u8, u8, u8)> {
        parse_hex(&self.background)
    }

    pub fn particle_rgb(&self) -> Result<(u8, u8, u8)> {
        parse_hex(&self.particle_color)
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(color: &str) -> Result<(u8, u8, u8)> {
    let invalid = || ConfigError::InvalidColor(color.to_string());
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}
