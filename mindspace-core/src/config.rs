//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/mindspace/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/mindspace/` (~/.config/mindspace/)
//! - Data: `$XDG_DATA_HOME/mindspace/` (~/.local/share/mindspace/)
//! - State/Logs: `$XDG_STATE_HOME/mindspace/` (~/.local/state/mindspace/)

use crate::breathing::{PatternKey, ProfileKind};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Meditation session settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Breathing exercise settings
    #[serde(default)]
    pub breathing: BreathingConfig,

    /// Mood tracking settings
    #[serde(default)]
    pub mood: MoodConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Meditation session configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Length of a meditation session in minutes
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
        }
    }
}

fn default_duration_minutes() -> u32 {
    10
}

/// Breathing exercise configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BreathingConfig {
    /// Pattern selected when none is given on the command line
    #[serde(default)]
    pub pattern: PatternKey,

    /// Visual constants preset for the breathing sphere
    #[serde(default)]
    pub profile: ProfileKind,

    /// Exponential smoothing rate applied to the sphere scale (per second)
    #[serde(default = "default_smoothing_rate")]
    pub smoothing_rate: f64,

    /// Frames per second for the render loop
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            pattern: PatternKey::default(),
            profile: ProfileKind::default(),
            smoothing_rate: default_smoothing_rate(),
            frame_rate: default_frame_rate(),
        }
    }
}

fn default_smoothing_rate() -> f64 {
    3.0
}

fn default_frame_rate() -> u32 {
    30
}

/// Mood tracking configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MoodConfig {
    /// Trailing window (days) used by dashboard reports
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Session type recorded when none is given
    #[serde(default = "default_session_type")]
    pub session_type: String,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            session_type: default_session_type(),
        }
    }
}

fn default_window_days() -> u32 {
    7
}

fn default_session_type() -> String {
    "meditation".to_string()
}

/// Dashboard windows offered by the mood dashboard
pub const MOOD_WINDOWS: [u32; 3] = [7, 30, 90];

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the session timer or render loop
    pub fn validate(&self) -> Result<()> {
        if self.session.duration_minutes == 0 {
            return Err(Error::Config(
                "session.duration_minutes must be at least 1".to_string(),
            ));
        }
        if self.breathing.frame_rate == 0 || self.breathing.frame_rate > 240 {
            return Err(Error::Config(
                "breathing.frame_rate must be between 1 and 240".to_string(),
            ));
        }
        if !self.breathing.smoothing_rate.is_finite() || self.breathing.smoothing_rate <= 0.0 {
            return Err(Error::Config(
                "breathing.smoothing_rate must be a positive number".to_string(),
            ));
        }
        if !MOOD_WINDOWS.contains(&self.mood.window_days) {
            return Err(Error::Config(format!(
                "mood.window_days must be one of {:?}",
                MOOD_WINDOWS
            )));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/mindspace/config.toml` (~/.config/mindspace/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("mindspace").join("config.toml")
    }

    /// Returns the data directory path (for the mood store)
    ///
    /// `$XDG_DATA_HOME/mindspace/` (~/.local/share/mindspace/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("mindspace")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/mindspace/` (~/.local/state/mindspace/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("mindspace")
    }

    /// Returns the mood store file path
    ///
    /// `$XDG_DATA_HOME/mindspace/mood.db` (~/.local/share/mindspace/mood.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("mood.db")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// Gives the CLI stable path behavior before any other component reads
    /// these variables.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
