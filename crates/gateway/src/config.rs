//! Startup configuration
//!
//! All settings come from environment variables, read once before the
//! listener starts. The auth token deliberately has no default value:
//! startup fails if `TRACKS_AUTH_TOKEN` is unset.

use std::fmt;
use std::path::{Path, PathBuf};

/// Index document used when `TRACKS_MANIFEST` is not set
pub const DEFAULT_MANIFEST_FILE: &str = "TrackIndex.json";

/// Immutable gateway configuration, validated once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the listener binds to
    pub port: u16,
    /// Base directory for track files, always with a trailing slash
    pub music_root: String,
    /// Shared-secret token each request must present
    pub auth_token: String,
    /// Path of the JSON track index document
    pub manifest_path: PathBuf,
}

impl Config {
    /// Build a configuration from environment variables
    ///
    /// * `TRACKS_PORT` - required, must be greater than 0
    /// * `TRACKS_MUSIC_ROOT` - required, must be an existing directory
    /// * `TRACKS_AUTH_TOKEN` - required
    /// * `TRACKS_MANIFEST` - optional, defaults to `TrackIndex.json`
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = required_var("TRACKS_PORT")?;
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        let music_root = required_var("TRACKS_MUSIC_ROOT")?;
        let auth_token = required_var("TRACKS_AUTH_TOKEN")?;
        let manifest_path = std::env::var("TRACKS_MANIFEST")
            .unwrap_or_else(|_| DEFAULT_MANIFEST_FILE.to_string());

        Config::new(port, music_root, auth_token, PathBuf::from(manifest_path))
    }

    /// Validate and normalize raw configuration values
    pub fn new(
        port: u16,
        music_root: impl Into<String>,
        auth_token: impl Into<String>,
        manifest_path: PathBuf,
    ) -> Result<Self, ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port.to_string()));
        }

        let mut music_root = music_root.into();
        if !Path::new(&music_root).is_dir() {
            return Err(ConfigError::MusicRootMissing(music_root));
        }
        if !music_root.ends_with('/') {
            music_root.push('/');
        }

        Ok(Config {
            port,
            music_root,
            auth_token: auth_token.into(),
            manifest_path,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

/// Errors raised while building the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    MissingVar(&'static str),
    /// Port is zero or not a number in the u16 range
    InvalidPort(String),
    /// Music root does not exist or is not a directory
    MusicRootMissing(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => {
                write!(f, "Environment variable '{}' is required", name)
            }
            ConfigError::InvalidPort(value) => {
                write!(f, "Port is required and should be greater than 0, got '{}'", value)
            }
            ConfigError::MusicRootMissing(path) => {
                write!(f, "Music root is not a valid directory: {}", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
