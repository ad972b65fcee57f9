#![warn(clippy::all, clippy::pedantic)]

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::info;

use super::Config;

// Fallback when no user config directory is available
const LOCAL_CONFIG_PATH: &str = "config/polyfall.toml";

/// Reads the gameplay configuration from disk. A missing file is not an
/// error: the defaults are written out so the player has a template to
/// edit, then returned.
pub fn load_config_from_file() -> Result<Config, ConfigError> {
    let path = config_file_path();

    if !path.exists() {
        let defaults = Config::default();
        save_config_to_file(&defaults)?;
        info!("Wrote default config to {}", path.display());
        return Ok(defaults);
    }

    let contents = fs::read_to_string(&path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

/// Serializes the configuration to its TOML file, creating the parent
/// directory when needed.
pub fn save_config_to_file(config: &Config) -> Result<(), ConfigError> {
    let path = config_file_path();

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&path, toml::to_string_pretty(config)?)?;
    Ok(())
}

/// Resolution order: the `POLYFALL_CONFIG` environment variable, then the
/// user config directory, then a path relative to the working directory.
#[must_use]
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("POLYFALL_CONFIG") {
        return PathBuf::from(path);
    }

    dirs::config_dir().map_or_else(
        || PathBuf::from(LOCAL_CONFIG_PATH),
        |dir| dir.join("polyfall").join("config.toml"),
    )
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config file I/O failed: {err}"),
            ConfigError::Parse(err) => write!(f, "config file is not valid TOML: {err}"),
            ConfigError::Serialize(err) => write!(f, "config could not be serialized: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
