//! Configuration file handling for ascii-mosaic.
//!
//! Loads configuration from `<config dir>/ascii-mosaic/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::mosaic::{RenderOptions, DEFAULT_CLIP_LIMIT, DEFAULT_TILES};

/// Configuration file structure for ascii-mosaic.
/// Loaded from the user config dir (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelConfig {
    /// Trained model blob; the built-in model is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub optimize: bool,
    #[serde(default = "default_tiles")]
    pub tiles_x: usize,
    #[serde(default = "default_tiles")]
    pub tiles_y: usize,
    #[serde(default = "default_clip_limit")]
    pub clip_limit: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_blocks: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            tiles_x: DEFAULT_TILES,
            tiles_y: DEFAULT_TILES,
            clip_limit: DEFAULT_CLIP_LIMIT,
            max_blocks: None,
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            tiles_y: self.tiles_y,
            tiles_x: self.tiles_x,
            clip_limit: self.clip_limit,
            max_blocks: self.max_blocks,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tiles() -> usize {
    DEFAULT_TILES
}

fn default_clip_limit() -> u8 {
    DEFAULT_CLIP_LIMIT
}

/// Commented default configuration written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-mosaic configuration

[model]
# Trained model blob (default: built-in model)
# path = "/path/to/model.bin"

[render]
# Equalize local contrast before classification
optimize = true
# Equalization tile grid (1-16 per axis)
tiles_x = 8
tiles_y = 8
# Histogram clip limit, in multiples of the uniform bin height
clip_limit = 3
# Refuse images with more blocks than this
# max_blocks = 307200
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-mosaic").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-mosaic/config.toml")
        })
}
