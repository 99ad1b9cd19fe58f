use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{CONFIG_VERSION_KEY, MODULE_VERSION_KEY};
use crate::error::{Result, VersionSyncError};

/// Name of the tool configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "versionsync.toml";

/// Represents the complete configuration for version-sync.
///
/// Names the two version-bearing documents and the keys holding the version in each.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub keys: KeysConfig,
}

fn default_config_file() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_module_file() -> PathBuf {
    PathBuf::from("mqtt_docker_controller").join("__init__.py")
}

fn default_config_key() -> String {
    CONFIG_VERSION_KEY.to_string()
}

fn default_module_key() -> String {
    MODULE_VERSION_KEY.to_string()
}

/// Locations of the config and module documents, relative to the project root
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_config_file")]
    pub config: PathBuf,

    #[serde(default = "default_module_file")]
    pub module: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            config: default_config_file(),
            module: default_module_file(),
        }
    }
}

/// Assignment keys holding the version in each document
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct KeysConfig {
    #[serde(default = "default_config_key")]
    pub config: String,

    #[serde(default = "default_module_key")]
    pub module: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            config: default_config_key(),
            module: default_module_key(),
        }
    }
}

/// Absolute document paths for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub module_file: PathBuf,
}

impl Config {
    /// Resolve the configured document paths against `root`.
    ///
    /// Absolute paths in the configuration are kept as they are.
    pub fn layout(&self, root: &Path) -> ProjectLayout {
        ProjectLayout {
            root: root.to_path_buf(),
            config_file: root.join(&self.files.config),
            module_file: root.join(&self.files.module),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionsync.toml` in the project root
/// 3. `.versionsync.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_root` - Directory holding the project's documents
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or the custom path is missing
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        if !path.exists() {
            return Err(VersionSyncError::config(format!(
                "{} does not exist",
                path.display()
            )));
        }
        path.to_path_buf()
    } else if project_root.join(CONFIG_FILE_NAME).exists() {
        project_root.join(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_path.exists() {
            user_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    read_config_file(&path)
}

/// Parse a single configuration file
pub fn read_config_file(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        VersionSyncError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| VersionSyncError::config(format!("invalid {}: {}", path.display(), e)))
}

/// Walks up from `start` to the first directory containing any of `markers`.
///
/// # Returns
/// * `Some(dir)` - The nearest ancestor (or `start` itself) holding a marker
/// * `None` - If no ancestor holds one
pub fn find_project_root(start: &Path, markers: &[&Path]) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}
