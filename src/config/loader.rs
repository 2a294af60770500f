//! Configuration file discovery and loading.

use crate::config::schema::GemsyncConfig;
use crate::error::{GemsyncError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked for in the project root.
pub const CONFIG_FILE_NAME: &str = ".gemsync.yml";

/// A parsed config together with where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: GemsyncConfig,

    /// File the config was read from, if any.
    pub source: Option<PathBuf>,

    /// Directory relative paths in the config are resolved against.
    pub base_dir: PathBuf,
}

/// Find the config file for a project.
///
/// An explicit override always wins, whether or not it exists; otherwise
/// `.gemsync.yml` in the project root is used when present.
pub fn discover_config(project_root: &Path, config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(path.to_path_buf());
    }

    let path = project_root.join(CONFIG_FILE_NAME);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<GemsyncConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GemsyncError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GemsyncError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into GemsyncConfig.
///
/// An empty document yields the default config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<GemsyncConfig> {
    if content.trim().is_empty() {
        return Ok(GemsyncConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| GemsyncError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the config for a project, falling back to defaults when no file
/// exists.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<LoadedConfig> {
    let project_root = std::path::absolute(project_root)?;

    match discover_config(&project_root, config_override) {
        Some(path) => {
            let path = std::path::absolute(&path)?;
            let config = load_config_file(&path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| project_root.clone());
            tracing::debug!("Loaded config from {}", path.display());
            Ok(LoadedConfig {
                config,
                source: Some(path),
                base_dir,
            })
        }
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(LoadedConfig {
                config: GemsyncConfig::default(),
                source: None,
                base_dir: project_root,
            })
        }
    }
}
