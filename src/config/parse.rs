//! Host file parsing and discovery

use crate::config::types::HostConfig;
use crate::error::{ConfigError, ConfigResult, TaskVarsError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default host file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["taskvars.yml", "taskvars.yaml"];

/// Find the host file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the host file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                // Reached root without finding a host file
                return Err(ConfigError::NotFound(searched_paths.join(", ")));
            }
        }
    }
}

/// Parse a host file from a path
pub fn parse_config_file(path: &Path) -> Result<HostConfig, TaskVarsError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read file: {}", e)))?;

    parse_config(&contents, Some(path))
}

/// Parse a host file from a string
///
/// Relative paths in the file are resolved against the directory of
/// `config_path` when one is given.
pub fn parse_config(yaml: &str, config_path: Option<&Path>) -> Result<HostConfig, TaskVarsError> {
    // An empty file is a valid, empty host description
    let mut config: HostConfig = if yaml.trim().is_empty() {
        HostConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    if let Some(path) = config_path {
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        resolve_relative_paths(&mut config, base_dir);
    }

    Ok(config)
}

/// Make file references in the host file absolute
fn resolve_relative_paths(config: &mut HostConfig, base_dir: &Path) {
    let absolutize = |path: &mut PathBuf| {
        if path.is_relative() {
            *path = base_dir.join(&*path);
        }
    };

    if let Some(file) = config.settings_file.as_mut() {
        absolutize(file);
    }
    if let Some(notebook) = config.notebook.as_mut() {
        absolutize(&mut notebook.root);
    }
    if let Some(buffer) = config.buffer.as_mut() {
        absolutize(&mut buffer.path);
        if let Some(root) = buffer.notebook_root.as_mut() {
            absolutize(root);
        }
    }
    if let Some(task) = config.task.as_mut() {
        absolutize(&mut task.file);
    }
}

/// Parse a host file with automatic discovery
pub fn parse_config_auto() -> Result<(HostConfig, PathBuf), TaskVarsError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}
