//! Host file validation
//!
//! This module provides validation logic for host files.

use crate::config::types::{HostConfig, InputKind, TaskConfig, TaskInput};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Longest accepted `shell_timeout_ms` (one hour)
pub const MAX_SHELL_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Longest accepted `prompt_timeout_secs` (one day)
pub const MAX_PROMPT_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Validate a complete host file
pub fn validate_config(config: &HostConfig) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name at least a program".to_string(),
            ));
        }
    }

    if let Some(ms) = config.shell_timeout_ms {
        if ms == 0 || ms > MAX_SHELL_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "shell_timeout_ms must be between 1 and {}",
                MAX_SHELL_TIMEOUT_MS
            )));
        }
    }

    if let Some(secs) = config.prompt_timeout_secs {
        if secs == 0 || secs > MAX_PROMPT_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "prompt_timeout_secs must be between 1 and {}",
                MAX_PROMPT_TIMEOUT_SECS
            )));
        }
    }

    if config.settings.is_some() && config.settings_file.is_some() {
        return Err(ConfigError::Invalid(
            "settings and settings_file are mutually exclusive".to_string(),
        ));
    }

    if let Some(task) = &config.task {
        validate_task(task)?;
    }

    Ok(())
}

/// Validate the task section
pub fn validate_task(task: &TaskConfig) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for input in &task.inputs {
        if !seen.insert(input.id.as_str()) {
            return Err(ConfigError::DuplicateInput(input.id.clone()));
        }
        validate_input(input)?;
    }
    Ok(())
}

/// Validate a single task input
fn validate_input(input: &TaskInput) -> ConfigResult<()> {
    let invalid = |reason: &str| ConfigError::InvalidInput {
        id: input.id.clone(),
        reason: reason.to_string(),
    };

    // Ids are used inside `${input:id}`, so they must fit the token grammar
    if input.id.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if input.id.contains(['$', '{', '}', ':']) {
        return Err(invalid("id must not contain '$', '{', '}' or ':'"));
    }

    match input.kind {
        InputKind::PromptString => {
            if !input.options.is_empty() {
                return Err(invalid("options are only allowed for pickString"));
            }
        }
        InputKind::PickString => {
            if input.options.is_empty() {
                return Err(invalid("pickString needs at least one option"));
            }
            if input.password {
                return Err(invalid("password is only allowed for promptString"));
            }
            if !input.default.is_empty() && !input.options.contains(&input.default) {
                return Err(invalid("default must be one of the options"));
            }
        }
    }

    Ok(())
}
