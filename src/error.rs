//! Error types for taskvars

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for taskvars operations
pub type Result<T> = std::result::Result<T, TaskVarsError>;

/// Main error type for taskvars
#[derive(Error, Debug)]
pub enum TaskVarsError {
    /// Host configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Variable evaluation errors
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host file parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find host file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task input '{0}' is defined more than once")]
    DuplicateInput(String),

    #[error("Invalid task input '{id}': {reason}")]
    InvalidInput { id: String, reason: String },

    #[error("Failed to read settings file '{path}': {error}")]
    SettingsFile { path: PathBuf, error: String },

    #[error("Failed to read env file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Errors raised while expanding a template
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Malformed path expression: {0}")]
    MalformedPath(String),

    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Unknown argument '{argument}' for variable '{variable}'")]
    UnknownArgument { variable: String, argument: String },

    #[error("Task input '{0}' is not defined")]
    UnknownInput(String),

    #[error("No prompt available to ask for input '{0}'")]
    PromptUnavailable(String),

    #[error("Prompt for '{id}' timed out after {timeout:?}")]
    PromptTimeout { id: String, timeout: Duration },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Failed to launch shell command '{command}': {error}")]
    ShellLaunch { command: String, error: String },

    #[error("Shell command '{command}' did not finish within {timeout:?}")]
    ShellTimeout { command: String, timeout: Duration },

    #[error("Cancelled by user")]
    Cancelled,
}

impl EvalError {
    /// Whether this error is a user cancellation rather than a failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, EvalError::Cancelled)
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for evaluation operations
pub type EvalResult<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_distinguishable() {
        assert!(EvalError::Cancelled.is_cancellation());
        assert!(!EvalError::MalformedPath("a[".to_string()).is_cancellation());
    }

    #[test]
    fn test_error_messages() {
        let err = EvalError::UnknownArgument {
            variable: "magic".to_string(),
            argument: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown argument 'nope' for variable 'magic'");

        let wrapped: TaskVarsError = EvalError::MalformedPath("a.b[x]".to_string()).into();
        assert_eq!(
            wrapped.to_string(),
            "Evaluation error: Malformed path expression: a.b[x]"
        );
    }
}
