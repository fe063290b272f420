//! Host file types
//!
//! This module defines the data structures that represent a taskvars.yml host
//! file: the notebook, document and task state a host would otherwise supply
//! programmatically.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level host file structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostConfig {
    /// Current notebook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook: Option<NotebookConfig>,

    /// Current document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<BufferConfig>,

    /// Task whose strings are expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskConfig>,

    /// Overrides for well-known folders
    #[serde(default)]
    pub folders: FolderOverrides,

    /// Interpreter for shell variables (e.g., ["bash", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Timeout for shell variables, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_timeout_ms: Option<u64>,

    /// Timeout for interactive prompts, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_timeout_secs: Option<u64>,

    /// Env file glob patterns, relative to the host file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_files: Vec<String>,

    /// Inline configuration document for `${config:path}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,

    /// JSON configuration document, relative to the host file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
}

/// Notebook section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotebookConfig {
    /// Root folder of the notebook
    pub root: PathBuf,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Document section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BufferConfig {
    /// Full path of the document
    pub path: PathBuf,

    /// Notebook owning the document (defaults to the current notebook when
    /// the document lives under its root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_root: Option<PathBuf>,

    #[serde(default)]
    pub selected_text: String,
}

/// Task section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskConfig {
    /// File the task is defined in
    pub file: PathBuf,

    /// Working directory, relative to the task file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub label: String,

    /// Inputs referenced by `${input:id}`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<TaskInput>,
}

/// A user input a task may ask for
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskInput {
    /// Identifier used in `${input:id}`
    pub id: String,

    /// How the value is collected
    #[serde(rename = "type")]
    pub kind: InputKind,

    #[serde(default)]
    pub description: String,

    /// Value used when the user enters nothing
    #[serde(default)]
    pub default: String,

    /// Hide typed characters
    #[serde(default)]
    pub password: bool,

    /// Choices for `pickString`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Kind of task input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    /// Free text
    PromptString,

    /// One of a fixed list of options
    PickString,
}

/// Optional overrides for the well-known folders
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FolderOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_task: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_task: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_task: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_theme: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_theme: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_docs: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_docs: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_names() {
        let input: TaskInput = serde_yaml::from_str(
            r#"
id: flavor
type: pickString
options: [a, b]
"#,
        )
        .unwrap();

        assert_eq!(input.kind, InputKind::PickString);
        assert_eq!(input.options, vec!["a", "b"]);
        assert!(!input.password);
        assert!(input.default.is_empty());
    }

    #[test]
    fn test_unknown_input_kind_rejected() {
        let result: Result<TaskInput, _> = serde_yaml::from_str("id: x\ntype: promptNumber\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_host_config() {
        let config: HostConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.notebook.is_none());
        assert!(config.env_files.is_empty());
        assert!(config.folders.user_task.is_none());
    }
}
