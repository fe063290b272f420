//! Turning a host file into an evaluation context

use crate::config::types::{FolderOverrides, HostConfig};
use crate::engine::context::{Buffer, Context, Folders, Notebook, TaskInfo};
use crate::engine::jsonpath::JsonValue;
use crate::engine::prompt::DEFAULT_PROMPT_TIMEOUT;
use crate::error::{ConfigError, ConfigResult, TaskVarsError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Build a context from a parsed host file
///
/// `base_dir` anchors the env file patterns. The returned context has no
/// prompter; hosts attach one when they can interact with the user.
pub fn build_context(config: &HostConfig, base_dir: &Path) -> Result<Context, TaskVarsError> {
    let mut ctx = Context::new();

    if let Some(nb) = &config.notebook {
        ctx = ctx.with_notebook(Notebook {
            root_folder: nb.root.clone(),
            name: nb.name.clone(),
            description: nb.description.clone(),
        });
    }

    if let Some(buf) = &config.buffer {
        // Without an explicit owner, the current notebook owns documents under its root
        let notebook_root = buf.notebook_root.clone().or_else(|| {
            config
                .notebook
                .as_ref()
                .filter(|nb| buf.path.starts_with(&nb.root))
                .map(|nb| nb.root.clone())
        });

        ctx = ctx.with_buffer(Buffer {
            path: buf.path.clone(),
            notebook_root,
            selected_text: buf.selected_text.clone(),
        });
    }

    if let Some(task) = &config.task {
        ctx = ctx.with_task(TaskInfo {
            file: task.file.clone(),
            cwd: task.cwd.clone(),
            label: task.label.clone(),
            inputs: task.inputs.clone(),
        });
    }

    let notebook_root = config.notebook.as_ref().map(|nb| nb.root.as_path());
    let folders = Folders::discover(&ctx.exe_file, notebook_root);
    ctx = ctx.with_folders(apply_overrides(folders, &config.folders));

    ctx = ctx.with_settings(load_settings(config)?);

    let mut env = ctx.env.clone();
    env.extend(load_env_files(&config.env_files, base_dir)?);
    ctx = ctx.with_env(env);

    if let Some(interpreter) = &config.interpreter {
        ctx = ctx.with_interpreter(interpreter.clone());
    }
    if let Some(ms) = config.shell_timeout_ms {
        ctx = ctx.with_shell_timeout(Duration::from_millis(ms));
    }

    Ok(ctx)
}

/// Prompt timeout configured in the host file
pub fn prompt_timeout(config: &HostConfig) -> Duration {
    config
        .prompt_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_PROMPT_TIMEOUT)
}

fn apply_overrides(mut folders: Folders, overrides: &FolderOverrides) -> Folders {
    let pairs = [
        (&mut folders.notebook_task, &overrides.notebook_task),
        (&mut folders.user_task, &overrides.user_task),
        (&mut folders.app_task, &overrides.app_task),
        (&mut folders.user_theme, &overrides.user_theme),
        (&mut folders.app_theme, &overrides.app_theme),
        (&mut folders.user_docs, &overrides.user_docs),
        (&mut folders.app_docs, &overrides.app_docs),
    ];
    for (folder, overridden) in pairs {
        if let Some(path) = overridden {
            *folder = path.clone();
        }
    }
    folders
}

/// Load the configuration document, inline or from its JSON file
fn load_settings(config: &HostConfig) -> Result<JsonValue, TaskVarsError> {
    if let Some(settings) = &config.settings {
        return Ok(JsonValue::from(settings.clone()));
    }

    let Some(path) = &config.settings_file else {
        return Ok(JsonValue::Undefined);
    };

    debug!(path = %path.display(), "loading settings file");
    let settings_error = |error: String| ConfigError::SettingsFile {
        path: path.clone(),
        error,
    };
    let contents = fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| settings_error(e.to_string()))?;

    Ok(JsonValue::from(value))
}

/// Read every env file matching `patterns`; later files win
pub fn load_env_files(patterns: &[String], base_dir: &Path) -> ConfigResult<HashMap<String, String>> {
    let mut vars = HashMap::new();

    for pattern in patterns {
        let full_pattern = base_dir.join(pattern);
        let full_pattern = full_pattern.to_string_lossy();

        let entries = glob::glob(&full_pattern).map_err(|e| {
            ConfigError::Invalid(format!("Invalid env file pattern '{}': {}", pattern, e))
        })?;

        let mut matched = 0;
        for entry in entries {
            let path = entry.map_err(|e| ConfigError::EnvFile {
                path: e.path().to_path_buf(),
                error: e.to_string(),
            })?;
            vars.extend(read_env_file(&path)?);
            matched += 1;
        }

        if matched == 0 {
            debug!(pattern = %pattern, "env file pattern matched nothing");
        }
    }

    Ok(vars)
}

fn read_env_file(path: &PathBuf) -> ConfigResult<Vec<(String, String)>> {
    let env_error = |error: String| ConfigError::EnvFile {
        path: path.clone(),
        error,
    };

    debug!(path = %path.display(), "reading env file");
    dotenvy::from_path_iter(path)
        .map_err(|e| env_error(e.to_string()))?
        .map(|item| item.map_err(|e| env_error(e.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_context_sections() {
        let yaml = r#"
notebook:
  root: /notes
  name: Notes
buffer:
  path: /notes/daily/today.md
  selected_text: hello
task:
  file: /notes/.taskvars/tasks/build.json
  label: Build
interpreter: [bash, -c]
shell_timeout_ms: 250
folders:
  user_task: /custom/tasks
settings:
  editor:
    tabs: [2, 4]
"#;
        let config = parse_config(yaml, None).unwrap();
        let ctx = build_context(&config, Path::new("/")).unwrap();

        assert_eq!(ctx.notebook.as_ref().unwrap().name, "Notes");
        let buffer = ctx.buffer.as_ref().unwrap();
        assert_eq!(buffer.notebook_root, Some(PathBuf::from("/notes")));
        assert_eq!(buffer.selected_text, "hello");
        assert_eq!(ctx.task.as_ref().unwrap().label, "Build");
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
        assert_eq!(ctx.shell_timeout, Duration::from_millis(250));
        assert_eq!(ctx.folders.user_task, PathBuf::from("/custom/tasks"));
        assert_eq!(ctx.folders.notebook_task, PathBuf::from("/notes/.taskvars/tasks"));
        assert_eq!(
            crate::engine::jsonpath::evaluate(&ctx.settings, "editor.tabs[0]").unwrap(),
            "2"
        );
    }

    #[test]
    fn test_buffer_outside_notebook_has_no_owner() {
        let yaml = r#"
notebook:
  root: /notes
buffer:
  path: /tmp/scratch.md
"#;
        let config = parse_config(yaml, None).unwrap();
        let ctx = build_context(&config, Path::new("/")).unwrap();
        assert_eq!(ctx.buffer.unwrap().notebook_root, None);
    }

    #[test]
    fn test_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("settings.json"), r#"{"theme": "dark"}"#).unwrap();
        let host_path = temp_dir.path().join("taskvars.yml");

        let config = parse_config("settings_file: settings.json", Some(host_path.as_path())).unwrap();
        let ctx = build_context(&config, temp_dir.path()).unwrap();
        assert_eq!(
            crate::engine::jsonpath::evaluate(&ctx.settings, "theme").unwrap(),
            "dark"
        );
    }

    #[test]
    fn test_missing_settings_file() {
        let config = parse_config("settings_file: /nonexistent/settings.json", None).unwrap();
        let result = build_context(&config, Path::new("/"));
        assert!(matches!(
            result,
            Err(TaskVarsError::Config(ConfigError::SettingsFile { .. }))
        ));
    }

    #[test]
    fn test_env_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("env")).unwrap();
        fs::write(temp_dir.path().join(".env"), "GREETING=hello\nTARGET=base\n").unwrap();
        fs::write(temp_dir.path().join("env/local.env"), "TARGET=local\n").unwrap();

        let vars = load_env_files(
            &[".env".to_string(), "env/*.env".to_string()],
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(vars.get("GREETING"), Some(&"hello".to_string()));
        assert_eq!(vars.get("TARGET"), Some(&"local".to_string()));
    }

    #[test]
    fn test_env_pattern_without_match() {
        let temp_dir = TempDir::new().unwrap();
        let vars = load_env_files(&["missing.env".to_string()], temp_dir.path()).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_prompt_timeout() {
        let config = parse_config("prompt_timeout_secs: 5", None).unwrap();
        assert_eq!(prompt_timeout(&config), Duration::from_secs(5));
        assert_eq!(prompt_timeout(&HostConfig::default()), DEFAULT_PROMPT_TIMEOUT);
    }
}
