//! Evaluation context
//!
//! The context is the read-only bundle of host state handed to every resolver.
//! The engine passes it through untouched.

use crate::config::TaskInput;
use crate::engine::jsonpath::JsonValue;
use crate::engine::prompt::Prompter;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default time a `shell:` command may run
pub const DEFAULT_SHELL_TIMEOUT: Duration = Duration::from_millis(1000);

/// The notebook currently selected by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notebook {
    /// Absolute root folder of the notebook
    pub root_folder: PathBuf,

    /// Display name
    pub name: String,

    pub description: String,
}

/// The document (buffer) currently focused by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    /// Full path of the document
    pub path: PathBuf,

    /// Root of the notebook owning the document, if it lives in one
    pub notebook_root: Option<PathBuf>,

    /// Text currently selected in the document view
    pub selected_text: String,
}

impl Buffer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Buffer {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// The task definition whose strings are being expanded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskInfo {
    /// File the task was defined in
    pub file: PathBuf,

    /// Working directory option as written in the task
    pub cwd: Option<PathBuf>,

    /// Label shown as prompt title
    pub label: String,

    /// User inputs referenced by `${input:id}`
    pub inputs: Vec<TaskInput>,
}

impl TaskInfo {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        TaskInfo {
            file: file.into(),
            ..Default::default()
        }
    }

    /// Directory containing the task file
    pub fn dir(&self) -> PathBuf {
        self.file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Working directory with relative `cwd` resolved against the task dir
    pub fn working_dir(&self) -> PathBuf {
        match &self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => self.dir().join(cwd),
            None => self.dir(),
        }
    }

    /// Find an input by id
    pub fn input(&self, id: &str) -> Option<&TaskInput> {
        self.inputs.iter().find(|input| input.id == id)
    }
}

/// Well-known folder locations, pre-resolved by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folders {
    pub notebook_task: PathBuf,
    pub user_task: PathBuf,
    pub app_task: PathBuf,
    pub user_theme: PathBuf,
    pub app_theme: PathBuf,
    pub user_docs: PathBuf,
    pub app_docs: PathBuf,
}

impl Folders {
    /// Default locations: user folders under the platform config/data dirs,
    /// app folders next to the executable, notebook tasks inside the notebook
    pub fn discover(exe_file: &Path, notebook_root: Option<&Path>) -> Self {
        let app_dir = exe_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let (user_config, user_data) = match ProjectDirs::from("", "", "taskvars") {
            Some(dirs) => (
                dirs.config_dir().to_path_buf(),
                dirs.data_dir().to_path_buf(),
            ),
            None => (app_dir.clone(), app_dir.clone()),
        };

        Folders {
            notebook_task: notebook_root
                .map(|root| root.join(".taskvars").join("tasks"))
                .unwrap_or_default(),
            user_task: user_config.join("tasks"),
            app_task: app_dir.join("tasks"),
            user_theme: user_config.join("themes"),
            app_theme: app_dir.join("themes"),
            user_docs: user_data.join("docs"),
            app_docs: app_dir.join("docs"),
        }
    }
}

/// Read-only state given to every resolver
#[derive(Clone)]
pub struct Context {
    /// Current notebook, if any
    pub notebook: Option<Notebook>,

    /// Current document, if any
    pub buffer: Option<Buffer>,

    /// Task being expanded, if any
    pub task: Option<TaskInfo>,

    /// Path of the running executable
    pub exe_file: PathBuf,

    /// Well-known folders
    pub folders: Folders,

    /// Configuration document for `${config:path}`
    pub settings: JsonValue,

    /// Environment for `${env:NAME}` and `${shell:...}`
    pub env: HashMap<String, String>,

    /// Interpreter for `${shell:...}` (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Longest time a `${shell:...}` command may run
    pub shell_timeout: Duration,

    /// Asks the user for `${input:id}` values
    pub prompter: Option<Arc<dyn Prompter>>,
}

impl Context {
    /// Create a context from the running process: executable path,
    /// environment and default folders, with no notebook, buffer or task
    pub fn new() -> Self {
        let exe_file = env::current_exe().unwrap_or_default();
        let folders = Folders::discover(&exe_file, None);

        Context {
            notebook: None,
            buffer: None,
            task: None,
            exe_file,
            folders,
            settings: JsonValue::Undefined,
            env: utf8_env(env::vars_os()),
            interpreter: default_interpreter(),
            shell_timeout: DEFAULT_SHELL_TIMEOUT,
            prompter: None,
        }
    }

    /// Set the current notebook
    pub fn with_notebook(mut self, notebook: Notebook) -> Self {
        self.notebook = Some(notebook);
        self
    }

    /// Set the current document
    pub fn with_buffer(mut self, buffer: Buffer) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Set the task being expanded
    pub fn with_task(mut self, task: TaskInfo) -> Self {
        self.task = Some(task);
        self
    }

    /// Set the executable path
    pub fn with_exe_file(mut self, exe_file: PathBuf) -> Self {
        self.exe_file = exe_file;
        self
    }

    /// Set the well-known folders
    pub fn with_folders(mut self, folders: Folders) -> Self {
        self.folders = folders;
        self
    }

    /// Set the configuration document
    pub fn with_settings(mut self, settings: JsonValue) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the environment
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set the shell timeout
    pub fn with_shell_timeout(mut self, timeout: Duration) -> Self {
        self.shell_timeout = timeout;
        self
    }

    /// Set the prompter used for task inputs
    pub fn with_prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    /// Working directory for spawned commands: the task's, else the process's
    pub fn working_dir(&self) -> PathBuf {
        match &self.task {
            Some(task) => task.working_dir(),
            None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment entries whose name and value are both valid UTF-8
fn utf8_env<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (name, _) => {
                debug!(name = ?name, "skipping environment variable that isn't UTF-8");
                None
            }
        })
        .collect()
}

fn default_interpreter() -> Vec<String> {
    if cfg!(windows) {
        vec!["cmd".to_string(), "/C".to_string()]
    } else {
        vec!["sh".to_string(), "-c".to_string()]
    }
}
