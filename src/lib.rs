//! Taskvars - variable substitution for task definitions
//!
//! Taskvars expands `${name}` and `${name:argument}` tokens in task strings
//! (commands, arguments, working directories) from a registry of named
//! variables: notebook and document paths, environment variables, the
//! configuration document, user input and shell command output.
//!
//! ```no_run
//! use taskvars::engine::{Context, SubstitutionEngine};
//!
//! let engine = SubstitutionEngine::new();
//! let ctx = Context::new();
//! let line = engine.evaluate(&ctx, "${cwd}/build.sh ${env:PROFILE}").unwrap();
//! ```

// Public modules
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use engine::{Context, SubstitutionEngine, VariableRegistry};
pub use error::{EvalError, Result, TaskVarsError};

/// Current version of taskvars
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
