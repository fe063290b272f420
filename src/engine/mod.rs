//! Variable substitution engine
//!
//! This module expands `${name}` and `${name:argument}` tokens in task
//! strings: scanning, the variable registry, built-in resolvers and the
//! context they read from.

pub mod builtins;
pub mod command;
pub mod context;
pub mod jsonpath;
pub mod prompt;
pub mod registry;
pub mod scanner;
pub mod substitute;

// Re-export main types
pub use context::*;
pub use jsonpath::JsonValue;
pub use prompt::{Prompter, TerminalPrompter};
pub use registry::*;
pub use scanner::*;
pub use substitute::*;
