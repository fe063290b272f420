//! Built-in variables
//!
//! Each submodule registers the variables reading one part of the context.
//! Every resolver yields the empty string when the state it reads is absent.

pub mod buffer;
pub mod config;
pub mod env;
pub mod input;
pub mod magic;
pub mod notebook;
pub mod shell;
pub mod task;

use crate::engine::registry::VariableRegistry;

/// Register every built-in variable
pub fn register_all(registry: &mut VariableRegistry) {
    notebook::register(registry);
    buffer::register(registry);
    task::register(registry);

    // Namespaced variables taking an argument
    magic::register(registry);
    env::register(registry);
    config::register(registry);
    input::register(registry);
    shell::register(registry);
}
