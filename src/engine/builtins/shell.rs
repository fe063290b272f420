//! `${shell:command}` variables

use crate::engine::command::capture_output;
use crate::engine::registry::VariableRegistry;

pub fn register(registry: &mut VariableRegistry) {
    registry.add("shell", |ctx, command| capture_output(command, ctx));
}
