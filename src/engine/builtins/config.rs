//! `${config:path}` variables, read from the context's settings document

use crate::engine::jsonpath;
use crate::engine::registry::VariableRegistry;

pub fn register(registry: &mut VariableRegistry) {
    registry.add("config", |ctx, path| jsonpath::evaluate(&ctx.settings, path));
}
