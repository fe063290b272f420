//! `${env:NAME}` variables

use crate::engine::registry::VariableRegistry;

pub fn register(registry: &mut VariableRegistry) {
    registry.add("env", |ctx, name| {
        Ok(ctx.env.get(name).cloned().unwrap_or_default())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Context, SubstitutionEngine};
    use std::collections::HashMap;

    #[test]
    fn test_env_lookup() {
        let mut registry = VariableRegistry::new();
        register(&mut registry);
        let engine = SubstitutionEngine::with_registry(registry);

        let mut env = HashMap::new();
        env.insert("HOME".to_string(), "/home/vnotex".to_string());
        let ctx = Context::new().with_env(env);

        assert_eq!(engine.evaluate(&ctx, "${env:HOME}").unwrap(), "/home/vnotex");
        assert_eq!(engine.evaluate(&ctx, "[${env:UNSET_VAR}]").unwrap(), "[]");
        assert_eq!(engine.evaluate(&ctx, "[${env}]").unwrap(), "[]");
    }
}
