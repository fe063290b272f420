//! Variable registry
//!
//! Maps variable names to resolver functions. Built-ins are registered once
//! with [`VariableRegistry::add`]; hosts and tests replace them with
//! [`VariableRegistry::override_variable`].

use crate::engine::builtins;
use crate::engine::context::Context;
use crate::error::EvalResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Resolver signature: `(context, argument) -> replacement text`
///
/// The argument is the empty string when the token had none.
pub type ResolveFn = dyn Fn(&Context, &str) -> EvalResult<String> + Send + Sync;

/// A named variable and its resolver
#[derive(Clone)]
pub struct Variable {
    name: String,
    resolve: Arc<ResolveFn>,
}

impl Variable {
    pub fn new<F>(name: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(&Context, &str) -> EvalResult<String> + Send + Sync + 'static,
    {
        Variable {
            name: name.into(),
            resolve: Arc::new(resolve),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce the replacement text for one token
    pub fn evaluate(&self, ctx: &Context, argument: &str) -> EvalResult<String> {
        (self.resolve)(ctx, argument)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable").field("name", &self.name).finish()
    }
}

/// Name to resolver mapping; names are unique
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: HashMap<String, Variable>,
}

impl VariableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in variable
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register a new variable
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Only meant for fixed built-in
    /// setup; use [`override_variable`](Self::override_variable) otherwise.
    pub fn add<F>(&mut self, name: &str, resolve: F)
    where
        F: Fn(&Context, &str) -> EvalResult<String> + Send + Sync + 'static,
    {
        assert!(
            !self.variables.contains_key(name),
            "variable '{}' is already registered",
            name
        );
        self.variables
            .insert(name.to_string(), Variable::new(name, resolve));
    }

    /// Register a variable, replacing any existing one with the same name
    pub fn override_variable<F>(&mut self, name: &str, resolve: F)
    where
        F: Fn(&Context, &str) -> EvalResult<String> + Send + Sync + 'static,
    {
        self.variables
            .insert(name.to_string(), Variable::new(name, resolve));
    }

    /// Find the variable registered under `name`
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: &'static str) -> impl Fn(&Context, &str) -> EvalResult<String> {
        move |_, _| Ok(value.to_string())
    }

    #[test]
    fn test_add_and_lookup() {
        let mut registry = VariableRegistry::new();
        registry.add("greeting", constant("hello"));

        let var = registry.lookup("greeting").unwrap();
        assert_eq!(var.name(), "greeting");
        assert_eq!(var.evaluate(&Context::new(), "").unwrap(), "hello");
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_add_duplicate_panics() {
        let mut registry = VariableRegistry::new();
        registry.add("greeting", constant("hello"));
        registry.add("greeting", constant("again"));
    }

    #[test]
    fn test_override_replaces() {
        let mut registry = VariableRegistry::new();
        registry.add("greeting", constant("hello"));
        registry.override_variable("greeting", constant("bye"));
        registry.override_variable("fresh", constant("new"));

        assert_eq!(registry.len(), 2);
        let ctx = Context::new();
        assert_eq!(registry.lookup("greeting").unwrap().evaluate(&ctx, "").unwrap(), "bye");
        assert_eq!(registry.lookup("fresh").unwrap().evaluate(&ctx, "").unwrap(), "new");
    }

    #[test]
    fn test_resolver_receives_argument() {
        let mut registry = VariableRegistry::new();
        registry.add("echo", |_, arg| Ok(format!("<{}>", arg)));

        let var = registry.lookup("echo").unwrap();
        assert_eq!(var.evaluate(&Context::new(), "x").unwrap(), "<x>");
    }

    #[test]
    fn test_builtins_registered() {
        let registry = VariableRegistry::with_builtins();
        for name in [
            "notebookFolder",
            "buffer",
            "selectedText",
            "cwd",
            "pathSeparator",
            "appDocsFolder",
            "magic",
            "env",
            "config",
            "input",
            "shell",
        ] {
            assert!(registry.contains(name), "missing built-in {}", name);
        }

        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
