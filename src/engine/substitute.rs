//! Template substitution
//!
//! Expands `${name}` / `${name:argument}` tokens using a [`VariableRegistry`].
//! Replacement text is scanned again, so a variable may expand to another
//! variable's token. A stall guard bounds the work for self-referential
//! definitions.

use crate::engine::context::Context;
use crate::engine::registry::VariableRegistry;
use crate::engine::scanner::PlaceholderScanner;
use crate::error::{EvalError, EvalResult};
use tracing::debug;

/// Substitutions allowed at the same position before giving up
pub const STALL_LIMIT: u32 = 100;

/// Expands placeholder tokens in task strings
#[derive(Debug, Clone)]
pub struct SubstitutionEngine {
    scanner: PlaceholderScanner,
    registry: VariableRegistry,
}

impl SubstitutionEngine {
    /// Create an engine with every built-in variable registered
    pub fn new() -> Self {
        Self::with_registry(VariableRegistry::with_builtins())
    }

    /// Create an engine over a specific registry
    pub fn with_registry(registry: VariableRegistry) -> Self {
        SubstitutionEngine {
            scanner: PlaceholderScanner::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Register a new variable; panics if the name is taken
    pub fn add<F>(&mut self, name: &str, resolve: F)
    where
        F: Fn(&Context, &str) -> EvalResult<String> + Send + Sync + 'static,
    {
        self.registry.add(name, resolve);
    }

    /// Register or replace a variable
    pub fn override_variable<F>(&mut self, name: &str, resolve: F)
    where
        F: Fn(&Context, &str) -> EvalResult<String> + Send + Sync + 'static,
    {
        self.registry.override_variable(name, resolve);
    }

    /// Expand every known token in `text`
    ///
    /// Unknown names are left verbatim. Any resolver error aborts the whole
    /// expansion; no partially substituted text is returned in that case.
    pub fn evaluate(&self, ctx: &Context, text: &str) -> EvalResult<String> {
        let mut content = text.to_string();
        let mut pos = 0;
        let mut stall = STALL_LIMIT;

        while pos < content.len() {
            let Some(token) = self.scanner.find_next(&content, pos) else {
                break;
            };

            let Some(var) = self.registry.lookup(&token.name) else {
                debug!(name = %token.name, "unknown variable left as is");
                pos = token.end;
                stall = STALL_LIMIT;
                continue;
            };

            let replacement = var.evaluate(ctx, token.argument.as_deref().unwrap_or(""))?;
            content.replace_range(token.start..token.end, &replacement);

            // Replacement may itself contain tokens, so resume at its start
            if token.start == pos {
                stall -= 1;
                if stall == 0 {
                    debug!(
                        name = %token.name,
                        position = pos,
                        "stopped expanding: no progress after {} substitutions",
                        STALL_LIMIT
                    );
                    break;
                }
            } else {
                stall = STALL_LIMIT;
            }
            pos = token.start;
        }

        Ok(content)
    }

    /// Expand a list of strings, keeping order and length
    pub fn evaluate_all<S: AsRef<str>>(&self, ctx: &Context, texts: &[S]) -> EvalResult<Vec<String>> {
        texts
            .iter()
            .map(|s| self.evaluate(ctx, s.as_ref()))
            .collect::<EvalResult<Vec<String>>>()
    }

    /// Expand with strict mode - errors on undefined variables
    pub fn evaluate_strict(&self, ctx: &Context, text: &str) -> EvalResult<String> {
        let result = self.evaluate(ctx, text)?;

        if let Some(name) = self.unresolved(&result).into_iter().next() {
            return Err(EvalError::UndefinedVariable(name));
        }

        Ok(result)
    }

    /// Names of tokens in `text` that no variable is registered for
    pub fn unresolved(&self, text: &str) -> Vec<String> {
        self.scanner
            .tokens(text)
            .into_iter()
            .filter(|token| self.registry.lookup(&token.name).is_none())
            .map(|token| token.name)
            .collect()
    }
}

impl Default for SubstitutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn engine_with(vars: &[(&str, &'static str)]) -> SubstitutionEngine {
        let mut engine = SubstitutionEngine::with_registry(VariableRegistry::new());
        for &(name, value) in vars {
            engine.add(name, move |_, _| Ok(value.to_string()));
        }
        engine
    }

    #[test]
    fn test_simple_substitution() {
        let engine = engine_with(&[("name", "world")]);
        let result = engine.evaluate(&Context::new(), "Hello, ${name}!").unwrap();
        assert_eq!(result, "Hello, world!");
    }

    #[test]
    fn test_multiple_variables() {
        let engine = engine_with(&[("first", "John"), ("last", "Doe")]);
        let result = engine.evaluate(&Context::new(), "${first} ${ last }").unwrap();
        assert_eq!(result, "John Doe");
    }

    #[test]
    fn test_unknown_variable_untouched() {
        let engine = engine_with(&[("known", "yes")]);
        let result = engine
            .evaluate(&Context::new(), "${doesNotExist} ${known} ${doesNotExist}")
            .unwrap();
        assert_eq!(result, "${doesNotExist} yes ${doesNotExist}");
    }

    #[test]
    fn test_recursive_expansion() {
        let engine = engine_with(&[("a", "${b}"), ("b", "X")]);
        assert_eq!(engine.evaluate(&Context::new(), "${a}").unwrap(), "X");
    }

    #[test]
    fn test_expansion_into_unknown_token() {
        let engine = engine_with(&[("a", "${missing}-${b}"), ("b", "X")]);
        assert_eq!(
            engine.evaluate(&Context::new(), "${a}").unwrap(),
            "${missing}-X"
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut engine = SubstitutionEngine::with_registry(VariableRegistry::new());
        engine.add("loop", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("${loop}".to_string())
        });

        let result = engine.evaluate(&Context::new(), "${loop}").unwrap();
        assert_eq!(result, "${loop}");
        assert_eq!(calls.load(Ordering::SeqCst), STALL_LIMIT as usize);

        let result = engine.evaluate(&Context::new(), "x ${loop} y").unwrap();
        assert_eq!(result, "x ${loop} y");
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let engine = engine_with(&[("ping", "${pong}"), ("pong", "${ping}")]);
        let result = engine.evaluate(&Context::new(), "${ping}").unwrap();
        assert!(result == "${ping}" || result == "${pong}");
    }

    #[test]
    fn test_argument_passed_or_empty() {
        let mut engine = SubstitutionEngine::with_registry(VariableRegistry::new());
        engine.add("show", |_, arg| Ok(format!("[{}]", arg)));

        let result = engine
            .evaluate(&Context::new(), "${show} ${show:x} ${show: }")
            .unwrap();
        assert_eq!(result, "[] [x] []");
    }

    #[test]
    fn test_override_takes_effect() {
        let mut engine = engine_with(&[("name", "old")]);
        engine.override_variable("name", |_, _| Ok("new".to_string()));
        assert_eq!(engine.evaluate(&Context::new(), "${name}").unwrap(), "new");
    }

    #[test]
    fn test_error_aborts_evaluation() {
        let mut engine = engine_with(&[("ok", "fine")]);
        engine.add("bad", |_, arg| Err(EvalError::MalformedPath(arg.to_string())));

        let result = engine.evaluate(&Context::new(), "${ok} ${bad:a[}");
        assert!(matches!(result, Err(EvalError::MalformedPath(ref p)) if p == "a["));
    }

    #[test]
    fn test_evaluate_all() {
        let engine = engine_with(&[("name", "test")]);
        let list = vec!["file-${name}.txt".to_string(), "static.txt".to_string()];

        let result = engine.evaluate_all(&Context::new(), &list).unwrap();
        assert_eq!(result, vec!["file-test.txt", "static.txt"]);
    }

    #[test]
    fn test_evaluate_strict() {
        let engine = engine_with(&[("name", "x")]);
        let ctx = Context::new();

        assert_eq!(engine.evaluate_strict(&ctx, "${name}").unwrap(), "x");
        let result = engine.evaluate_strict(&ctx, "${name} ${undefined}");
        assert!(matches!(result, Err(EvalError::UndefinedVariable(ref n)) if n == "undefined"));
    }

    #[test]
    fn test_unresolved() {
        let engine = engine_with(&[("name", "x")]);
        assert_eq!(engine.unresolved("${name} ${a} ${b:c}"), vec!["a", "b"]);
    }

    #[test]
    fn test_no_tokens() {
        let engine = SubstitutionEngine::new();
        let ctx = Context::new();
        assert_eq!(engine.evaluate(&ctx, "No variables here").unwrap(), "No variables here");
        assert_eq!(engine.evaluate(&ctx, "").unwrap(), "");
        assert_eq!(engine.evaluate(&ctx, "Value: ${}").unwrap(), "Value: ${}");
    }
}
