//! Document (buffer) variables

use crate::engine::context::{Buffer, Context};
use crate::engine::registry::VariableRegistry;
use crate::error::EvalResult;
use crate::utils::paths;

fn from_buffer(ctx: &Context, f: impl FnOnce(&Buffer) -> String) -> EvalResult<String> {
    Ok(ctx.buffer.as_ref().map(f).unwrap_or_default())
}

/// Path relative to the owning notebook, or the full path outside one
fn relative_path(buffer: &Buffer) -> String {
    buffer
        .notebook_root
        .as_ref()
        .and_then(|root| paths::relative_to(&buffer.path, root))
        .unwrap_or_else(|| paths::clean_path(&buffer.path))
}

pub fn register(registry: &mut VariableRegistry) {
    registry.add("buffer", |ctx, _| {
        from_buffer(ctx, |b| paths::clean_path(&b.path))
    });
    registry.add("bufferNotebookFolder", |ctx, _| {
        from_buffer(ctx, |b| {
            b.notebook_root
                .as_ref()
                .map(paths::clean_path)
                .unwrap_or_default()
        })
    });
    registry.add("bufferRelativePath", |ctx, _| from_buffer(ctx, relative_path));
    registry.add("bufferName", |ctx, _| {
        from_buffer(ctx, |b| paths::file_name(&b.path))
    });
    registry.add("bufferBaseName", |ctx, _| {
        from_buffer(ctx, |b| paths::complete_base_name(&b.path))
    });
    registry.add("bufferDir", |ctx, _| {
        from_buffer(ctx, |b| paths::parent_dir(&b.path))
    });
    registry.add("bufferExt", |ctx, _| {
        from_buffer(ctx, |b| paths::suffix(&b.path))
    });
    registry.add("selectedText", |ctx, _| {
        from_buffer(ctx, |b| b.selected_text.clone())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SubstitutionEngine;
    use std::path::PathBuf;

    fn engine() -> SubstitutionEngine {
        let mut registry = VariableRegistry::new();
        register(&mut registry);
        SubstitutionEngine::with_registry(registry)
    }

    fn buffer_ctx(notebook_root: Option<&str>) -> Context {
        Context::new().with_buffer(Buffer {
            path: PathBuf::from("/notes/daily//2024.01.md"),
            notebook_root: notebook_root.map(PathBuf::from),
            selected_text: "picked".to_string(),
        })
    }

    #[test]
    fn test_buffer_variables() {
        let ctx = buffer_ctx(Some("/notes"));
        let engine = engine();
        let eval = |text: &str| engine.evaluate(&ctx, text).unwrap();

        assert_eq!(eval("${buffer}"), "/notes/daily/2024.01.md");
        assert_eq!(eval("${bufferNotebookFolder}"), "/notes");
        assert_eq!(eval("${bufferRelativePath}"), "daily/2024.01.md");
        assert_eq!(eval("${bufferName}"), "2024.01.md");
        assert_eq!(eval("${bufferBaseName}"), "2024.01");
        assert_eq!(eval("${bufferDir}"), "/notes/daily");
        assert_eq!(eval("${bufferExt}"), "md");
        assert_eq!(eval("${selectedText}"), "picked");
    }

    #[test]
    fn test_relative_path_outside_notebook() {
        let ctx = buffer_ctx(None);
        let result = engine().evaluate(&ctx, "${bufferRelativePath}").unwrap();
        assert_eq!(result, "/notes/daily/2024.01.md");

        let ctx = buffer_ctx(Some("/elsewhere"));
        let result = engine().evaluate(&ctx, "${bufferRelativePath}").unwrap();
        assert_eq!(result, "/notes/daily/2024.01.md");
    }

    #[test]
    fn test_without_buffer() {
        let result = engine()
            .evaluate(&Context::new(), "${buffer}${bufferExt}${selectedText}")
            .unwrap();
        assert_eq!(result, "");
    }
}
