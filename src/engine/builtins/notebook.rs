//! Notebook variables

use crate::engine::context::{Context, Notebook};
use crate::engine::registry::VariableRegistry;
use crate::error::EvalResult;
use crate::utils::paths;

fn from_notebook(ctx: &Context, f: impl FnOnce(&Notebook) -> String) -> EvalResult<String> {
    Ok(ctx.notebook.as_ref().map(f).unwrap_or_default())
}

pub fn register(registry: &mut VariableRegistry) {
    registry.add("notebookFolder", |ctx, _| {
        from_notebook(ctx, |nb| paths::clean_path(&nb.root_folder))
    });
    registry.add("notebookFolderName", |ctx, _| {
        from_notebook(ctx, |nb| paths::file_name(&nb.root_folder))
    });
    registry.add("notebookName", |ctx, _| from_notebook(ctx, |nb| nb.name.clone()));
    registry.add("notebookDescription", |ctx, _| {
        from_notebook(ctx, |nb| nb.description.clone())
    });
}
