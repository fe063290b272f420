//! Task, application and well-known folder variables

use crate::engine::context::{Context, Folders, TaskInfo};
use crate::engine::registry::VariableRegistry;
use crate::error::EvalResult;
use crate::utils::paths;
use std::path::{Path, MAIN_SEPARATOR};

fn from_task(ctx: &Context, f: impl FnOnce(&TaskInfo) -> String) -> EvalResult<String> {
    Ok(ctx.task.as_ref().map(f).unwrap_or_default())
}

/// Register a variable returning one of the well-known folders
fn add_folder(registry: &mut VariableRegistry, name: &str, folder: fn(&Folders) -> &Path) {
    registry.add(name, move |ctx, _| Ok(paths::clean_path(folder(&ctx.folders))));
}

pub fn register(registry: &mut VariableRegistry) {
    registry.add("cwd", |ctx, _| {
        from_task(ctx, |task| paths::clean_path(task.working_dir()))
    });
    registry.add("taskFile", |ctx, _| {
        from_task(ctx, |task| paths::clean_path(&task.file))
    });
    registry.add("taskDir", |ctx, _| {
        from_task(ctx, |task| paths::parent_dir(&task.file))
    });
    registry.add("exeFile", |ctx, _| Ok(paths::clean_path(&ctx.exe_file)));
    registry.add("pathSeparator", |_, _| Ok(MAIN_SEPARATOR.to_string()));

    add_folder(registry, "notebookTaskFolder", |f| f.notebook_task.as_path());
    add_folder(registry, "userTaskFolder", |f| f.user_task.as_path());
    add_folder(registry, "appTaskFolder", |f| f.app_task.as_path());
    add_folder(registry, "userThemeFolder", |f| f.user_theme.as_path());
    add_folder(registry, "appThemeFolder", |f| f.app_theme.as_path());
    add_folder(registry, "userDocsFolder", |f| f.user_docs.as_path());
    add_folder(registry, "appDocsFolder", |f| f.app_docs.as_path());
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

    #[test]
    fn test_task_variables() {
        let mut task = TaskInfo::new("/notes/.taskvars/tasks/build.json");
        task.cwd = Some(PathBuf::from("../../out/"));

        let ctx = Context::new()
            .with_task(task)
            .with_exe_file(PathBuf::from("/opt/taskvars/./bin/taskvars"));
        let engine = engine();
        let eval = |text: &str| engine.evaluate(&ctx, text).unwrap();

        assert_eq!(eval("${taskFile}"), "/notes/.taskvars/tasks/build.json");
        assert_eq!(eval("${taskDir}"), "/notes/.taskvars/tasks");
        assert_eq!(eval("${cwd}"), "/notes/out");
        assert_eq!(eval("${exeFile}"), "/opt/taskvars/bin/taskvars");
        assert_eq!(eval("${pathSeparator}"), MAIN_SEPARATOR.to_string());
    }

    #[test]
    fn test_folder_variables() {
        let folders = Folders {
            notebook_task: PathBuf::from("/notes/.taskvars/tasks/"),
            user_task: PathBuf::from("/home/me/.config/taskvars/tasks"),
            app_task: PathBuf::from("/opt/taskvars/tasks"),
            user_theme: PathBuf::from("/home/me/.config/taskvars/themes"),
            app_theme: PathBuf::from("/opt/taskvars/themes"),
            user_docs: PathBuf::from("/home/me/.local/share/taskvars/docs"),
            app_docs: PathBuf::from("/opt/taskvars/docs"),
        };
        let ctx = Context::new().with_folders(folders);
        let engine = engine();

        assert_eq!(
            engine.evaluate(&ctx, "${notebookTaskFolder}").unwrap(),
            "/notes/.taskvars/tasks"
        );
        assert_eq!(
            engine
                .evaluate(&ctx, "${userThemeFolder}:${appDocsFolder}")
                .unwrap(),
            "/home/me/.config/taskvars/themes:/opt/taskvars/docs"
        );
    }

    #[test]
    fn test_without_task() {
        let result = engine()
            .evaluate(&Context::new(), "[${cwd}][${taskFile}][${taskDir}]")
            .unwrap();
        assert_eq!(result, "[][][]");
    }
}
