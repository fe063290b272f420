//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use taskvars::engine::{Context, Notebook};
use tempfile::TempDir;

/// Create a temporary directory with a taskvars.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("taskvars.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config with a nested subdirectory to run from
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Context with the sample notebook at /home/vnotex/vnote
pub fn vnote_context() -> Context {
    Context::new().with_notebook(Notebook {
        root_folder: PathBuf::from("/home/vnotex/vnote"),
        name: "VNote".to_string(),
        description: "Sample notebook".to_string(),
    })
}
