//! Host file parsing, validation and loading
//!
//! A host file (`taskvars.yml`) describes the notebook, buffer and task a
//! context is built from when the engine runs outside an editor.

pub mod load;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use load::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
