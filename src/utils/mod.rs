//! Shared helpers
//!
//! Lexical path handling used by the path-returning resolvers, and deadline
//! arithmetic for the resolvers that wait on the outside world.

pub mod paths;
pub mod time;

pub use paths::*;
pub use time::*;
