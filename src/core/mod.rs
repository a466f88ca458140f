// Public modules
pub mod build;
pub mod builder;
pub mod config;
pub mod error;
pub mod git;
pub mod module;
pub mod rewrite;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
