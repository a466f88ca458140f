//! Tree-wide identifier rewriting.
//!
//! Given a root directory and an ordered list of [`RewriteRule`]s, rewrites
//! matching substrings in file contents, file names and directory names.
//! Permission bits survive every write and rename. Matching is a raw byte
//! substring match, with no knowledge of the language inside the files.

pub mod content;
pub mod directories;
pub mod files;
pub mod filter;
pub mod pipeline;
pub mod rule;

mod walk;

pub use content::{rewrite_contents, rewrite_file};
pub use directories::{rename_directories, scan_directories, RenameCandidate};
pub use files::rename_files;
pub use filter::{IgnoreSet, SuffixPolicy};
pub use pipeline::{apply, Phase, PipelineOptions, RewritePipeline, RewriteSummary};
pub use rule::RewriteRule;
