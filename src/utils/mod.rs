//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - External command execution with captured or passthrough output
//! - `io` - File I/O with consistent error handling
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod validation;
