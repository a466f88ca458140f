//! Terminal I/O utilities for CLI.

use std::io::{self, IsTerminal};

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message);
    }
}

// log_status! and log_verbose! are defined in lib.rs (#[macro_export]).
