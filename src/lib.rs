/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("build", "Running module: {}", name);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

/// Prefixed progress line on stderr, printed only when `verbose` is set.
///
/// Unlike `log_status!`, output does not depend on stderr being a terminal.
#[macro_export]
macro_rules! log_verbose {
    ($verbose:expr, $prefix:expr, $($arg:tt)*) => {
        if $verbose {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `rebrand::rewrite` instead of `rebrand::core::rewrite`
pub use core::*;
pub use utils::*;
