//! Terminal helpers. Everything here writes to stderr; stdout carries the dump.

use colored::*;

/// Print an error message and exit with the given code.
pub fn error_exit(message: &str, code: i32) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(code);
}

/// Print a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow(), message);
}
