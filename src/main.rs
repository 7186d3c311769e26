//! Main entry point for pass-export.

use clap::Parser;
use pass_export::cli::Cli;
use pass_export::utils::{error_exit, warning};
use tracing_subscriber::EnvFilter;

/// Exit status when best-effort mode left entries out.
const EXIT_INCOMPLETE: i32 = 2;

fn main() {
    // Logs go to stderr and stay silent on success unless RUST_LOG asks for more.
    // Decrypted content is never logged at any level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pass_export=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.execute() {
        Ok(summary) if summary.is_complete() => {}
        Ok(summary) => {
            warning(&format!(
                "{} entr{} skipped: {}",
                summary.skipped.len(),
                if summary.skipped.len() == 1 { "y" } else { "ies" },
                summary.skipped.join(", ")
            ));
            std::process::exit(EXIT_INCOMPLETE);
        }
        Err(e) => error_exit(&e.to_string(), 1),
    }
}
