//! Command-line interface implementation.

use crate::config::{self, DEFAULT_GPG_PROGRAM};
use crate::error::Result;
use crate::export::{ExportOptions, ExportSummary, Exporter};
use crate::gpg::{Decryptor, GpgEngine};
use crate::version::GitCli;
use clap::Parser;
use std::io;
use std::path::PathBuf;

/// Dump every entry of a GNU pass store as plaintext to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the password store
    #[arg(
        short = 's',
        long,
        env = "PASSWORD_STORE_DIR",
        help = "Path to the password store (default: ~/.password-store)"
    )]
    pub store: Option<PathBuf>,

    /// GPG program used for decryption
    #[arg(long, env = "PASS_EXPORT_GPG", default_value = DEFAULT_GPG_PROGRAM)]
    pub gpg: PathBuf,

    /// Skip entries that fail to decrypt instead of aborting
    #[arg(long)]
    pub best_effort: bool,
}

impl Cli {
    /// Get the absolute store root.
    pub fn store_root(&self) -> Result<PathBuf> {
        let root = match &self.store {
            Some(path) => path.clone(),
            None => config::default_store_root()?,
        };

        if root.is_absolute() {
            Ok(root)
        } else {
            Ok(std::env::current_dir()?.join(root))
        }
    }

    /// Build the export options for this invocation.
    pub fn options(&self) -> Result<ExportOptions> {
        let mut options = ExportOptions::new(self.store_root()?);
        options.best_effort = self.best_effort;
        Ok(options)
    }

    /// Execute the export, writing the dump to stdout.
    pub fn execute(&self) -> Result<ExportSummary> {
        let options = self.options()?;

        let engine = GpgEngine::new(&self.gpg);
        engine.check_available()?;

        let exporter = Exporter::new(Decryptor::new(engine), GitCli::default(), options);
        let stdout = io::stdout();
        let mut sink = stdout.lock();
        exporter.run(&mut sink)
    }
}
